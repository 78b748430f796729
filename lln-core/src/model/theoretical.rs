use serde::{Deserialize, Serialize};

use super::category_set::CategorySet;

/// Target probability of one category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Baseline {
	pub name: String,
	pub probability: f64,
}

/// Constant reference probabilities `weight / total`, one per category.
///
/// A pure function of the `CategorySet`: it does not depend on the number of
/// trials and never changes during a run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TheoreticalModel {
	baselines: Vec<Baseline>,
}

impl TheoreticalModel {
	pub fn new(categories: &CategorySet) -> Self {
		let total = categories.total() as f64;
		let baselines = categories
			.categories()
			.iter()
			.map(|c| Baseline {
				name: c.name().to_owned(),
				probability: c.weight() as f64 / total,
			})
			.collect();
		Self { baselines }
	}

	pub fn baselines(&self) -> &[Baseline] {
		&self.baselines
	}

	/// Probabilities in category order.
	pub fn probabilities(&self) -> Vec<f64> {
		self.baselines.iter().map(|b| b.probability).collect()
	}

	pub fn probability(&self, name: &str) -> Option<f64> {
		self.baselines.iter().find(|b| b.name == name).map(|b| b.probability)
	}

	/// Human readable percentages, e.g. `("verde", "40.00%")`.
	pub fn percentages(&self) -> impl Iterator<Item = (&str, String)> {
		self.baselines
			.iter()
			.map(|b| (b.name.as_str(), format!("{:.2}%", b.probability * 100.0)))
	}
}
