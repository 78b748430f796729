use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A labeled class of outcomes and its relative abundance in the population.
///
/// # Invariants
/// - `weight >= 1`
/// - `name` is not empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Category {
	name: String,
	weight: u64,
}

impl Category {
	/// Category name, unique within its `CategorySet`.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of population elements belonging to this category.
	pub fn weight(&self) -> u64 {
		self.weight
	}
}

/// Half-open cumulative-weight interval `[lo, hi)` owned by one category.
///
/// Sampling draws `r` uniformly from `[0, total)` and selects the category
/// whose interval contains `r`.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
	pub lo: u64,
	pub hi: u64,
}

impl Interval {
	pub fn contains(&self, r: u64) -> bool {
		self.lo <= r && r < self.hi
	}
}

/// Immutable description of a weighted population.
///
/// Built once from configuration and read-only afterwards. Categories keep
/// the order in which they were given; every index used elsewhere in the
/// crate (sampler output, record frequencies, baseline probabilities)
/// refers to this order.
///
/// # Invariants
/// - At least one category
/// - Names are unique
/// - `total` is the sum of all weights
/// - `boundaries[i] = [w_0 + .. + w_{i-1}, w_0 + .. + w_i)`, contiguous and covering `[0, total)`
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CategorySet {
	categories: Vec<Category>,
	total: u64,
	#[serde(skip)]
	boundaries: Vec<Interval>,
}

impl CategorySet {
	/// Builds a set from ordered `(name, weight)` pairs.
	///
	/// # Errors
	/// - `EmptyCategorySet` if no pair is given
	/// - `EmptyName` if a name is blank
	/// - `NonPositiveWeight` if a weight is below 1
	/// - `DuplicateName` if a name appears twice
	/// - `TotalWeightOverflow` if the weights do not sum into a `u64`
	pub fn new<I, S>(pairs: I) -> Result<Self, ValidationError>
	where
		I: IntoIterator<Item = (S, i64)>,
		S: Into<String>,
	{
		let mut categories = Vec::new();
		let mut boundaries = Vec::new();
		let mut seen = HashSet::new();
		let mut total: u64 = 0;

		for (name, weight) in pairs {
			let name = name.into();
			if name.trim().is_empty() {
				return Err(ValidationError::EmptyName);
			}
			if weight < 1 {
				return Err(ValidationError::NonPositiveWeight { name, weight });
			}
			if !seen.insert(name.clone()) {
				return Err(ValidationError::DuplicateName(name));
			}

			// Positive i64 always fits in u64
			let weight = weight as u64;
			let lo = total;
			total = total.checked_add(weight).ok_or(ValidationError::TotalWeightOverflow)?;
			boundaries.push(Interval { lo, hi: total });
			categories.push(Category { name, weight });
		}

		if categories.is_empty() {
			return Err(ValidationError::EmptyCategorySet);
		}

		Ok(Self { categories, total, boundaries })
	}

	/// Ordered category list.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Category names, in order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.categories.iter().map(|c| c.name.as_str())
	}

	/// Sum of all weights.
	pub fn total(&self) -> u64 {
		self.total
	}

	pub fn len(&self) -> usize {
		self.categories.len()
	}

	/// Always `false`: construction rejects empty sets.
	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}

	/// Cumulative-weight table: `(name, lo, hi)` for every category, in order.
	pub fn boundaries(&self) -> impl Iterator<Item = (&str, u64, u64)> {
		self.categories
			.iter()
			.zip(&self.boundaries)
			.map(|(c, b)| (c.name.as_str(), b.lo, b.hi))
	}

	/// Position of `name` in the set.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.categories.iter().position(|c| c.name == name)
	}

	/// Index of the category whose interval contains `r`.
	///
	/// Returns `None` if `r >= total`.
	///
	/// Binary search over the contiguous boundaries: O(log n).
	pub fn locate(&self, r: u64) -> Option<usize> {
		if r >= self.total {
			return None;
		}
		Some(self.boundaries.partition_point(|b| b.hi <= r))
	}

	/// Expands the set into one entry per population element
	/// (`weight` copies of each name, in category order).
	///
	/// A uniform pick over this list follows the same law as interval
	/// sampling. Only intended for small populations.
	pub fn flatten(&self) -> Vec<&str> {
		self.categories
			.iter()
			.flat_map(|c| std::iter::repeat_n(c.name.as_str(), c.weight as usize))
			.collect()
	}
}
