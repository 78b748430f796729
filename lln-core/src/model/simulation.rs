use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{SimulationConfig, checked_trials};
use crate::error::ValidationError;
use super::accumulator::{FrequencyAccumulator, FrequencyRecord};
use super::category_set::CategorySet;
use super::sampler::Sampler;
use super::theoretical::TheoreticalModel;

/// One fully validated simulation run.
///
/// Owns its `CategorySet`, trial count and seed. Nothing is shared with other
/// runs, so independent `Simulation`s can execute on different threads.
///
/// The seed is always fixed once the run exists (drawn from the thread RNG
/// when the configuration has none), so `stream()` and `run()` can be called
/// any number of times and always replay the same draws.
#[derive(Clone, Debug)]
pub struct Simulation {
	categories: CategorySet,
	trials: usize,
	seed: u64,
}

/// Output of a complete run, laid out for a charting layer.
///
/// `series[c][i - 1]` is the frequency of category `c` after trial `i`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunReport {
	pub names: Vec<String>,
	pub trials: usize,
	pub seed: u64,
	pub theoretical: TheoreticalModel,
	pub series: Vec<Vec<f64>>,
	/// Draw counts after the last trial.
	pub final_counts: Vec<u64>,
}

impl RunReport {
	/// Frequency series of category `name`.
	pub fn series_of(&self, name: &str) -> Option<&[f64]> {
		self.names.iter().position(|n| n == name).map(|i| self.series[i].as_slice())
	}

	/// Frequencies after the last trial, in category order.
	pub fn final_frequencies(&self) -> Vec<f64> {
		self.series.iter().map(|s| s.last().copied().unwrap_or(0.0)).collect()
	}
}

impl Simulation {
	/// Validates a configuration.
	///
	/// # Errors
	/// Any `ValidationError` from the category list or the trial count.
	pub fn new(config: &SimulationConfig) -> Result<Self, ValidationError> {
		let categories = CategorySet::new(config.categories.iter().cloned())?;
		let trials = checked_trials(config.trials)?;
		let seed = config.seed.unwrap_or_else(|| rand::rng().random());
		Ok(Self::from_parts(categories, trials, seed))
	}

	/// Builds a run from already validated parts.
	pub fn from_parts(categories: CategorySet, trials: usize, seed: u64) -> Self {
		log::info!(
			"new simulation: {} categories, total weight {}, {} trials, seed {}",
			categories.len(),
			categories.total(),
			trials,
			seed
		);
		Self { categories, trials, seed }
	}

	pub fn categories(&self) -> &CategorySet {
		&self.categories
	}

	pub fn trials(&self) -> usize {
		self.trials
	}

	pub fn seed(&self) -> u64 {
		self.seed
	}

	pub fn theoretical(&self) -> TheoreticalModel {
		TheoreticalModel::new(&self.categories)
	}

	/// Fresh lazy sequence of records, starting at trial 1.
	pub fn stream(&self) -> FrequencyAccumulator<'_, SmallRng> {
		let rng = SmallRng::seed_from_u64(self.seed);
		// trials >= 1 was checked when the run was built
		match FrequencyAccumulator::new(Sampler::new(&self.categories), rng, self.trials) {
			Ok(accumulator) => accumulator,
			Err(e) => unreachable!("trial count validated at construction: {e}"),
		}
	}

	/// Record after the last trial, without keeping the intermediate ones.
	pub fn final_record(&self) -> FrequencyRecord {
		// A stream always yields at least one record
		self.stream().last().unwrap_or_else(|| unreachable!("empty stream"))
	}

	/// Runs every trial and returns the whole trajectory.
	pub fn run(&self) -> RunReport {
		let mut series: Vec<Vec<f64>> = vec![Vec::with_capacity(self.trials); self.categories.len()];
		let mut final_counts = vec![0; self.categories.len()];

		for record in self.stream() {
			for (column, frequency) in series.iter_mut().zip(&record.frequencies) {
				column.push(*frequency);
			}
			final_counts = record.counts;
		}

		RunReport {
			names: self.categories.names().map(str::to_owned).collect(),
			trials: self.trials,
			seed: self.seed,
			theoretical: self.theoretical(),
			series,
			final_counts,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(trials: i64, seed: Option<u64>) -> SimulationConfig {
		SimulationConfig { trials, seed, ..SimulationConfig::default() }
	}

	#[test]
	fn invalid_trial_counts() {
		assert!(matches!(Simulation::new(&config(0, None)), Err(ValidationError::InvalidTrialCount(_))));
		assert!(matches!(Simulation::new(&config(-3, None)), Err(ValidationError::InvalidTrialCount(_))));
	}

	#[test]
	fn duplicate_categories_are_rejected() {
		let config = SimulationConfig {
			categories: vec![("a".to_owned(), 1), ("a".to_owned(), 2)],
			..SimulationConfig::default()
		};
		assert_eq!(Simulation::new(&config).err(), Some(ValidationError::DuplicateName("a".to_owned())));
	}

	#[test]
	fn same_seed_same_report() {
		let a = Simulation::new(&config(300, Some(42))).unwrap().run();
		let b = Simulation::new(&config(300, Some(42))).unwrap().run();
		assert_eq!(a, b);
	}

	#[test]
	fn unseeded_run_is_still_replayable() {
		let simulation = Simulation::new(&config(100, None)).unwrap();
		assert_eq!(simulation.run(), simulation.run());
	}

	#[test]
	fn report_matches_stream() {
		let simulation = Simulation::new(&config(64, Some(1))).unwrap();
		let report = simulation.run();
		let records: Vec<_> = simulation.stream().collect();

		assert_eq!(report.names, vec!["verde", "amarelo", "vermelho"]);
		assert_eq!(report.series.len(), 3);
		for (c, column) in report.series.iter().enumerate() {
			assert_eq!(column.len(), 64);
			for (i, record) in records.iter().enumerate() {
				assert_eq!(column[i], record.frequencies[c]);
			}
		}
		assert_eq!(report.final_counts, records[63].counts);
		assert_eq!(report.final_frequencies(), records[63].frequencies);
		assert_eq!(simulation.final_record(), records[63]);
	}

	#[test]
	fn report_carries_the_baseline() {
		let report = Simulation::new(&config(10, Some(3))).unwrap().run();
		assert_eq!(report.theoretical.probability("verde"), Some(0.4));
		assert_eq!(report.series_of("amarelo").map(<[f64]>::len), Some(10));
		assert_eq!(report.series_of("azul"), None);
	}

	#[test]
	fn converges_for_large_n() {
		for seed in [1, 2, 3, 4, 5] {
			let simulation = Simulation::new(&config(100_000, Some(seed))).unwrap();
			let last = simulation.final_record();
			for (observed, expected) in last.frequencies.iter().zip(simulation.theoretical().probabilities()) {
				assert!(
					(observed - expected).abs() < 0.01,
					"seed {seed}: observed {observed}, expected {expected}"
				);
			}
		}
	}
}
