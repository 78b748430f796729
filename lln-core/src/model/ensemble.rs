use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use super::category_set::CategorySet;
use super::simulation::Simulation;
use super::theoretical::TheoreticalModel;

/// Final frequencies of one run of an ensemble.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunOutcome {
	pub seed: u64,
	pub frequencies: Vec<f64>,
}

/// How far the final frequencies of one category landed from its target.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategoryDeviation {
	pub name: String,
	pub theoretical: f64,
	pub mean_frequency: f64,
	pub max_abs_deviation: f64,
}

/// Summary of many independent runs of the same configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
	pub trials: usize,
	/// One entry per run, ordered by seed.
	pub runs: Vec<RunOutcome>,
	pub categories: Vec<CategoryDeviation>,
}

impl ConvergenceReport {
	/// `true` if every run ended within `epsilon` of every target probability.
	pub fn converged(&self, epsilon: f64) -> bool {
		self.categories.iter().all(|c| c.max_abs_deviation < epsilon)
	}

	/// Largest deviation over all categories and runs.
	pub fn max_abs_deviation(&self) -> f64 {
		self.categories.iter().map(|c| c.max_abs_deviation).fold(0.0, f64::max)
	}
}

/// Independent runs of one configuration, seeds `base_seed .. base_seed + runs`.
///
/// Runs share nothing mutable: each worker builds its own `Simulation`
/// (own RNG, own running counts), so they execute on separate threads without
/// locking. Only the final record of each run is kept.
#[derive(Clone, Debug)]
pub struct Ensemble {
	categories: CategorySet,
	trials: usize,
	runs: usize,
	base_seed: u64,
}

impl Ensemble {
	/// # Errors
	/// - `InvalidTrialCount` if `trials < 1`
	/// - `InvalidRunCount` if `runs < 1`
	pub fn new(categories: CategorySet, trials: usize, runs: usize, base_seed: u64) -> Result<Self, ValidationError> {
		if trials < 1 {
			return Err(ValidationError::InvalidTrialCount(trials.to_string()));
		}
		if runs < 1 {
			return Err(ValidationError::InvalidRunCount);
		}
		Ok(Self { categories, trials, runs, base_seed })
	}

	/// Executes every run and summarizes the final frequencies.
	///
	/// # Behavior
	/// - Splits the seeds into chunks (CPU count based).
	/// - Spawns one thread per chunk; each thread sends its outcomes back.
	/// - Sorts the outcomes by seed so the report does not depend on scheduling.
	pub fn run(&self) -> ConvergenceReport {
		let seeds: Vec<u64> = (0..self.runs as u64).map(|i| self.base_seed.wrapping_add(i)).collect();
		let workers = num_cpus::get().max(1);
		let chunk_size = seeds.len().div_ceil(workers);

		log::info!(
			"ensemble: {} runs of {} trials on up to {} threads",
			self.runs,
			self.trials,
			workers
		);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (worker, chunk) in seeds.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				let categories = &self.categories;
				let trials = self.trials;
				scope.spawn(move || {
					for &seed in chunk {
						let simulation = Simulation::from_parts(categories.clone(), trials, seed);
						let record = simulation.final_record();
						// The receiver outlives the scope
						let _ = tx.send(RunOutcome { seed, frequencies: record.frequencies });
					}
					log::debug!("ensemble worker {worker} finished {} runs", chunk.len());
				});
			}
		});
		drop(tx);

		let mut runs: Vec<RunOutcome> = rx.iter().collect();
		// Seeds may wrap around u64::MAX, so order by offset from the base
		runs.sort_by_key(|r| r.seed.wrapping_sub(self.base_seed));

		ConvergenceReport {
			trials: self.trials,
			categories: Self::deviations(&TheoreticalModel::new(&self.categories), &runs),
			runs,
		}
	}

	fn deviations(theoretical: &TheoreticalModel, runs: &[RunOutcome]) -> Vec<CategoryDeviation> {
		theoretical
			.baselines()
			.iter()
			.enumerate()
			.map(|(c, baseline)| {
				let finals: Vec<f64> = runs.iter().map(|r| r.frequencies[c]).collect();
				let mean_frequency = finals.iter().sum::<f64>() / finals.len().max(1) as f64;
				let max_abs_deviation = finals
					.iter()
					.map(|f| (f - baseline.probability).abs())
					.fold(0.0, f64::max);
				CategoryDeviation {
					name: baseline.name.clone(),
					theoretical: baseline.probability,
					mean_frequency,
					max_abs_deviation,
				}
			})
			.collect()
	}
}
