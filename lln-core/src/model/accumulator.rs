use std::iter::FusedIterator;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use super::category_set::CategorySet;
use super::sampler::Sampler;

/// Number of draws per category since trial 0.
///
/// Owned by exactly one accumulation process.
///
/// # Invariants
/// - counts only grow, by exactly one for exactly one category per trial
/// - `Σ counts == trial`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RunningCount {
	counts: Vec<u64>,
	trial: usize,
}

impl RunningCount {
	/// All-zero counts for `n` categories, at trial 0.
	pub fn new(n: usize) -> Self {
		Self { counts: vec![0; n], trial: 0 }
	}

	/// Records one draw of category `index`.
	pub fn record(&mut self, index: usize) {
		self.counts[index] += 1;
		self.trial += 1;
	}

	/// Back to trial 0.
	pub fn reset(&mut self) {
		self.counts.iter_mut().for_each(|c| *c = 0);
		self.trial = 0;
	}

	pub fn counts(&self) -> &[u64] {
		&self.counts
	}

	/// Number of trials recorded so far.
	pub fn trial(&self) -> usize {
		self.trial
	}

	/// Relative frequency `count / trial` of every category.
	///
	/// All zero at trial 0.
	pub fn frequencies(&self) -> Vec<f64> {
		if self.trial == 0 {
			return vec![0.0; self.counts.len()];
		}
		let i = self.trial as f64;
		self.counts.iter().map(|&c| c as f64 / i).collect()
	}
}

/// Snapshot of the run after trial `trial`.
///
/// `frequencies[c]` is `counts[c] / trial` for category `c` in `CategorySet`
/// order; categories never drawn so far are present at `0.0`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyRecord {
	/// Trial index, starting at 1.
	pub trial: usize,
	/// Index of the category drawn at this trial.
	pub drawn: usize,
	pub counts: Vec<u64>,
	pub frequencies: Vec<f64>,
}

impl FrequencyRecord {
	/// Frequency of category `name`, or `None` if the set has no such category.
	pub fn frequency_of(&self, categories: &CategorySet, name: &str) -> Option<f64> {
		categories.index_of(name).map(|i| self.frequencies[i])
	}

	/// `(name, frequency)` pairs in category order.
	pub fn named<'a>(&'a self, categories: &'a CategorySet) -> impl Iterator<Item = (&'a str, f64)> {
		categories.names().zip(self.frequencies.iter().copied())
	}
}

/// Lazy, finite sequence of `FrequencyRecord`s, one per trial `1..=N`.
///
/// Each `next()` draws once, updates the running count, and emits the new
/// record. Pulling everything (`collect`) and pulling one record at a time
/// yield the same records for the same random input.
///
/// The consumer may stop at any trial boundary: counts and the emitted prefix
/// are consistent after every completed trial. There is no way to resume from
/// an arbitrary index since each record depends on the whole prefix; `reset`
/// starts over from trial 1.
pub struct FrequencyAccumulator<'a, R: Rng> {
	sampler: Sampler<'a>,
	rng: R,
	running: RunningCount,
	trials: usize,
}

impl<'a, R: Rng> FrequencyAccumulator<'a, R> {
	/// Creates an accumulator producing `trials` records.
	///
	/// # Errors
	/// Returns `InvalidTrialCount` if `trials < 1`.
	pub fn new(sampler: Sampler<'a>, rng: R, trials: usize) -> Result<Self, ValidationError> {
		if trials < 1 {
			return Err(ValidationError::InvalidTrialCount(trials.to_string()));
		}
		let running = RunningCount::new(sampler.categories().len());
		Ok(Self { sampler, rng, running, trials })
	}

	/// Counts after the last emitted trial.
	pub fn counts(&self) -> &[u64] {
		self.running.counts()
	}

	/// Last emitted trial index (0 before the first pull).
	pub fn trial(&self) -> usize {
		self.running.trial()
	}

	/// Total number of records this sequence produces.
	pub fn trials(&self) -> usize {
		self.trials
	}

	pub fn running_count(&self) -> &RunningCount {
		&self.running
	}

	/// Zeroes the running count; the next record is trial 1 again.
	///
	/// The random source is not rewound, so the new sequence continues its
	/// stream of draws.
	pub fn reset(&mut self) {
		self.running.reset();
	}
}

impl<R: Rng> Iterator for FrequencyAccumulator<'_, R> {
	type Item = FrequencyRecord;

	fn next(&mut self) -> Option<Self::Item> {
		if self.running.trial() >= self.trials {
			return None;
		}

		let drawn = self.sampler.sample(&mut self.rng);
		self.running.record(drawn);

		let record = FrequencyRecord {
			trial: self.running.trial(),
			drawn,
			counts: self.running.counts().to_vec(),
			frequencies: self.running.frequencies(),
		};
		log::trace!("trial {} drew category {}", record.trial, drawn);
		Some(record)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.trials - self.running.trial();
		(remaining, Some(remaining))
	}
}

impl<R: Rng> ExactSizeIterator for FrequencyAccumulator<'_, R> {}

impl<R: Rng> FusedIterator for FrequencyAccumulator<'_, R> {}
