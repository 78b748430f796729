use rand::Rng;

use super::category_set::{Category, CategorySet};

/// Draws one category per trial according to the weight distribution.
///
/// The sampler holds no state of its own: the source of randomness is passed
/// to every call, so the same sampler can serve any number of independent
/// runs, each with its own generator.
///
/// # Algorithm
/// - draw `r` uniformly from `[0, total)`
/// - return the category whose cumulative-weight interval `[lo, hi)` contains `r`
///
/// This gives `P(category = c) = weight_c / total` exactly, the same law as
/// picking one element uniformly from the expanded population, without
/// materializing it.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'a> {
	categories: &'a CategorySet,
}

impl<'a> Sampler<'a> {
	pub fn new(categories: &'a CategorySet) -> Self {
		Self { categories }
	}

	/// The population being sampled.
	pub fn categories(&self) -> &'a CategorySet {
		self.categories
	}

	/// Draws one category and returns its index in the set.
	///
	/// Cannot fail: the set was validated at construction, so `total >= 1`.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
		let r = rng.random_range(0..self.categories.total());
		// `r < total` so a containing interval always exists
		self.categories.locate(r).unwrap_or(self.categories.len() - 1)
	}

	/// Draws one category and returns it.
	pub fn sample_category<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a Category {
		&self.categories.categories()[self.sample(rng)]
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use rand::rngs::SmallRng;
	use rand::{RngCore, SeedableRng};

	/// Generator that always returns the same word.
	///
	/// `0` forces the lowest value of any integer range, `u64::MAX` the highest.
	pub(crate) struct ConstRng(pub u64);

	impl RngCore for ConstRng {
		fn next_u32(&mut self) -> u32 {
			self.0 as u32
		}

		fn next_u64(&mut self) -> u64 {
			self.0
		}

		fn fill_bytes(&mut self, dst: &mut [u8]) {
			for (i, b) in dst.iter_mut().enumerate() {
				*b = self.0.to_le_bytes()[i % 8];
			}
		}
	}

	fn chips() -> CategorySet {
		CategorySet::new([("verde", 4), ("amarelo", 3), ("vermelho", 3)]).unwrap()
	}

	#[test]
	fn forced_low_draw_picks_first_category() {
		let set = chips();
		let sampler = Sampler::new(&set);
		assert_eq!(sampler.sample_category(&mut ConstRng(0)).name(), "verde");
	}

	#[test]
	fn forced_high_draw_picks_last_category() {
		let set = chips();
		let sampler = Sampler::new(&set);
		assert_eq!(sampler.sample_category(&mut ConstRng(u64::MAX)).name(), "vermelho");
	}

	#[test]
	fn single_category_is_always_drawn() {
		let set = CategorySet::new([("only", 7)]).unwrap();
		let sampler = Sampler::new(&set);
		let mut rng = SmallRng::seed_from_u64(3);
		for _ in 0..100 {
			assert_eq!(sampler.sample(&mut rng), 0);
		}
	}

	#[test]
	fn seeded_draws_are_reproducible() {
		let set = chips();
		let sampler = Sampler::new(&set);
		let mut rng1 = SmallRng::seed_from_u64(42);
		let mut rng2 = SmallRng::seed_from_u64(42);
		let a: Vec<usize> = (0..200).map(|_| sampler.sample(&mut rng1)).collect();
		let b: Vec<usize> = (0..200).map(|_| sampler.sample(&mut rng2)).collect();
		assert_eq!(a, b);
	}

	#[test]
	fn draw_frequencies_follow_weights() {
		let set = CategorySet::new([("a", 1), ("b", 3)]).unwrap();
		let sampler = Sampler::new(&set);
		let mut rng = SmallRng::seed_from_u64(42);
		let mut counts = [0u32; 2];
		let n = 20_000;
		for _ in 0..n {
			counts[sampler.sample(&mut rng)] += 1;
		}
		let p_b = counts[1] as f64 / n as f64;
		assert!((p_b - 0.75).abs() < 0.02, "expected ~0.75, got {p_b}");
	}

	#[test]
	fn interval_sampling_matches_flattened_pick() {
		// Same uniform integer stream fed to both laws must give the same outcome.
		let set = CategorySet::new([("a", 2), ("b", 1), ("c", 4)]).unwrap();
		let sampler = Sampler::new(&set);
		let flat = set.flatten();
		let mut rng1 = SmallRng::seed_from_u64(9);
		let mut rng2 = SmallRng::seed_from_u64(9);
		for _ in 0..1_000 {
			let by_interval = sampler.sample_category(&mut rng1).name();
			let by_element = flat[rng2.random_range(0..flat.len() as u64) as usize];
			assert_eq!(by_interval, by_element);
		}
	}
}
