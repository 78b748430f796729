use lln_core::{CategorySet, FrequencyAccumulator, Sampler, Simulation, TheoreticalModel};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Between 1 and 8 categories with weights in `1..50` and unique names.
fn category_set() -> impl Strategy<Value = CategorySet> {
	proptest::collection::vec(1_i64..50, 1..8).prop_map(|weights| {
		let pairs = weights.into_iter().enumerate().map(|(i, w)| (format!("c{i}"), w));
		CategorySet::new(pairs).expect("generated sets are valid")
	})
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]

	#[test]
	fn every_record_sums_to_one(set in category_set(), seed in any::<u64>(), trials in 1_usize..300) {
		let acc = FrequencyAccumulator::new(Sampler::new(&set), SmallRng::seed_from_u64(seed), trials).unwrap();
		let mut emitted = 0;
		for record in acc {
			emitted += 1;
			prop_assert_eq!(record.trial, emitted);
			prop_assert_eq!(record.frequencies.len(), set.len());
			let sum: f64 = record.frequencies.iter().sum();
			prop_assert!((sum - 1.0).abs() < 1e-9);
			prop_assert!(record.frequencies.iter().all(|f| (0.0..=1.0).contains(f)));
		}
		prop_assert_eq!(emitted, trials);
	}

	#[test]
	fn counts_grow_by_one_per_trial(set in category_set(), seed in any::<u64>(), trials in 1_usize..200) {
		let acc = FrequencyAccumulator::new(Sampler::new(&set), SmallRng::seed_from_u64(seed), trials).unwrap();
		let mut previous = vec![0_u64; set.len()];
		for record in acc {
			let increments: u64 = record.counts.iter().zip(&previous).map(|(now, before)| {
				assert!(now >= before);
				now - before
			}).sum();
			prop_assert_eq!(increments, 1);
			prop_assert_eq!(record.counts[record.drawn], previous[record.drawn] + 1);
			previous = record.counts;
		}
	}

	#[test]
	fn same_seed_is_bit_identical(set in category_set(), seed in any::<u64>(), trials in 1_usize..200) {
		let first = Simulation::from_parts(set.clone(), trials, seed).run();
		let second = Simulation::from_parts(set, trials, seed).run();
		prop_assert_eq!(first.final_counts, second.final_counts);
		for (a, b) in first.series.iter().zip(&second.series) {
			let a_bits: Vec<u64> = a.iter().map(|f| f.to_bits()).collect();
			let b_bits: Vec<u64> = b.iter().map(|f| f.to_bits()).collect();
			prop_assert_eq!(a_bits, b_bits);
		}
	}

	#[test]
	fn baseline_is_weight_over_total(set in category_set()) {
		let model = TheoreticalModel::new(&set);
		let total = set.total() as f64;
		for (category, probability) in set.categories().iter().zip(model.probabilities()) {
			prop_assert_eq!(probability, category.weight() as f64 / total);
		}
		let sum: f64 = model.probabilities().iter().sum();
		prop_assert!((sum - 1.0).abs() < 1e-12);
	}

	#[test]
	fn every_integer_lands_where_the_flattened_population_says(set in category_set()) {
		let flat = set.flatten();
		for (r, name) in flat.iter().enumerate() {
			let idx = set.locate(r as u64).unwrap();
			prop_assert_eq!(set.categories()[idx].name(), *name);
		}
		prop_assert_eq!(set.locate(set.total()), None);
	}
}
