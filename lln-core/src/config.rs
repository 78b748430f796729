//! Configuration accepted from the outside world.
//!
//! Category lists, trial counts and seeds arrive either as typed values or as
//! text (query parameters, files, command-line arguments). Text is parsed here
//! so that every front end reports the same `ValidationError`s.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default population: 4 green, 3 yellow and 3 red chips.
pub const DEFAULT_CATEGORIES: [(&str, i64); 3] = [("verde", 4), ("amarelo", 3), ("vermelho", 3)];

/// Default number of draws.
pub const DEFAULT_TRIALS: i64 = 50;

/// Everything needed to start one simulation run.
///
/// Values are raw: nothing is checked until the configuration is turned into
/// a `Simulation`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Ordered `(name, weight)` pairs.
	pub categories: Vec<(String, i64)>,
	/// Number of trials `N`.
	pub trials: i64,
	/// Fixed seed for a reproducible run; `None` draws a fresh one.
	pub seed: Option<u64>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			categories: DEFAULT_CATEGORIES
				.iter()
				.map(|(name, weight)| ((*name).to_owned(), *weight))
				.collect(),
			trials: DEFAULT_TRIALS,
			seed: None,
		}
	}
}

impl SimulationConfig {
	/// Builds a configuration from the text forms used by query strings and
	/// command lines. `None` keeps the default for that field.
	///
	/// # Errors
	/// Any parse error from `parse_categories`, `parse_trials` or `parse_seed`.
	pub fn from_text(
		categories: Option<&str>,
		trials: Option<&str>,
		seed: Option<&str>,
	) -> Result<Self, ValidationError> {
		let mut config = Self::default();
		if let Some(s) = categories {
			config.categories = parse_categories(s)?;
		}
		if let Some(s) = trials {
			config.trials = parse_trials(s)?;
		}
		if let Some(s) = seed {
			config.seed = parse_seed(s)?;
		}
		Ok(config)
	}
}

/// Parses one `name:weight` or `name weight` entry.
///
/// # Errors
/// - `MalformedEntry` if there is no separator or no name
/// - `InvalidWeight` if the weight is not an integer
pub fn parse_entry(entry: &str) -> Result<(String, i64), ValidationError> {
	let entry = entry.trim();
	let (name, weight) = entry
		.rsplit_once(':')
		.or_else(|| entry.rsplit_once(char::is_whitespace))
		.ok_or_else(|| ValidationError::MalformedEntry(entry.to_owned()))?;

	let name = name.trim();
	if name.is_empty() {
		return Err(ValidationError::MalformedEntry(entry.to_owned()));
	}

	let weight = weight.trim();
	let parsed = weight.parse::<i64>().map_err(|_| ValidationError::InvalidWeight {
		name: name.to_owned(),
		raw: weight.to_owned(),
	})?;
	Ok((name.to_owned(), parsed))
}

/// Parses a comma separated category list, e.g. `"verde:4, amarelo:3"`.
///
/// Empty entries (trailing commas) are skipped. Only the shape of each entry
/// is checked; weight signs and duplicates are left to `CategorySet::new`.
pub fn parse_categories(list: &str) -> Result<Vec<(String, i64)>, ValidationError> {
	list.split(',')
		.filter(|s| !s.trim().is_empty())
		.map(parse_entry)
		.collect()
}

/// Parses a trial count (`N >= 1`).
pub fn parse_trials(raw: &str) -> Result<i64, ValidationError> {
	match raw.trim().parse::<i64>() {
		Ok(n) if n >= 1 => Ok(n),
		_ => Err(ValidationError::InvalidTrialCount(raw.trim().to_owned())),
	}
}

/// Parses a seed. Empty text or `none` means "no fixed seed".
pub fn parse_seed(raw: &str) -> Result<Option<u64>, ValidationError> {
	let raw = raw.trim();
	if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
		return Ok(None);
	}
	raw.parse::<u64>()
		.map(Some)
		.map_err(|_| ValidationError::InvalidSeed(raw.to_owned()))
}

/// Converts a raw trial count into a `usize`.
///
/// # Errors
/// `InvalidTrialCount` if `trials < 1` (or does not fit in a `usize`).
pub fn checked_trials(trials: i64) -> Result<usize, ValidationError> {
	if trials < 1 {
		return Err(ValidationError::InvalidTrialCount(trials.to_string()));
	}
	usize::try_from(trials).map_err(|_| ValidationError::InvalidTrialCount(trials.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_the_chip_setup() {
		let config = SimulationConfig::default();
		assert_eq!(
			config.categories,
			vec![("verde".to_owned(), 4), ("amarelo".to_owned(), 3), ("vermelho".to_owned(), 3)]
		);
		assert_eq!(config.trials, 50);
		assert_eq!(config.seed, None);
	}

	#[test]
	fn entries_accept_colon_or_space() {
		assert_eq!(parse_entry("verde:4"), Ok(("verde".to_owned(), 4)));
		assert_eq!(parse_entry("  verde   4 "), Ok(("verde".to_owned(), 4)));
		assert_eq!(parse_entry("dark green: 2"), Ok(("dark green".to_owned(), 2)));
	}

	#[test]
	fn malformed_entries() {
		assert_eq!(parse_entry("verde"), Err(ValidationError::MalformedEntry("verde".to_owned())));
		assert_eq!(parse_entry(":4"), Err(ValidationError::MalformedEntry(":4".to_owned())));
		assert_eq!(
			parse_entry("verde:2.5"),
			Err(ValidationError::InvalidWeight { name: "verde".to_owned(), raw: "2.5".to_owned() })
		);
	}

	#[test]
	fn category_lists() {
		let parsed = parse_categories("verde:4, amarelo:3,vermelho:3,").unwrap();
		assert_eq!(parsed.len(), 3);
		assert_eq!(parsed[1], ("amarelo".to_owned(), 3));
		assert_eq!(parse_categories(""), Ok(Vec::new()));
	}

	#[test]
	fn negative_weight_is_parsed_not_judged() {
		assert_eq!(parse_categories("a:-1"), Ok(vec![("a".to_owned(), -1)]));
	}

	#[test]
	fn trial_counts() {
		assert_eq!(parse_trials("100"), Ok(100));
		assert_eq!(parse_trials("0"), Err(ValidationError::InvalidTrialCount("0".to_owned())));
		assert_eq!(parse_trials("-5"), Err(ValidationError::InvalidTrialCount("-5".to_owned())));
		assert_eq!(parse_trials("ten"), Err(ValidationError::InvalidTrialCount("ten".to_owned())));
		assert_eq!(checked_trials(0), Err(ValidationError::InvalidTrialCount("0".to_owned())));
		assert_eq!(checked_trials(-1), Err(ValidationError::InvalidTrialCount("-1".to_owned())));
		assert_eq!(checked_trials(7), Ok(7));
	}

	#[test]
	fn seeds() {
		assert_eq!(parse_seed("42"), Ok(Some(42)));
		assert_eq!(parse_seed("none"), Ok(None));
		assert_eq!(parse_seed(""), Ok(None));
		assert_eq!(parse_seed("-1"), Err(ValidationError::InvalidSeed("-1".to_owned())));
	}

	#[test]
	fn from_text_keeps_defaults_for_missing_fields() {
		let config = SimulationConfig::from_text(None, Some("200"), Some("7")).unwrap();
		assert_eq!(config.categories, SimulationConfig::default().categories);
		assert_eq!(config.trials, 200);
		assert_eq!(config.seed, Some(7));
	}
}
