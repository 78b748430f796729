use std::fmt;

/// A configuration that cannot produce a meaningful simulation.
///
/// Raised when a `CategorySet` is built or when a run is started.
/// The core never recovers from it internally; the caller decides how
/// to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// No category was given.
	EmptyCategorySet,
	/// A category name is empty (or only whitespace).
	EmptyName,
	/// A category weight is below 1.
	NonPositiveWeight { name: String, weight: i64 },
	/// A category weight could not be read as an integer.
	InvalidWeight { name: String, raw: String },
	/// Two categories share the same name.
	DuplicateName(String),
	/// The weights do not fit in a single 64-bit total.
	TotalWeightOverflow,
	/// An entry is not of the form `name:weight` (or `name weight`).
	MalformedEntry(String),
	/// The trial count is below 1 or is not an integer.
	InvalidTrialCount(String),
	/// The trial count exceeds a caller-imposed limit.
	TooManyTrials { requested: usize, limit: usize },
	/// An ensemble was asked for zero runs.
	InvalidRunCount,
	/// The seed is not an unsigned 64-bit integer.
	InvalidSeed(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyCategorySet => write!(f, "at least one category is required"),
			Self::EmptyName => write!(f, "category names cannot be empty"),
			Self::NonPositiveWeight { name, weight } => {
				write!(f, "weight of '{name}' must be a positive integer, got {weight}")
			}
			Self::InvalidWeight { name, raw } => {
				write!(f, "weight of '{name}' must be a positive integer, got '{raw}'")
			}
			Self::DuplicateName(name) => write!(f, "category '{name}' is defined more than once"),
			Self::TotalWeightOverflow => write!(f, "sum of weights is too large"),
			Self::MalformedEntry(raw) => write!(f, "expected 'name:weight', got '{raw}'"),
			Self::InvalidTrialCount(raw) => {
				write!(f, "number of trials must be an integer >= 1, got '{raw}'")
			}
			Self::TooManyTrials { requested, limit } => {
				write!(f, "number of trials {requested} exceeds the limit of {limit}")
			}
			Self::InvalidRunCount => write!(f, "an ensemble needs at least one run"),
			Self::InvalidSeed(raw) => write!(f, "seed must be an unsigned integer, got '{raw}'"),
		}
	}
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_violated_precondition() {
		let err = ValidationError::NonPositiveWeight { name: "verde".to_owned(), weight: 0 };
		assert_eq!(err.to_string(), "weight of 'verde' must be a positive integer, got 0");

		let err = ValidationError::DuplicateName("a".to_owned());
		assert_eq!(err.to_string(), "category 'a' is defined more than once");
	}

	#[test]
	fn usable_as_boxed_error() {
		let boxed: Box<dyn std::error::Error> = Box::new(ValidationError::EmptyCategorySet);
		assert_eq!(boxed.to_string(), "at least one category is required");
	}
}
