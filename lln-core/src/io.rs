use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::parse_entry;
use crate::model::category_set::CategorySet;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> std::io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Parses category lines: one `name weight` or `name:weight` per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn parse_category_lines<I, S>(lines: I) -> Result<Vec<(String, i64)>, crate::error::ValidationError>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	lines
		.into_iter()
		.filter_map(|line| {
			let line = line.as_ref().trim();
			if line.is_empty() || line.starts_with('#') {
				None
			} else {
				Some(parse_entry(line))
			}
		})
		.collect()
}

/// Loads and validates a `CategorySet` from a category file.
///
/// Example file:
/// ```text
/// # chips in the bag
/// verde    4
/// amarelo  3
/// vermelho 3
/// ```
///
/// # Errors
/// Returns an error if the file cannot be read or if its content does not
/// describe a valid set.
pub fn load_categories<P: AsRef<Path>>(filepath: P) -> Result<CategorySet, Box<dyn std::error::Error>> {
	let lines = read_file(&filepath)?;
	let pairs = parse_category_lines(&lines)?;
	log::debug!("loaded {} categories from {}", pairs.len(), filepath.as_ref().display());
	Ok(CategorySet::new(pairs)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ValidationError;

	#[test]
	fn comments_and_blank_lines_are_skipped() {
		let lines = ["# bag", "", "verde 4", "  amarelo:3  ", "vermelho\t3"];
		let pairs = parse_category_lines(lines).unwrap();
		assert_eq!(
			pairs,
			vec![("verde".to_owned(), 4), ("amarelo".to_owned(), 3), ("vermelho".to_owned(), 3)]
		);
	}

	#[test]
	fn bad_line_is_reported() {
		let result = parse_category_lines(["verde 4", "amarelo"]);
		assert_eq!(result, Err(ValidationError::MalformedEntry("amarelo".to_owned())));
	}

	#[test]
	fn load_from_disk() {
		let path = std::env::temp_dir().join(format!("lln-categories-{}.txt", std::process::id()));
		std::fs::write(&path, "verde 4\namarelo 3\nvermelho 3\n").unwrap();
		let set = load_categories(&path).unwrap();
		std::fs::remove_file(&path).unwrap();
		assert_eq!(set.total(), 10);
	}

	#[test]
	fn missing_file_is_an_error() {
		assert!(load_categories("/definitely/not/here.txt").is_err());
	}
}
