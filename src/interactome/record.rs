//! Interaction table rows and their decoding from JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::{LoadError, RecordError};

/// One bait/prey row of an interaction table.
///
/// Field names follow the table's header strings. Empty strings in optional
/// columns are read as absent; `bait_locus` keeps an empty string because an
/// empty bait locus marks the end of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InteractionRecord {
	/// Human-readable bait name.
	#[serde(rename = "Bait Name", deserialize_with = "non_empty")]
	pub bait_name: Option<String>,
	/// Bait locus; required.
	#[serde(rename = "Bait Locus")]
	pub bait_locus: Option<String>,
	/// Free-text notes about the bait.
	#[serde(rename = "Bait Notes", deserialize_with = "non_empty")]
	pub bait_notes: Option<String>,
	/// Prey locus; required.
	#[serde(rename = "Prey Locus", deserialize_with = "non_empty")]
	pub prey_locus: Option<String>,
	/// TAIR gene symbols for the prey.
	#[serde(rename = "Prey TAIR Symbols", deserialize_with = "non_empty")]
	pub prey_tair: Option<String>,
	/// TAIR description for the prey.
	#[serde(rename = "Prey TAIR Description", deserialize_with = "non_empty")]
	pub prey_description: Option<String>,
	/// Raw `Number of Interactions` cell.
	#[serde(rename = "Number of Interactions", deserialize_with = "count_cell")]
	pub interaction_count: Option<String>,
	/// Set when the row's cells could not be decoded. Only the bait locus is
	/// kept, so a blank one still ends the table.
	#[serde(skip)]
	pub decode_error: Option<String>,
}

const BAIT_LOCUS: &str = "Bait Locus";

/// A record that passed validation, borrowed from its source row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidRecord<'a> {
	/// Bait locus, non-empty.
	pub bait_locus: &'a str,
	/// Prey locus, non-empty.
	pub prey_locus: &'a str,
	/// See [`InteractionRecord::bait_name`].
	pub bait_name: Option<&'a str>,
	/// See [`InteractionRecord::bait_notes`].
	pub bait_notes: Option<&'a str>,
	/// See [`InteractionRecord::prey_tair`].
	pub prey_tair: Option<&'a str>,
	/// See [`InteractionRecord::prey_description`].
	pub prey_description: Option<&'a str>,
	/// Parsed interaction count.
	pub interaction_count: Option<u32>,
	/// A count cell that is not a non-negative integer. The row stays valid
	/// and its count is unknown.
	pub rejected_count: Option<&'a str>,
}

impl InteractionRecord {
	/// A row with just the two required loci.
	pub fn new(bait_locus: impl Into<String>, prey_locus: impl Into<String>) -> Self {
		Self {
			bait_locus: Some(bait_locus.into()),
			prey_locus: Some(prey_locus.into()),
			..Self::default()
		}
	}

	/// Builder-style setter for the bait name.
	pub fn with_bait_name(mut self, name: impl Into<String>) -> Self {
		self.bait_name = Some(name.into());
		self
	}

	/// Builder-style setter for the raw interaction count.
	pub fn with_interaction_count(mut self, count: impl ToString) -> Self {
		self.interaction_count = Some(count.to_string());
		self
	}

	/// Whether this row ends the table: its bait locus is present but blank.
	pub fn is_terminator(&self) -> bool {
		self.bait_locus
			.as_deref()
			.is_some_and(|locus| locus.trim().is_empty())
	}

	/// Check required columns and parse typed cells.
	pub fn validate(&self) -> Result<ValidRecord<'_>, RecordError> {
		if let Some(error) = &self.decode_error {
			return Err(RecordError::Undecodable(error.clone()));
		}
		let bait_locus = self
			.bait_locus
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.ok_or(RecordError::MissingBaitLocus)?;
		let prey_locus = self
			.prey_locus
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.ok_or_else(|| RecordError::MissingPreyLocus {
				bait: bait_locus.to_string(),
			})?;
		let raw_count = present(&self.interaction_count);
		let interaction_count = raw_count.and_then(|raw| raw.trim().parse::<u32>().ok());
		let rejected_count = raw_count.filter(|_| interaction_count.is_none());

		Ok(ValidRecord {
			bait_locus,
			prey_locus,
			bait_name: present(&self.bait_name),
			bait_notes: present(&self.bait_notes),
			prey_tair: present(&self.prey_tair),
			prey_description: present(&self.prey_description),
			interaction_count,
			rejected_count,
		})
	}
}

fn present(cell: &Option<String>) -> Option<&str> {
	cell.as_deref().filter(|s| !s.trim().is_empty())
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountCell {
	Number(serde_json::Number),
	Text(String),
}

fn count_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<CountCell>::deserialize(deserializer)?;
	Ok(match value {
		Some(CountCell::Number(n)) => Some(n.to_string()),
		Some(CountCell::Text(s)) if !s.trim().is_empty() => Some(s),
		_ => None,
	})
}

/// Decode an interaction table from JSON.
///
/// Accepts either a bare array of row objects or an object with the rows
/// under `data`, which is what CSV-to-JSON converters usually produce. A row
/// whose cells have the wrong types is kept with [`InteractionRecord::decode_error`]
/// set, so ingestion can report it and carry on.
pub fn records_from_json(text: &str) -> Result<Vec<InteractionRecord>, LoadError> {
	let table: Value = serde_json::from_str(text)?;
	let rows = match table {
		Value::Array(rows) => rows,
		Value::Object(mut envelope) => match envelope.remove("data") {
			Some(Value::Array(rows)) => rows,
			_ => return Err(LoadError::NotATable),
		},
		_ => return Err(LoadError::NotATable),
	};
	Ok(rows.into_iter().map(decode_json_row).collect())
}

fn decode_json_row(row: Value) -> InteractionRecord {
	let bait_locus = row.get(BAIT_LOCUS).and_then(Value::as_str).map(str::to_string);
	serde_json::from_value(row).unwrap_or_else(|err| InteractionRecord {
		bait_locus,
		decode_error: Some(err.to_string()),
		..InteractionRecord::default()
	})
}

/// Decode an interaction table from CSV with a header row.
///
/// Rows may be ragged. An empty `Bait Locus` cell ends the table just like a
/// blank JSON cell does.
pub fn records_from_csv(text: &str) -> Result<Vec<InteractionRecord>, LoadError> {
	let mut reader = csv::ReaderBuilder::new()
		.flexible(true)
		.trim(csv::Trim::Headers)
		.from_reader(text.as_bytes());
	let headers = reader.headers()?.clone();
	let bait_column = headers.iter().position(|h| h == BAIT_LOCUS);

	let mut rows = Vec::new();
	for record in reader.records() {
		let row = match record {
			Ok(record) => {
				let bait_locus = bait_column.map(|i| record.get(i).unwrap_or_default().to_string());
				match record.deserialize::<InteractionRecord>(Some(&headers)) {
					Ok(row) => InteractionRecord { bait_locus, ..row },
					Err(err) => InteractionRecord {
						bait_locus,
						decode_error: Some(err.to_string()),
						..InteractionRecord::default()
					},
				}
			}
			Err(err) => InteractionRecord {
				decode_error: Some(err.to_string()),
				..InteractionRecord::default()
			},
		};
		rows.push(row);
	}
	Ok(rows)
}

/// Decode a table by file name: `.csv` files as CSV, anything else as JSON.
pub fn records_from_file(name: &str, text: &str) -> Result<Vec<InteractionRecord>, LoadError> {
	if name.to_ascii_lowercase().ends_with(".csv") {
		records_from_csv(text)
	} else {
		records_from_json(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_header_keyed_rows() {
		let text = r#"[
			{"Bait Name": "TGA3", "Bait Locus": "AT1G22070", "Bait Notes": "",
			 "Prey Locus": "AT5G65210", "Prey TAIR Symbols": "TGA1",
			 "Prey TAIR Description": "bZIP family", "Number of Interactions": "4"},
			{"Bait Locus": "AT1G22070", "Prey Locus": "AT1G64280", "Number of Interactions": 2}
		]"#;
		let rows = records_from_json(text).unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].bait_name.as_deref(), Some("TGA3"));
		assert_eq!(rows[0].bait_notes, None);
		assert_eq!(rows[0].interaction_count.as_deref(), Some("4"));
		assert_eq!(rows[1].interaction_count.as_deref(), Some("2"));
		assert_eq!(rows[1].prey_tair, None);
	}

	#[test]
	fn decodes_data_envelope() {
		let text = r#"{"data": [{"Bait Locus": "", "Prey Locus": ""}], "errors": []}"#;
		let rows = records_from_json(text).unwrap();
		assert_eq!(rows.len(), 1);
		assert!(rows[0].is_terminator());
	}

	#[test]
	fn rejects_non_table_json() {
		assert!(matches!(
			records_from_json(r#"{"rows": 3}"#),
			Err(LoadError::NotATable)
		));
		assert!(matches!(records_from_json("42"), Err(LoadError::NotATable)));
		assert!(matches!(records_from_json("[{"), Err(LoadError::Json(_))));
	}

	#[test]
	fn mistyped_row_is_kept_for_reporting() {
		let text = r#"[
			{"Bait Locus": "A", "Prey Locus": "B"},
			{"Bait Locus": "C", "Prey Locus": 42},
			{"Bait Locus": "E", "Prey Locus": "F", "Number of Interactions": true}
		]"#;
		let rows = records_from_json(text).unwrap();
		assert_eq!(rows.len(), 3);
		assert!(rows[0].validate().is_ok());
		assert_eq!(rows[1].bait_locus.as_deref(), Some("C"));
		assert!(matches!(rows[1].validate(), Err(RecordError::Undecodable(_))));
		assert!(matches!(rows[2].validate(), Err(RecordError::Undecodable(_))));
	}

	#[test]
	fn mistyped_blank_bait_row_still_terminates() {
		let rows = records_from_json(r#"[{"Bait Locus": "", "Prey Locus": false}]"#).unwrap();
		assert!(rows[0].decode_error.is_some());
		assert!(rows[0].is_terminator());
	}

	#[test]
	fn decodes_csv_with_header_row() {
		let text = "Bait Name,Bait Locus,Bait Notes,Prey Locus,Prey TAIR Symbols,Prey TAIR Description,Number of Interactions\n\
			TGA3,AT1G22070,,AT5G65210,TGA1,\"bZIP, family\",4\n\
			,AT1G22070,,AT1G64280,,,N/A\n\
			,,,,,,\n\
			NOPE,AT9G99999,,AT9G99998,,,1\n";
		let rows = records_from_csv(text).unwrap();
		assert_eq!(rows.len(), 4);
		assert_eq!(rows[0].bait_name.as_deref(), Some("TGA3"));
		assert_eq!(rows[0].bait_notes, None);
		assert_eq!(rows[0].prey_description.as_deref(), Some("bZIP, family"));
		assert_eq!(rows[0].validate().unwrap().interaction_count, Some(4));
		assert_eq!(rows[1].bait_name, None);
		assert_eq!(rows[1].validate().unwrap().rejected_count, Some("N/A"));
		assert!(rows[2].is_terminator());
		assert!(!rows[3].is_terminator());
	}

	#[test]
	fn file_name_picks_the_format() {
		let csv = records_from_file("Interactions.CSV", "Bait Locus,Prey Locus\nA,B\n").unwrap();
		assert_eq!(csv[0].prey_locus.as_deref(), Some("B"));
		let json = records_from_file("table.json", r#"[{"Bait Locus": "A", "Prey Locus": "B"}]"#).unwrap();
		assert_eq!(json, csv);
		assert!(matches!(records_from_file("table.json", "Bait Locus,Prey Locus"), Err(LoadError::Json(_))));
	}

	#[test]
	fn csv_without_bait_column_has_no_terminator() {
		let rows = records_from_csv("Prey Locus\nB\n").unwrap();
		assert_eq!(rows[0].bait_locus, None);
		assert!(!rows[0].is_terminator());
		assert_eq!(rows[0].validate(), Err(RecordError::MissingBaitLocus));
	}

	#[test]
	fn validation_reports_missing_and_bad_cells() {
		let missing_bait = InteractionRecord {
			prey_locus: Some("B".into()),
			..Default::default()
		};
		assert_eq!(missing_bait.validate(), Err(RecordError::MissingBaitLocus));
		assert!(!missing_bait.is_terminator());

		let missing_prey = InteractionRecord {
			bait_locus: Some("A".into()),
			..Default::default()
		};
		assert_eq!(
			missing_prey.validate(),
			Err(RecordError::MissingPreyLocus { bait: "A".into() })
		);

		let bad_count = InteractionRecord::new("A", "B").with_interaction_count("many");
		let valid = bad_count.validate().unwrap();
		assert_eq!(valid.interaction_count, None);
		assert_eq!(valid.rejected_count, Some("many"));
	}

	#[test]
	fn validation_trims_loci() {
		let record = InteractionRecord::new(" A ", "B\t").with_interaction_count(" 3 ");
		let valid = record.validate().unwrap();
		assert_eq!((valid.bait_locus, valid.prey_locus), ("A", "B"));
		assert_eq!(valid.interaction_count, Some(3));
	}
}
