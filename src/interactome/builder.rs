//! Turns interaction rows into nodes and edges.

use log::{debug, info, warn};

use super::error::{RecordError, StoreError};
use super::record::{InteractionRecord, ValidRecord};
use super::store::{Edge, GraphStore};

/// A problem with one input row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowIssue {
	/// Zero-based row index in the input sequence.
	pub row: usize,
	/// What was wrong with it.
	pub error: RecordError,
}

/// Outcome of one [`GraphBuilder::ingest`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
	/// Rows examined, excluding the terminator and anything after it.
	pub rows_read: usize,
	/// Nodes created by this call.
	pub nodes_created: usize,
	/// Edges created by this call.
	pub edges_created: usize,
	/// Identities of edges that already existed.
	pub duplicates: Vec<String>,
	/// Malformed rows, which were not applied.
	pub skipped: Vec<RowIssue>,
	/// Rows applied without their unreadable interaction count.
	pub ignored_counts: Vec<RowIssue>,
	/// Row index of the blank-bait terminator, if one was reached.
	pub terminated_at: Option<usize>,
}

/// Applies interaction rows to a [`GraphStore`].
///
/// Nodes are created the first time a locus is seen. A bait name is applied
/// once and then sticks; notes and TAIR columns are only filled when the node
/// does not have them yet. Each bait/prey pair yields at most one edge.
pub struct GraphBuilder<'a> {
	store: &'a mut GraphStore,
}

impl<'a> GraphBuilder<'a> {
	/// A builder writing into `store`.
	pub fn new(store: &'a mut GraphStore) -> Self {
		Self { store }
	}

	/// Ingest rows in order, stopping at the first row with a blank bait locus.
	pub fn ingest<I>(&mut self, records: I) -> IngestReport
	where
		I: IntoIterator<Item = InteractionRecord>,
	{
		let mut report = IngestReport::default();

		for (row, record) in records.into_iter().enumerate() {
			if record.is_terminator() {
				debug!("blank bait locus at row {row}, ending ingestion");
				report.terminated_at = Some(row);
				break;
			}
			report.rows_read += 1;

			let valid = match record.validate() {
				Ok(valid) => valid,
				Err(error) => {
					warn!("skipping row {row}: {error}");
					report.skipped.push(RowIssue { row, error });
					continue;
				}
			};
			if let Some(raw) = valid.rejected_count {
				warn!("row {row}: ignoring interaction count {raw:?}");
				report.ignored_counts.push(RowIssue {
					row,
					error: RecordError::InvalidInteractionCount(raw.to_string()),
				});
			}

			match self.apply(&valid, &mut report) {
				Ok(()) => {}
				Err(StoreError::DuplicateEdge(id)) => {
					warn!("duplicate entry: {id}");
					report.duplicates.push(id);
				}
				Err(error) => warn!("row {row}: {error}"),
			}
		}

		info!(
			"ingested {} rows: {} nodes, {} edges created, {} duplicates, {} skipped, {} counts ignored",
			report.rows_read,
			report.nodes_created,
			report.edges_created,
			report.duplicates.len(),
			report.skipped.len(),
			report.ignored_counts.len()
		);
		report
	}

	fn apply(&mut self, record: &ValidRecord<'_>, report: &mut IngestReport) -> Result<(), StoreError> {
		let (bait, created) = self.store.ensure_node(record.bait_locus);
		report.nodes_created += usize::from(created);
		if let Some(name) = record.bait_name {
			if !bait.named {
				bait.named = true;
				bait.name = name.to_string();
			}
		}
		if bait.bait_notes.is_none() {
			bait.bait_notes = record.bait_notes.map(str::to_string);
		}

		let (prey, created) = self.store.ensure_node(record.prey_locus);
		report.nodes_created += usize::from(created);
		if prey.prey_tair.is_none() {
			prey.prey_tair = record.prey_tair.map(str::to_string);
		}
		if prey.prey_description.is_none() {
			prey.prey_description = record.prey_description.map(str::to_string);
		}

		let mut edge = Edge::new(record.bait_locus, record.prey_locus);
		edge.interaction_count = record.interaction_count;
		self.store.add_edge(edge)?;
		report.edges_created += 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::interactome::store::{ElementId, Elements};

	fn row(bait: &str, prey: &str) -> InteractionRecord {
		InteractionRecord::new(bait, prey)
	}

	#[test]
	fn creates_nodes_and_edges_once() {
		let mut store = GraphStore::new();
		let report = GraphBuilder::new(&mut store).ingest(vec![
			row("A", "B").with_interaction_count(3),
			row("A", "C"),
			row("B", "C"),
		]);
		assert_eq!(report.nodes_created, 3);
		assert_eq!(report.edges_created, 3);
		assert_eq!(store.node_count(), 3);
		assert_eq!(store.edge("A_B").unwrap().interaction_count, Some(3));
		assert_eq!(store.node("C").unwrap().name, "C");
	}

	#[test]
	fn reingesting_reports_every_edge_as_duplicate() {
		let rows = vec![row("A", "B"), row("B", "C"), row("C", "A")];
		let mut store = GraphStore::new();
		GraphBuilder::new(&mut store).ingest(rows.clone());
		let before = store.all_elements();

		let second = GraphBuilder::new(&mut store).ingest(rows);
		assert_eq!(second.duplicates, vec!["A_B", "B_C", "C_A"]);
		assert_eq!(second.nodes_created, 0);
		assert_eq!(second.edges_created, 0);
		assert_eq!(store.all_elements(), before);
	}

	#[test]
	fn first_bait_name_sticks() {
		let mut store = GraphStore::new();
		GraphBuilder::new(&mut store).ingest(vec![
			row("A", "B").with_bait_name("Foo"),
			row("A", "C").with_bait_name("Bar"),
		]);
		let a = store.node("A").unwrap();
		assert_eq!(a.name, "Foo");
		assert!(a.named);
	}

	#[test]
	fn prey_node_can_be_named_later_as_bait() {
		let mut store = GraphStore::new();
		GraphBuilder::new(&mut store).ingest(vec![
			row("A", "B"),
			row("B", "C").with_bait_name("Beta"),
		]);
		assert_eq!(store.node("B").unwrap().name, "Beta");
		assert!(!store.node("A").unwrap().named);
	}

	#[test]
	fn attributes_are_set_if_absent() {
		let mut first = row("A", "B");
		first.bait_notes = Some("first".into());
		first.prey_tair = Some("TGA1".into());
		let mut second = row("A", "B");
		second.bait_notes = Some("second".into());
		second.prey_tair = Some("TGA2".into());
		second.prey_description = Some("bZIP".into());

		let mut store = GraphStore::new();
		GraphBuilder::new(&mut store).ingest(vec![first, second]);
		assert_eq!(store.node("A").unwrap().bait_notes.as_deref(), Some("first"));
		let b = store.node("B").unwrap();
		assert_eq!(b.prey_tair.as_deref(), Some("TGA1"));
		assert_eq!(b.prey_description.as_deref(), Some("bZIP"));
	}

	#[test]
	fn stops_at_blank_bait_locus() {
		let mut store = GraphStore::new();
		let report = GraphBuilder::new(&mut store).ingest(vec![
			row("A", "B"),
			row("", "X"),
			row("C", "D"),
		]);
		assert_eq!(report.terminated_at, Some(1));
		assert_eq!(report.rows_read, 1);
		let expected: Elements = [
			ElementId::node("A"),
			ElementId::node("B"),
			ElementId::edge("A_B"),
		]
		.into_iter()
		.collect();
		assert_eq!(store.all_elements(), expected);
		assert!(store.node("C").is_none());
		assert!(store.node("D").is_none());
	}

	#[test]
	fn malformed_rows_touch_nothing() {
		let mut store = GraphStore::new();
		let no_prey = InteractionRecord {
			bait_locus: Some("Q".into()),
			bait_name: Some("Ghost".into()),
			..Default::default()
		};
		let undecodable = InteractionRecord {
			bait_locus: Some("R".into()),
			decode_error: Some("invalid type: integer `42`, expected a string".into()),
			..Default::default()
		};
		let report = GraphBuilder::new(&mut store).ingest(vec![no_prey, undecodable, row("A", "B")]);

		assert_eq!(report.skipped.len(), 2);
		assert_eq!(report.skipped[0].row, 0);
		assert_eq!(report.skipped[1].row, 1);
		assert!(matches!(report.skipped[1].error, RecordError::Undecodable(_)));
		assert_eq!(store.node_count(), 2);
		assert!(store.node("Q").is_none());
		assert!(store.node("R").is_none());
	}

	#[test]
	fn unreadable_count_keeps_the_interaction() {
		let mut store = GraphStore::new();
		let report = GraphBuilder::new(&mut store).ingest(vec![
			row("A", "B").with_interaction_count("3.0"),
			row("A", "C").with_interaction_count("N/A"),
			row("A", "D").with_interaction_count(2),
		]);

		assert!(report.skipped.is_empty());
		assert_eq!(report.edges_created, 3);
		assert_eq!(store.edge("A_B").unwrap().interaction_count, None);
		assert_eq!(store.edge("A_C").unwrap().interaction_count, None);
		assert_eq!(store.edge("A_D").unwrap().interaction_count, Some(2));
		assert_eq!(
			report.ignored_counts,
			vec![
				RowIssue {
					row: 0,
					error: RecordError::InvalidInteractionCount("3.0".into()),
				},
				RowIssue {
					row: 1,
					error: RecordError::InvalidInteractionCount("N/A".into()),
				},
			]
		);
	}

	#[test]
	fn one_mistyped_json_row_does_not_sink_the_table() {
		let rows = crate::interactome::records_from_json(
			r#"[
				{"Bait Locus": "A", "Prey Locus": "B"},
				{"Bait Locus": "C", "Prey Locus": 42},
				{"Bait Locus": "E", "Prey Locus": "F"}
			]"#,
		)
		.unwrap();
		let mut store = GraphStore::new();
		let report = GraphBuilder::new(&mut store).ingest(rows);

		assert_eq!(report.edges_created, 2);
		assert_eq!(report.skipped.len(), 1);
		assert_eq!(report.skipped[0].row, 1);
		assert!(store.edge("A_B").is_some());
		assert!(store.edge("E_F").is_some());
		assert!(store.node("C").is_none());
	}
}
