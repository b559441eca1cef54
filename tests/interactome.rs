use std::collections::HashSet;

use interactome_viewer::interactome::{
	ClusterColorer, ClusterError, Color, ElementId, Elements, FocusNavigator, GraphBuilder, GraphStore,
	InteractionRecord, MarkovClustering, NavigationError, PendingEmphasis, RecordError, ViewOrigin,
	ViewerConfig, records_from_csv, records_from_json,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLE: &str = include_str!("../assets/sample_interactions.json");

fn set(ids: &[&str]) -> Elements {
	ids.iter()
		.map(|id| {
			if id.contains('_') {
				ElementId::edge(*id)
			} else {
				ElementId::node(*id)
			}
		})
		.collect()
}

fn chain() -> GraphStore {
	let mut store = GraphStore::new();
	GraphBuilder::new(&mut store).ingest(vec![
		InteractionRecord::new("A", "B"),
		InteractionRecord::new("B", "C"),
		InteractionRecord::new("C", "D"),
	]);
	store
}

fn is_canonical_hex(s: &str) -> bool {
	s.len() == 7
		&& s.starts_with('#')
		&& s[1..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[test]
fn sample_table_builds_the_expected_graph() {
	let rows = records_from_json(SAMPLE).unwrap();
	let mut store = GraphStore::new();
	let report = GraphBuilder::new(&mut store).ingest(rows);

	assert_eq!(report.terminated_at, Some(23));
	assert_eq!(report.rows_read, 23);
	assert_eq!(report.duplicates, vec!["AT1G22070_AT5G45110"]);
	assert!(report.skipped.is_empty());
	assert_eq!(store.node_count(), 19);
	assert_eq!(store.edge_count(), 22);
	assert_eq!(store.edge_count(), report.edges_created);
	assert!(store.node("AT9G99999").is_none());

	// First row for AT3G17860 had no bait name, the later one does.
	let jaz3 = store.node("AT3G17860").unwrap();
	assert!(jaz3.named);
	assert_eq!(jaz3.name, "JAZ3");
	assert!(store.edge("AT3G17860_AT1G17380").is_some());

	let npr1 = store.node("AT1G64280").unwrap();
	assert_eq!(npr1.name, "NPR1");
	assert_eq!(npr1.bait_notes.as_deref(), Some("salicylic acid receptor"));
	assert_eq!(npr1.prey_tair.as_deref(), Some("NPR1"));

	let prey_only = store.node("AT3G62980").unwrap();
	assert!(!prey_only.named);
	assert_eq!(prey_only.name, "AT3G62980");
	assert_eq!(store.edge("AT4G14560_AT3G62980").unwrap().interaction_count, Some(7));
	assert_eq!(store.edge("AT5G06950_AT1G64280").unwrap().interaction_count, None);
}

#[test]
fn csv_table_keeps_good_rows_around_bad_cells() {
	let text = "\
Bait Name,Bait Locus,Bait Notes,Prey Locus,Prey TAIR Symbols,Prey TAIR Description,Number of Interactions
TGA3,AT1G22070,,AT5G45110,NPR3,NPR1-like protein 3,3.0
TGA3,AT1G22070,,AT1G64280,NPR1,regulatory protein NPR1,N/A
,AT1G64280,,,,,2
NPR1,AT1G64280,,AT5G65210,TGA1,,4
,,,,,,
JAZ1,AT1G19180,,AT1G32640,MYC2,,6
";
	let rows = records_from_csv(text).unwrap();
	let mut store = GraphStore::new();
	let report = GraphBuilder::new(&mut store).ingest(rows);

	assert_eq!(report.terminated_at, Some(4));
	assert_eq!(report.edges_created, 3);
	assert_eq!(report.ignored_counts.len(), 2);
	assert_eq!(report.skipped.len(), 1);
	assert_eq!(report.skipped[0].row, 2);
	assert!(matches!(report.skipped[0].error, RecordError::MissingPreyLocus { .. }));
	assert_eq!(store.edge("AT1G22070_AT5G45110").unwrap().interaction_count, None);
	assert_eq!(store.edge("AT1G64280_AT5G65210").unwrap().interaction_count, Some(4));
	assert_eq!(store.node("AT1G64280").unwrap().name, "NPR1");
	assert!(store.node("AT1G19180").is_none());
}

#[test]
fn ingesting_the_same_table_twice_changes_nothing() {
	let rows = records_from_json(SAMPLE).unwrap();
	let mut store = GraphStore::new();
	GraphBuilder::new(&mut store).ingest(rows.clone());
	let before = store.all_elements();

	let again = GraphBuilder::new(&mut store).ingest(rows);
	assert_eq!(store.all_elements(), before);
	assert_eq!(again.nodes_created, 0);
	assert_eq!(again.edges_created, 0);
	assert_eq!(again.duplicates.len(), 23);

	let ids: HashSet<&str> = store.nodes().map(|n| n.id.as_str()).collect();
	assert_eq!(ids.len(), store.node_count());
}

#[test]
fn clustering_colors_every_node_and_edge_canonically() {
	let config = ViewerConfig::default();
	let mut store = GraphStore::new();
	GraphBuilder::new(&mut store).ingest(records_from_json(SAMPLE).unwrap());

	let mut colorer = ClusterColorer::new(MarkovClustering::new(config.clustering), SmallRng::seed_from_u64(7));
	let clusters = colorer.colorize(&mut store).unwrap();
	assert!(clusters >= 3, "auxin, jasmonate and salicylate modules are disjoint, got {clusters}");

	for node in store.nodes() {
		let color = node.cluster_color.unwrap();
		assert!(is_canonical_hex(&color.to_string()), "{color}");
		assert!(node.cluster_id.unwrap() < clusters);
	}
	for edge in store.edges() {
		let source = store.node(&edge.source).unwrap().cluster_color.unwrap();
		let target = store.node(&edge.target).unwrap().cluster_color.unwrap();
		assert_eq!(edge.color, Some(source.average(target)));
	}

	// Nodes from disconnected modules never share a cluster.
	let jasmonate = store.node("AT1G19180").unwrap().cluster_id;
	let auxin = store.node("AT1G19850").unwrap().cluster_id;
	assert_ne!(jasmonate, auxin);
}

#[test]
fn failing_clusterer_leaves_graph_uncolored() {
	let mut store = chain();
	let nothing = |_: &GraphStore| -> Result<Vec<Vec<String>>, ClusterError> { Ok(Vec::new()) };
	let mut colorer = ClusterColorer::new(nothing, SmallRng::seed_from_u64(1));
	assert_eq!(colorer.colorize(&mut store), Err(ClusterError::EmptyResult { nodes: 4 }));
	assert!(store.nodes().all(|n| n.cluster_color.is_none()));
	assert!(store.edges().all(|e| e.color.is_none()));
}

#[test]
fn color_average_and_parsing() {
	let c: Color = "#1a2b3c".parse().unwrap();
	assert_eq!(c.average(c), c);
	assert_eq!(c.to_string(), "#1a2b3c");
	assert!("1a2b3c".parse::<Color>().is_err());
}

#[test]
fn click_semantics_on_a_chain() {
	let store = chain();
	let mut nav = FocusNavigator::new(&store, PendingEmphasis::default());

	let view = nav.click(&store, &set(&["B"]), 2).unwrap();
	assert_eq!(view.elements(), &set(&["A", "B", "C", "A_B", "B_C"]));

	let view = nav.shift_click(&store, &set(&["D"]), 2).unwrap();
	assert_eq!(view.elements(), &store.all_elements());
	assert_eq!(view.origin(), ViewOrigin::Union);

	let view = nav.alt_click(&store, &set(&["D"]), 2).unwrap();
	assert_eq!(view.elements(), &set(&["A", "B", "C", "A_B", "B_C"]));

	let emphasis = nav.refresher_mut().take().unwrap();
	assert_eq!(emphasis.dimmed, set(&["D", "C_D"]));

	assert_eq!(nav.depth(), 4);
	assert_eq!(nav.back(&store), Ok(true));
	assert_eq!(nav.current().unwrap().elements(), &store.all_elements());
}

#[test]
fn stack_depth_tracks_pushes_and_pops() {
	let store = chain();
	let mut nav = FocusNavigator::new(&store, PendingEmphasis::default());
	let mut expected = 1;
	for (i, locus) in ["A", "B", "C", "D", "A"].into_iter().enumerate() {
		let seed = set(&[locus]);
		if i % 2 == 0 {
			nav.click(&store, &seed, 2).unwrap();
		} else {
			nav.shift_click(&store, &seed, 3).unwrap();
		}
		expected += 1;
		assert_eq!(nav.depth(), expected);
	}
	while nav.back(&store).unwrap() {
		expected -= 1;
		assert_eq!(nav.depth(), expected);
	}
	assert_eq!(nav.depth(), 1);
}

#[test]
fn radius_zero_is_an_error_not_a_push() {
	let store = chain();
	let mut nav = FocusNavigator::new(&store, PendingEmphasis::default());
	assert!(matches!(
		nav.alt_click(&store, &set(&["A"]), 0),
		Err(NavigationError::InvalidRadius(0))
	));
	assert_eq!(nav.depth(), 1);
}
