use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::state::ForceGraphState;
use super::types::GraphData;
use crate::interactome::{
	ClusterColorer, ClusterError, ElementId, Elements, FocusNavigator, GraphBuilder, GraphStore,
	IngestReport, InteractionRecord, MarkovClustering, NavigationError, PendingEmphasis,
	ViewerConfig,
};

/// What a node click does to the current focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickMode {
	/// Replace the focus with the clicked neighborhood.
	Focus,
	/// Add the clicked neighborhood to the focus.
	Extend,
	/// Remove the clicked neighborhood from the focus.
	Subtract,
}

impl ClickMode {
	pub fn from_modifiers(shift: bool, alt: bool) -> Self {
		if shift {
			Self::Extend
		} else if alt {
			Self::Subtract
		} else {
			Self::Focus
		}
	}
}

/// Result of loading a table into a new session.
#[derive(Debug)]
pub struct LoadSummary {
	pub report: IngestReport,
	pub clusters: Result<usize, ClusterError>,
}

impl LoadSummary {
	pub fn status(&self, store: &GraphStore) -> String {
		let graph = format!("{} proteins, {} interactions", store.node_count(), store.edge_count());
		let mut status = match &self.clusters {
			Ok(n) => format!("Graph ready! {graph}, {n} clusters."),
			Err(err) => format!("Graph loaded ({graph}), but coloring failed: {err}"),
		};
		if !self.report.duplicates.is_empty() {
			status.push_str(&format!(" {} duplicate entries skipped.", self.report.duplicates.len()));
		}
		if !self.report.skipped.is_empty() {
			status.push_str(&format!(" {} malformed rows skipped.", self.report.skipped.len()));
		}
		if !self.report.ignored_counts.is_empty() {
			status.push_str(&format!(
				" {} unreadable interaction counts ignored.",
				self.report.ignored_counts.len()
			));
		}
		status
	}
}

/// Everything one loaded table needs: the graph, its focus history and the
/// canvas state drawn from it.
pub struct Session {
	store: GraphStore,
	navigator: FocusNavigator<PendingEmphasis>,
	pub canvas: ForceGraphState,
}

impl Session {
	/// Build, color and lay out a graph from table rows.
	pub fn from_records(
		records: Vec<InteractionRecord>,
		config: &ViewerConfig,
		seed: u64,
		width: f64,
		height: f64,
	) -> (Self, LoadSummary) {
		let mut store = GraphStore::new();
		let report = GraphBuilder::new(&mut store).ingest(records);

		let mut colorer = ClusterColorer::new(
			MarkovClustering::new(config.clustering.clone()),
			SmallRng::seed_from_u64(seed),
		)
		.with_target_brightness(config.coloring.target_brightness);
		let clusters = colorer.colorize(&mut store);
		if let Err(err) = &clusters {
			warn!("cluster coloring failed: {err}");
		}

		let canvas = ForceGraphState::new(
			&GraphData::from_store(&store),
			&config.layout,
			config.focus.clone(),
			width,
			height,
		);
		let navigator = FocusNavigator::new(&store, PendingEmphasis::default());
		let mut session = Self {
			store,
			navigator,
			canvas,
		};
		session.sync();
		(session, LoadSummary { report, clusters })
	}

	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	pub fn depth(&self) -> usize {
		self.navigator.depth()
	}

	/// Route a click on `locus`. `clicks` is the browser's repeat count; a
	/// single click selects the one-hop neighborhood.
	pub fn node_click(&mut self, locus: &str, mode: ClickMode, clicks: usize) -> Result<(), NavigationError> {
		let seed: Elements = [ElementId::node(locus)].into_iter().collect();
		let n = clicks.max(1) + 1;
		info!("{mode:?} click on {locus} with radius {n}");
		match mode {
			ClickMode::Focus => self.navigator.click(&self.store, &seed, n)?,
			ClickMode::Extend => self.navigator.shift_click(&self.store, &seed, n)?,
			ClickMode::Subtract => self.navigator.alt_click(&self.store, &seed, n)?,
		};
		self.sync();
		Ok(())
	}

	pub fn clear_focus(&mut self) -> Result<(), NavigationError> {
		self.navigator.clear(&self.store)?;
		self.sync();
		Ok(())
	}

	pub fn back(&mut self) -> Result<bool, NavigationError> {
		let popped = self.navigator.back(&self.store)?;
		self.sync();
		Ok(popped)
	}

	pub fn details(&self, locus: &str) -> Vec<(String, String)> {
		self.store
			.node(locus)
			.map(|node| {
				node.details()
					.into_iter()
					.map(|(k, v)| (k.to_string(), v))
					.collect()
			})
			.unwrap_or_default()
	}

	fn sync(&mut self) {
		if let Some(emphasis) = self.navigator.refresher_mut().take() {
			self.canvas.apply_emphasis(&emphasis);
		}
	}
}
