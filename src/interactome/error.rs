//! Error types for the interactome core.
//!
//! Each concern gets its own enum so callers can match on exactly the failures
//! an operation can produce. None of these are fatal to the application; they
//! are scoped to the operation that raised them.

use thiserror::Error;

/// A single table row that cannot be turned into graph elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
	/// The row has no `Bait Locus` column at all.
	#[error("record has no bait locus")]
	MissingBaitLocus,

	/// The row has no usable `Prey Locus`.
	#[error("record for bait {bait} has no prey locus")]
	MissingPreyLocus {
		/// Locus of the bait on the offending row.
		bait: String,
	},

	/// `Number of Interactions` is present but not a non-negative integer.
	/// Reported as a note; the row is still used.
	#[error("invalid interaction count {0:?}")]
	InvalidInteractionCount(String),

	/// The row's cells have the wrong types.
	#[error("row could not be decoded: {0}")]
	Undecodable(String),
}

/// Structural violations when mutating a [`GraphStore`](super::GraphStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	/// A node with this locus already exists.
	#[error("duplicate node: {0}")]
	DuplicateNode(String),

	/// An edge with this identity already exists.
	#[error("duplicate entry: {0}")]
	DuplicateEdge(String),

	/// An edge references a node that is not in the store.
	#[error("edge {edge} references unknown node {locus}")]
	MissingEndpoint {
		/// Identity of the rejected edge.
		edge: String,
		/// The endpoint that could not be resolved.
		locus: String,
	},
}

/// Caller errors against the focus navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// Neighborhood radius must be at least 1.
	#[error("neighborhood radius must be >= 1, got {0}")]
	InvalidRadius(usize),

	/// The navigator was never seeded with a whole-graph view.
	#[error("focus stack has no base view")]
	NoBaseView,
}

/// Failures of the clustering collaborator or of its result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
	/// The clusterer returned nothing for a non-empty graph.
	#[error("clustering returned no clusters for {nodes} nodes")]
	EmptyResult {
		/// Number of nodes in the graph that was clustered.
		nodes: usize,
	},

	/// A cluster names a locus that is not in the graph.
	#[error("cluster {cluster} contains unknown node {locus}")]
	UnknownNode {
		/// Index of the offending cluster.
		cluster: usize,
		/// The unknown locus.
		locus: String,
	},

	/// A node was placed in more than one cluster.
	#[error("node {0} appears in more than one cluster")]
	Overlapping(String),
}

/// A string that is not a canonical `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed color {0:?}, expected #rrggbb")]
pub struct ColorError(pub String);

/// Failures decoding an interaction table or a config document.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The text is not valid JSON.
	#[error("table is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// Valid JSON, but neither an array of rows nor an object with `data` rows.
	#[error("expected an array of rows or an object with a \"data\" array")]
	NotATable,

	/// The CSV header row could not be read.
	#[error("table is not valid CSV: {0}")]
	Csv(#[from] csv::Error),

	/// Config overrides could not be decoded.
	#[error("invalid viewer config: {0}")]
	Config(serde_json::Error),
}
