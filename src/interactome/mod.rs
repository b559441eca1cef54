//! Bait/prey interaction graphs: construction, cluster coloring and focus
//! navigation. Nothing in here touches the DOM.

mod builder;
mod cluster;
mod color;
mod config;
mod error;
mod navigator;
mod record;
mod store;

pub use builder::{GraphBuilder, IngestReport, RowIssue};
pub use cluster::{ClusterColorer, Clusterer, MarkovClustering};
pub use color::{Color, DEFAULT_TARGET_BRIGHTNESS};
pub use config::{ColoringParams, FocusStyle, LayoutParams, MclParams, ViewerConfig};
pub use error::{ClusterError, ColorError, LoadError, NavigationError, RecordError, StoreError};
pub use navigator::{Emphasis, FocusNavigator, PendingEmphasis, View, ViewOrigin, ViewRefresh};
pub use record::{InteractionRecord, ValidRecord, records_from_csv, records_from_file, records_from_json};
pub use store::{Edge, ElementId, Elements, GraphStore, Node};
