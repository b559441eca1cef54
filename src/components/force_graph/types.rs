use crate::interactome::{Color, GraphStore};

/// Fill for nodes that were given a bait name but no cluster color.
pub const NAMED_COLOR: Color = Color::rgb(0x00, 0x80, 0x00);
/// Fill for everything else without a cluster color.
pub const UNNAMED_COLOR: Color = Color::rgb(0xd3, 0xd3, 0xd3);

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub color: Color,
	pub degree: usize,
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub id: String,
	pub source: String,
	pub target: String,
	pub color: Option<Color>,
	pub width: f64,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Snapshot of what the canvas needs from the store.
	pub fn from_store(store: &GraphStore) -> Self {
		let nodes = store
			.nodes()
			.map(|node| GraphNode {
				id: node.id.clone(),
				label: node.name.clone(),
				color: node.cluster_color.unwrap_or(if node.named {
					NAMED_COLOR
				} else {
					UNNAMED_COLOR
				}),
				degree: store.degree(&node.id),
			})
			.collect();

		let links = store
			.edges()
			.map(|edge| GraphLink {
				id: edge.id.clone(),
				source: edge.source.clone(),
				target: edge.target.clone(),
				color: edge.color,
				width: link_width(edge.interaction_count),
			})
			.collect();

		Self { nodes, links }
	}
}

/// Stroke width grows with the log of the interaction count.
fn link_width(count: Option<u32>) -> f64 {
	let count = f64::from(count.unwrap_or(1).max(1));
	(0.9 + count.log2()).max(1.0)
}
