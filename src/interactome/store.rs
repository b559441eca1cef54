//! Owned, mutable interaction graph with the set algebra the navigator needs.

use std::collections::btree_set;
use std::collections::{BTreeSet, HashMap};

use super::color::Color;
use super::error::StoreError;

/// Identity of a graph element. Nodes and edges live in separate namespaces.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
	/// A node, keyed by locus.
	Node(String),
	/// An edge, keyed by `bait_prey`.
	Edge(String),
}

impl ElementId {
	/// Node identity for a locus.
	pub fn node(locus: impl Into<String>) -> Self {
		Self::Node(locus.into())
	}

	/// Edge identity from its composite key.
	pub fn edge(id: impl Into<String>) -> Self {
		Self::Edge(id.into())
	}

	/// The raw key, without the namespace.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Node(id) | Self::Edge(id) => id,
		}
	}

	/// Whether this identifies a node.
	pub fn is_node(&self) -> bool {
		matches!(self, Self::Node(_))
	}

	/// Whether this identifies an edge.
	pub fn is_edge(&self) -> bool {
		matches!(self, Self::Edge(_))
	}
}

/// An ordered set of element identities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Elements(BTreeSet<ElementId>);

impl Elements {
	/// The empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the set is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Membership test.
	pub fn contains(&self, id: &ElementId) -> bool {
		self.0.contains(id)
	}

	/// Insert one element; returns whether it was new.
	pub fn insert(&mut self, id: ElementId) -> bool {
		self.0.insert(id)
	}

	/// Iterate in identity order.
	pub fn iter(&self) -> btree_set::Iter<'_, ElementId> {
		self.0.iter()
	}

	/// Loci of the nodes in the set.
	pub fn nodes(&self) -> impl Iterator<Item = &str> {
		self.0.iter().filter(|id| id.is_node()).map(ElementId::as_str)
	}

	/// Identities of the edges in the set.
	pub fn edges(&self) -> impl Iterator<Item = &str> {
		self.0.iter().filter(|id| id.is_edge()).map(ElementId::as_str)
	}

	/// `self ∪ other`.
	pub fn union(&self, other: &Elements) -> Elements {
		Self(self.0.union(&other.0).cloned().collect())
	}

	/// `self \ other`.
	pub fn difference(&self, other: &Elements) -> Elements {
		Self(self.0.difference(&other.0).cloned().collect())
	}

	/// Whether every element of `self` is in `other`.
	pub fn is_subset(&self, other: &Elements) -> bool {
		self.0.is_subset(&other.0)
	}
}

impl FromIterator<ElementId> for Elements {
	fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl Extend<ElementId> for Elements {
	fn extend<I: IntoIterator<Item = ElementId>>(&mut self, iter: I) {
		self.0.extend(iter);
	}
}

impl<'a> IntoIterator for &'a Elements {
	type Item = &'a ElementId;
	type IntoIter = btree_set::Iter<'a, ElementId>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// A protein, keyed by locus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	/// Locus, the node identity.
	pub id: String,
	/// Display name; the locus until a bait name is seen.
	pub name: String,
	/// Set once a bait name has been applied.
	pub named: bool,
	/// Free-text notes from the bait columns.
	pub bait_notes: Option<String>,
	/// TAIR gene symbols from the prey columns.
	pub prey_tair: Option<String>,
	/// TAIR description from the prey columns.
	pub prey_description: Option<String>,
	/// Index of the cluster this node was last assigned to.
	pub cluster_id: Option<usize>,
	/// Display color of that cluster.
	pub cluster_color: Option<Color>,
}

impl Node {
	/// A fresh node whose name is its locus.
	pub fn new(locus: impl Into<String>) -> Self {
		let id = locus.into();
		Self {
			name: id.clone(),
			id,
			named: false,
			bait_notes: None,
			prey_tair: None,
			prey_description: None,
			cluster_id: None,
			cluster_color: None,
		}
	}

	/// Key/value pairs describing this node, for detail panels.
	pub fn details(&self) -> Vec<(&'static str, String)> {
		let mut out = vec![("id", self.id.clone()), ("name", self.name.clone())];
		let optional = [
			("bait_notes", self.bait_notes.clone()),
			("prey_tair", self.prey_tair.clone()),
			("prey_description", self.prey_description.clone()),
			("cluster", self.cluster_id.map(|c| c.to_string())),
			("cluster_color", self.cluster_color.map(|c| c.to_string())),
		];
		out.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
		out
	}
}

/// A directed bait → prey interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// `source_target` composite identity.
	pub id: String,
	/// Bait locus.
	pub source: String,
	/// Prey locus.
	pub target: String,
	/// Number of observed interactions, if reported.
	pub interaction_count: Option<u32>,
	/// Blend of the endpoint cluster colors.
	pub color: Option<Color>,
}

impl Edge {
	/// A new edge with its identity derived from the endpoints.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			id: Self::identity(&source, &target),
			source,
			target,
			interaction_count: None,
			color: None,
		}
	}

	/// Composite identity of the edge `source → target`.
	pub fn identity(source: &str, target: &str) -> String {
		format!("{source}_{target}")
	}
}

/// The graph all core components operate on.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: Vec<Node>,
	node_index: HashMap<String, usize>,
	edges: Vec<Edge>,
	edge_index: HashMap<String, usize>,
	incident: HashMap<String, Vec<usize>>,
}

impl GraphStore {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
		self.nodes.iter_mut()
	}

	pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
		self.edges.iter_mut()
	}

	/// Look up a node by locus.
	pub fn node(&self, locus: &str) -> Option<&Node> {
		self.node_index.get(locus).map(|&i| &self.nodes[i])
	}

	/// Mutable node lookup.
	pub fn node_mut(&mut self, locus: &str) -> Option<&mut Node> {
		self.node_index.get(locus).map(|&i| &mut self.nodes[i])
	}

	/// Look up an edge by identity.
	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	/// Whether the element exists in the graph.
	pub fn contains(&self, id: &ElementId) -> bool {
		match id {
			ElementId::Node(locus) => self.node_index.contains_key(locus),
			ElementId::Edge(edge) => self.edge_index.contains_key(edge),
		}
	}

	/// Number of edges touching a node, in either direction.
	pub fn degree(&self, locus: &str) -> usize {
		self.incident.get(locus).map_or(0, Vec::len)
	}

	/// Add a node; its locus must be new.
	pub fn add_node(&mut self, node: Node) -> Result<&mut Node, StoreError> {
		if self.node_index.contains_key(&node.id) {
			return Err(StoreError::DuplicateNode(node.id));
		}
		let idx = self.nodes.len();
		self.node_index.insert(node.id.clone(), idx);
		self.nodes.push(node);
		Ok(&mut self.nodes[idx])
	}

	/// Return the node for `locus`, creating it first if needed.
	/// The flag reports whether it was created.
	pub fn ensure_node(&mut self, locus: &str) -> (&mut Node, bool) {
		match self.node_index.get(locus) {
			Some(&idx) => (&mut self.nodes[idx], false),
			None => {
				let idx = self.nodes.len();
				self.node_index.insert(locus.to_string(), idx);
				self.nodes.push(Node::new(locus));
				(&mut self.nodes[idx], true)
			}
		}
	}

	/// Add an edge; both endpoints must exist and its identity must be new.
	pub fn add_edge(&mut self, edge: Edge) -> Result<&Edge, StoreError> {
		if self.edge_index.contains_key(&edge.id) {
			return Err(StoreError::DuplicateEdge(edge.id));
		}
		for endpoint in [&edge.source, &edge.target] {
			if !self.node_index.contains_key(endpoint) {
				return Err(StoreError::MissingEndpoint {
					edge: edge.id.clone(),
					locus: endpoint.clone(),
				});
			}
		}
		let idx = self.edges.len();
		self.incident.entry(edge.source.clone()).or_default().push(idx);
		if edge.target != edge.source {
			self.incident.entry(edge.target.clone()).or_default().push(idx);
		}
		self.edge_index.insert(edge.id.clone(), idx);
		self.edges.push(edge);
		Ok(&self.edges[idx])
	}

	/// Source and target loci of an edge.
	pub fn endpoints(&self, edge: &str) -> Option<(&str, &str)> {
		self.edge(edge)
			.map(|e| (e.source.as_str(), e.target.as_str()))
	}

	/// Loci of the nodes adjacent to `locus`, in either direction.
	pub fn neighbor_loci(&self, locus: &str) -> impl Iterator<Item = &str> {
		self.incident
			.get(locus)
			.into_iter()
			.flatten()
			.map(move |&i| {
				let e = &self.edges[i];
				if e.source == locus {
					e.target.as_str()
				} else {
					e.source.as_str()
				}
			})
	}

	/// Every node and edge currently in the graph.
	pub fn all_elements(&self) -> Elements {
		self.nodes
			.iter()
			.map(|n| ElementId::node(n.id.as_str()))
			.chain(self.edges.iter().map(|e| ElementId::edge(e.id.as_str())))
			.collect()
	}

	/// `set` plus everything one hop away from it.
	///
	/// A node contributes its incident edges and the nodes at their far ends;
	/// an edge contributes its two endpoints. Unknown ids are kept as-is.
	pub fn neighbors_of(&self, set: &Elements) -> Elements {
		let mut out = set.clone();
		for id in set {
			match id {
				ElementId::Node(locus) => {
					for &i in self.incident.get(locus).into_iter().flatten() {
						let e = &self.edges[i];
						out.insert(ElementId::edge(e.id.as_str()));
						out.insert(ElementId::node(e.source.as_str()));
						out.insert(ElementId::node(e.target.as_str()));
					}
				}
				ElementId::Edge(edge) => {
					if let Some((source, target)) = self.endpoints(edge) {
						out.insert(ElementId::node(source));
						out.insert(ElementId::node(target));
					}
				}
			}
		}
		out
	}

	/// Every element of the graph that is not in `set`.
	pub fn complement(&self, set: &Elements) -> Elements {
		self.all_elements().difference(set)
	}
}
