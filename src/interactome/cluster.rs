//! Clustering collaborator and cluster coloring.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use rand::Rng;

use super::color::{Color, DEFAULT_TARGET_BRIGHTNESS};
use super::config::MclParams;
use super::error::ClusterError;
use super::store::GraphStore;

/// Groups the nodes of a graph.
///
/// Implementations return disjoint clusters of node loci, in a stable order,
/// covering every node of the graph (isolated nodes as singletons).
pub trait Clusterer {
	/// Cluster every node of `store`.
	fn cluster(&self, store: &GraphStore) -> Result<Vec<Vec<String>>, ClusterError>;
}

impl<F> Clusterer for F
where
	F: Fn(&GraphStore) -> Result<Vec<Vec<String>>, ClusterError>,
{
	fn cluster(&self, store: &GraphStore) -> Result<Vec<Vec<String>>, ClusterError> {
		self(store)
	}
}

/// Markov clustering over the undirected interaction graph.
///
/// Each connected component is clustered on its own, since flow never
/// crosses components.
#[derive(Clone, Debug, Default)]
pub struct MarkovClustering {
	params: MclParams,
}

impl MarkovClustering {
	/// A clusterer with the given parameters.
	pub fn new(params: MclParams) -> Self {
		Self { params }
	}

	fn components(store: &GraphStore, loci: &[&str]) -> Vec<Vec<usize>> {
		let index: HashMap<&str, usize> = loci.iter().enumerate().map(|(i, &l)| (l, i)).collect();
		let mut seen = vec![false; loci.len()];
		let mut out = Vec::new();

		for start in 0..loci.len() {
			if seen[start] {
				continue;
			}
			seen[start] = true;
			let mut component = vec![start];
			let mut cursor = 0;
			while cursor < component.len() {
				let locus = loci[component[cursor]];
				cursor += 1;
				for neighbor in store.neighbor_loci(locus) {
					if let Some(&j) = index.get(neighbor) {
						if !seen[j] {
							seen[j] = true;
							component.push(j);
						}
					}
				}
			}
			out.push(component);
		}
		out
	}

	fn cluster_component(&self, store: &GraphStore, loci: &[&str], members: &[usize]) -> Vec<Vec<usize>> {
		let n = members.len();
		if n == 1 {
			return vec![members.to_vec()];
		}
		if n > self.params.max_component_size {
			warn!(
				"component of {n} nodes exceeds max_component_size {}, keeping it as one cluster",
				self.params.max_component_size
			);
			return vec![members.to_vec()];
		}
		let local: HashMap<&str, usize> = members.iter().enumerate().map(|(i, &m)| (loci[m], i)).collect();

		let mut m: Vec<Column> = members
			.iter()
			.enumerate()
			.map(|(col, &member)| {
				let mut rows: Vec<usize> = store
					.neighbor_loci(loci[member])
					.filter_map(|neighbor| local.get(neighbor).copied())
					.filter(|&row| row != col)
					.collect();
				rows.push(col);
				rows.sort_unstable();
				rows.dedup();
				let mut column: Column = rows
					.into_iter()
					.map(|row| (row, if row == col { self.params.self_loop_weight } else { 1.0 }))
					.collect();
				normalize(&mut column);
				column
			})
			.collect();

		let mut scratch = Scratch::new(n);
		for iteration in 0..self.params.max_iterations {
			let mut next = m.clone();
			for _ in 1..self.params.expansion.max(1) {
				next = scratch.multiply(&next, &m);
			}
			for column in &mut next {
				for (_, v) in column.iter_mut() {
					*v = v.powf(self.params.inflation);
				}
				normalize(column);
				column.retain(|&(_, v)| v > 0.0 && v >= self.params.prune_threshold);
				normalize(column);
			}

			let delta = m
				.iter()
				.zip(&next)
				.map(|(old, new)| column_delta(old, new))
				.fold(0.0, f64::max);
			m = next;
			if delta < 1e-9 {
				debug!("mcl converged after {} iterations on {n} nodes", iteration + 1);
				break;
			}
		}

		// Rows that keep mass are attractors; their nonzero columns form a cluster.
		let mut by_row: Vec<Vec<usize>> = vec![Vec::new(); n];
		for (col, column) in m.iter().enumerate() {
			for &(row, v) in column {
				if v > 0.0 {
					by_row[row].push(col);
				}
			}
		}
		let mut assigned = vec![false; n];
		let mut clusters = Vec::new();
		for cols in by_row {
			let cluster: Vec<usize> = cols.into_iter().filter(|&col| !assigned[col]).collect();
			if cluster.is_empty() {
				continue;
			}
			for &col in &cluster {
				assigned[col] = true;
			}
			clusters.push(cluster.into_iter().map(|col| members[col]).collect());
		}
		for (col, done) in assigned.into_iter().enumerate() {
			if !done {
				clusters.push(vec![members[col]]);
			}
		}
		clusters
	}
}

impl Clusterer for MarkovClustering {
	fn cluster(&self, store: &GraphStore) -> Result<Vec<Vec<String>>, ClusterError> {
		let loci: Vec<&str> = store.nodes().map(|n| n.id.as_str()).collect();
		let mut out = Vec::new();
		for component in Self::components(store, &loci) {
			for cluster in self.cluster_component(store, &loci, &component) {
				out.push(cluster.into_iter().map(|i| loci[i].to_string()).collect());
			}
		}
		Ok(out)
	}
}

/// Sparse matrix column: `(row, value)` pairs sorted by row.
type Column = Vec<(usize, f64)>;

fn normalize(column: &mut Column) {
	let sum: f64 = column.iter().map(|&(_, v)| v).sum();
	if sum > 0.0 {
		for (_, v) in column.iter_mut() {
			*v /= sum;
		}
	}
}

/// Largest absolute difference between two sparse columns.
fn column_delta(a: &Column, b: &Column) -> f64 {
	let (mut i, mut j, mut delta) = (0, 0, 0.0f64);
	loop {
		match (a.get(i), b.get(j)) {
			(Some(&(ra, va)), Some(&(rb, vb))) if ra == rb => {
				delta = delta.max((va - vb).abs());
				i += 1;
				j += 1;
			}
			(Some(&(ra, va)), Some(&(rb, _))) if ra < rb => {
				delta = delta.max(va.abs());
				i += 1;
			}
			(Some(&(_, va)), None) => {
				delta = delta.max(va.abs());
				i += 1;
			}
			(_, Some(&(_, vb))) => {
				delta = delta.max(vb.abs());
				j += 1;
			}
			(None, None) => return delta,
		}
	}
}

/// Dense accumulator reused across sparse products.
struct Scratch {
	acc: Vec<f64>,
	touched: Vec<bool>,
}

impl Scratch {
	fn new(n: usize) -> Self {
		Self {
			acc: vec![0.0; n],
			touched: vec![false; n],
		}
	}

	/// `a * b` for column-major sparse matrices.
	fn multiply(&mut self, a: &[Column], b: &[Column]) -> Vec<Column> {
		b.iter()
			.map(|b_col| {
				let mut rows = Vec::new();
				for &(k, w) in b_col {
					for &(row, v) in &a[k] {
						if !self.touched[row] {
							self.touched[row] = true;
							rows.push(row);
						}
						self.acc[row] += w * v;
					}
				}
				rows.sort_unstable();
				rows.into_iter()
					.map(|row| {
						self.touched[row] = false;
						(row, std::mem::take(&mut self.acc[row]))
					})
					.collect()
			})
			.collect()
	}
}

/// Colors every cluster and derives edge colors from their endpoints.
pub struct ClusterColorer<C, R> {
	clusterer: C,
	rng: R,
	target_brightness: u8,
}

impl<C: Clusterer, R: Rng> ClusterColorer<C, R> {
	/// A colorer drawing colors from `rng`.
	pub fn new(clusterer: C, rng: R) -> Self {
		Self {
			clusterer,
			rng,
			target_brightness: DEFAULT_TARGET_BRIGHTNESS,
		}
	}

	/// Override the brightness cluster colors are normalized to.
	pub fn with_target_brightness(mut self, target: u8) -> Self {
		self.target_brightness = target;
		self
	}

	/// Cluster the whole graph and recolor it. Returns the number of clusters.
	///
	/// The clustering is checked before anything is written, so on error the
	/// store keeps its previous colors.
	pub fn colorize(&mut self, store: &mut GraphStore) -> Result<usize, ClusterError> {
		if store.is_empty() {
			return Ok(0);
		}
		let clusters = self.clusterer.cluster(store)?;
		if clusters.is_empty() {
			return Err(ClusterError::EmptyResult {
				nodes: store.node_count(),
			});
		}
		let mut seen = HashSet::new();
		for (i, cluster) in clusters.iter().enumerate() {
			for locus in cluster {
				if store.node(locus).is_none() {
					return Err(ClusterError::UnknownNode {
						cluster: i,
						locus: locus.clone(),
					});
				}
				if !seen.insert(locus.as_str()) {
					return Err(ClusterError::Overlapping(locus.clone()));
				}
			}
		}

		for node in store.nodes_mut() {
			node.cluster_id = None;
			node.cluster_color = None;
		}
		let mut colors = HashMap::new();
		for (i, cluster) in clusters.iter().enumerate() {
			let color = Color::random(&mut self.rng, self.target_brightness);
			for locus in cluster {
				if let Some(node) = store.node_mut(locus) {
					node.cluster_id = Some(i);
					node.cluster_color = Some(color);
				}
				colors.insert(locus.clone(), color);
			}
		}
		for edge in store.edges_mut() {
			edge.color = match (colors.get(&edge.source), colors.get(&edge.target)) {
				(Some(&s), Some(&t)) => Some(s.average(t)),
				_ => None,
			};
		}

		info!("colored {} clusters over {} nodes", clusters.len(), store.node_count());
		Ok(clusters.len())
	}
}
