use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::interactome::{Color, ElementId, Emphasis, FocusStyle, LayoutParams};

pub const NODE_RADIUS: f64 = 4.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel (px) beyond which a press is a drag, not a click.
pub const CLICK_SLOP: f64 = 4.0;
const FIT_PADDING: f64 = 50.0;

/// An opacity easing linearly toward its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
	pub value: f64,
	pub target: f64,
}

impl Fade {
	fn new(value: f64) -> Self {
		Self {
			value,
			target: value,
		}
	}

	fn step(&mut self, max_delta: f64) {
		self.value += (self.target - self.value).clamp(-max_delta, max_delta);
	}
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub locus: String,
	pub label: String,
	pub color: Color,
	pub radius: f64,
	pub fade: Fade,
}

#[derive(Clone, Debug)]
pub struct EdgeVisual {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: Option<Color>,
	pub width: f64,
	pub fade: Fade,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug)]
struct FitAnimation {
	from: ViewTransform,
	to: ViewTransform,
	t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeVisual>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	/// Set on mouseup after a drag or pan so the trailing click is ignored.
	pub suppress_click: bool,
	style: FocusStyle,
	node_index: HashMap<String, DefaultNodeIdx>,
	fit: Option<FitAnimation>,
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn node_radius(degree: usize) -> f64 {
	NODE_RADIUS * (1.0 + 0.5 * (degree.max(1) as f64).log2())
}

impl ForceGraphState {
	pub fn new(data: &GraphData, layout: &LayoutParams, style: FocusStyle, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: layout.force_charge,
			force_spring: layout.force_spring,
			force_max: layout.force_max,
			node_speed: layout.node_speed,
			damping_factor: layout.damping_factor,
		});
		let mut node_index = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let ring = 100.0 + 2.0 * (data.nodes.len() as f64).sqrt();
			let (x, y) = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					locus: node.id.clone(),
					label: node.label.clone(),
					color: node.color,
					radius: node_radius(node.degree),
					fade: Fade::new(style.focused_opacity),
				},
			});
			node_index.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (node_index.get(&link.source), node_index.get(&link.target)) {
				if src != tgt {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				edges.push(EdgeVisual {
					id: link.id.clone(),
					source: src,
					target: tgt,
					color: link.color,
					width: link.width,
					fade: Fade::new(style.focused_opacity),
				});
			}
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			animation_running: true,
			suppress_click: false,
			style,
			node_index,
			fit: None,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let reach = HIT_RADIUS.max(node.data.user_data.radius);
			if (dx * dx + dy * dy).sqrt() < reach {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn locus_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let idx = self.node_at_position(sx, sy)?;
		let mut locus = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				locus = Some(node.data.user_data.locus.clone());
			}
		});
		locus
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover = node;
	}

	/// Fade focused elements in and the rest out, and fit the view to the
	/// focused nodes.
	pub fn apply_emphasis(&mut self, emphasis: &Emphasis) {
		let (on, off) = (self.style.focused_opacity, self.style.dimmed_opacity);
		let mut bounds: Option<(f64, f64, f64, f64)> = None;

		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			let focused = emphasis.focused.contains(&ElementId::node(info.locus.as_str()));
			info.fade.target = if focused { on } else { off };
			if focused {
				let (x, y, r) = (node.data.x as f64, node.data.y as f64, info.radius);
				bounds = Some(match bounds {
					None => (x - r, y - r, x + r, y + r),
					Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
				});
			}
		});
		for edge in &mut self.edges {
			let focused = emphasis.focused.contains(&ElementId::edge(edge.id.as_str()));
			edge.fade.target = if focused { on } else { off };
		}

		if let Some(bounds) = bounds {
			self.fit = Some(FitAnimation {
				from: self.transform,
				to: self.fit_transform(bounds),
				t: 0.0,
			});
		}
	}

	fn fit_transform(&self, (x0, y0, x1, y1): (f64, f64, f64, f64)) -> ViewTransform {
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(0.1, 10.0);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		}
	}

	pub fn node_index(&self, locus: &str) -> Option<DefaultNodeIdx> {
		self.node_index.get(locus).copied()
	}

	pub fn node_fade(&self, locus: &str) -> Option<Fade> {
		let idx = self.node_index(locus)?;
		let mut fade = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				fade = Some(node.data.user_data.fade);
			}
		});
		fade
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let dt = dt as f64;
		let duration = self.style.transition_secs.max(1e-3);
		let max_delta = dt / duration;
		self.graph.visit_nodes_mut(|node| node.data.user_data.fade.step(max_delta));
		for edge in &mut self.edges {
			edge.fade.step(max_delta);
		}

		// user pan/zoom cancels an in-flight fit
		if self.drag.active || self.pan.active {
			self.fit = None;
		}
		if let Some(fit) = &mut self.fit {
			fit.t = (fit.t + max_delta).min(1.0);
			let e = ease_out_cubic(fit.t);
			let lerp = |a: f64, b: f64| a + (b - a) * e;
			self.transform = ViewTransform {
				x: lerp(fit.from.x, fit.to.x),
				y: lerp(fit.from.y, fit.to.y),
				k: lerp(fit.from.k, fit.to.k),
			};
			if fit.t >= 1.0 {
				self.fit = None;
			}
		}
	}

	pub fn cancel_fit(&mut self) {
		self.fit = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
