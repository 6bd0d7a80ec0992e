use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::network::{
	AdjacencyIndex, DEFAULT_EDGE_WEIGHT, Graph, NodeId, NodeState, Position, ProjectedGraph,
	RenderedNodes, SyncReport, build_index, sync_state,
};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
	pub state: NodeState,
	pub degree: Option<u32>,
	pub social_distance: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

fn new_graph() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Renderer-side graph: layout, interaction state and the projection it shows.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub focus: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	/// Shown instead of the graph when nothing is displayed.
	pub placeholder: String,
	index: AdjacencyIndex,
	id_to_idx: HashMap<NodeId, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, NodeId>,
	weights: HashMap<(DefaultNodeIdx, DefaultNodeIdx), f64>,
}

impl Default for ForceGraphState {
	fn default() -> Self {
		Self::new(800.0, 600.0)
	}
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: new_graph(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			focus: None,
			width,
			height,
			animation_running: true,
			placeholder: "No network loaded".into(),
			index: AdjacencyIndex::default(),
			id_to_idx: HashMap::new(),
			idx_to_id: HashMap::new(),
			weights: HashMap::new(),
		}
	}

	/// Replaces the displayed graph and restarts the layout from the nodes'
	/// known positions. Viewport and size are kept.
	pub fn load(&mut self, projection: &ProjectedGraph, focus: Option<&NodeId>) {
		let mut graph = new_graph();
		self.id_to_idx.clear();
		self.idx_to_id.clear();
		self.weights.clear();

		let count = projection.nodes.len().max(1) as f64;
		for (i, node) in projection.nodes.iter().enumerate() {
			if self.id_to_idx.contains_key(&node.id) {
				continue;
			}
			let Position { x, y } = node.position.unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count;
				Position::new(100.0 * angle.cos(), 100.0 * angle.sin())
			});
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					state: node.state.clone(),
				},
			});
			self.id_to_idx.insert(node.id.clone(), idx);
			self.idx_to_id.insert(idx, node.id.clone());
		}

		for edge in &projection.edges {
			// The layout engine cannot step a node connected to itself.
			if edge.source == edge.target {
				continue;
			}
			if let (Some(&src), Some(&tgt)) =
				(self.id_to_idx.get(&edge.source), self.id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				self.weights.insert((src, tgt), edge.weight);
			}
		}

		self.graph = graph;
		self.index = build_index(&projection.to_graph());
		self.focus = focus.and_then(|id| self.id_to_idx.get(id).copied());
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.animation_running = true;
	}

	/// Pulls node states from `snapshot` without touching layout.
	pub fn restyle(&mut self, snapshot: &Graph) -> SyncReport {
		sync_state(self, snapshot)
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&NodeId> {
		self.idx_to_id.get(&idx)
	}

	pub fn edge_weight(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		self.weights
			.get(&(a, b))
			.or_else(|| self.weights.get(&(b, a)))
			.copied()
			.unwrap_or(DEFAULT_EDGE_WEIGHT)
	}

	/// Current render-space position of every displayed node.
	pub fn positions(&self) -> HashMap<NodeId, Position> {
		let mut positions = HashMap::with_capacity(self.id_to_idx.len());
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				Position::new(node.x() as f64, node.y() as f64),
			);
		});
		positions
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
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			let neighbors = self
				.idx_to_id
				.get(&idx)
				.and_then(|id| self.index.neighbors(id))
				.into_iter()
				.flatten()
				.filter_map(|id| self.id_to_idx.get(id).copied());
			self.hover.neighbors.extend(neighbors);
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

impl RenderedNodes for ForceGraphState {
	fn visit_states_mut(&mut self, f: &mut dyn FnMut(&NodeId, &mut NodeState)) {
		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			f(&info.id, &mut info.state);
		});
	}
}
