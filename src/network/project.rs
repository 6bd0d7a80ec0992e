use std::collections::HashSet;

use rand::Rng;

use super::expand::{expand_geometric, expand_hop};
use super::index::AdjacencyIndex;
use super::model::{Edge, Graph, Node, NodeId};

/// How far a zoom reaches from its focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reach {
	/// Euclidean radius in logical units around the focus' rendered position.
	Geometric(f64),
	/// Hop count over the adjacency index.
	Hops(usize),
}

impl Default for Reach {
	fn default() -> Self {
		Reach::Geometric(1.5)
	}
}

/// Which part of a snapshot is displayed.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewMode {
	#[default]
	Full,
	Sample { max_nodes: usize },
	Zoom { focus: Option<NodeId>, reach: Reach },
}

impl ViewMode {
	pub fn label(&self) -> &'static str {
		match self {
			ViewMode::Full => "full",
			ViewMode::Sample { .. } => "sample",
			ViewMode::Zoom { .. } => "zoom",
		}
	}
}

/// Subgraph handed to the renderer. Never holds an edge whose endpoint is
/// missing from `nodes`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedGraph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl ProjectedGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_ids(&self) -> HashSet<&NodeId> {
		self.nodes.iter().map(|n| &n.id).collect()
	}

	/// View of the projection as a graph, for indexing it on the renderer side.
	pub fn to_graph(&self) -> Graph {
		Graph::new(self.nodes.clone(), self.edges.clone())
	}
}

/// Derives the displayed subgraph of `graph` under `mode`.
///
/// `index` must have been built from `graph`. Sampling draws from `rng`, so two
/// calls on the same snapshot may pick different nodes.
pub fn project<R: Rng + ?Sized>(
	graph: &Graph,
	index: &AdjacencyIndex,
	mode: &ViewMode,
	rng: &mut R,
) -> ProjectedGraph {
	match mode {
		ViewMode::Full => full(graph, index),
		ViewMode::Sample { max_nodes } => sample(graph, *max_nodes, rng),
		ViewMode::Zoom { focus, reach } => match focus.as_ref().filter(|f| !f.is_empty()) {
			Some(focus) => zoom(graph, index, focus, *reach),
			None => ProjectedGraph::default(),
		},
	}
}

fn full(graph: &Graph, index: &AdjacencyIndex) -> ProjectedGraph {
	ProjectedGraph {
		nodes: graph.nodes.clone(),
		edges: graph
			.edges
			.iter()
			.filter(|e| index.is_valid_edge(e))
			.cloned()
			.collect(),
	}
}

fn sample<R: Rng + ?Sized>(graph: &Graph, max_nodes: usize, rng: &mut R) -> ProjectedGraph {
	let total = graph.nodes.len();
	let picked: Vec<usize> = if total <= max_nodes {
		(0..total).collect()
	} else {
		let mut picked = rand::seq::index::sample(rng, total, max_nodes).into_vec();
		picked.sort_unstable();
		picked
	};
	let nodes: Vec<Node> = picked.into_iter().map(|i| graph.nodes[i].clone()).collect();
	induced(graph, nodes)
}

fn zoom(graph: &Graph, index: &AdjacencyIndex, focus: &NodeId, reach: Reach) -> ProjectedGraph {
	let members = match reach {
		Reach::Geometric(radius) => expand_geometric(&graph.nodes, focus, radius),
		Reach::Hops(radius) => expand_hop(index, focus, radius),
	};
	if members.is_empty() {
		return ProjectedGraph::default();
	}
	let nodes = graph
		.nodes
		.iter()
		.filter(|n| members.contains(&n.id))
		.cloned()
		.collect();
	induced(graph, nodes)
}

/// Keeps exactly the edges whose endpoints are both in `nodes`.
fn induced(graph: &Graph, nodes: Vec<Node>) -> ProjectedGraph {
	let mut projection = ProjectedGraph {
		nodes,
		edges: Vec::new(),
	};
	let edges = {
		let kept = projection.node_ids();
		graph
			.edges
			.iter()
			.filter(|e| kept.contains(&e.source) && kept.contains(&e.target))
			.cloned()
			.collect()
	};
	projection.edges = edges;
	projection
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::network::index::build_index;
	use crate::network::model::Compartment;

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(7)
	}

	fn ring(n: u64) -> Graph {
		Graph::new(
			(0..n)
				.map(|i| {
					let angle = i as f64 * std::f64::consts::TAU / n as f64;
					Node::new(i, Compartment::Susceptible).at(500.0 * angle.cos(), 500.0 * angle.sin())
				})
				.collect(),
			(0..n).map(|i| Edge::new(i, (i + 1) % n)).collect(),
		)
	}

	fn assert_closed(projection: &ProjectedGraph) {
		let ids = projection.node_ids();
		for edge in &projection.edges {
			assert!(ids.contains(&edge.source) && ids.contains(&edge.target), "{edge:?}");
		}
	}

	#[test]
	fn full_keeps_everything_without_dangling_edges() {
		let graph = ring(20);
		let index = build_index(&graph);
		let projection = project(&graph, &index, &ViewMode::Full, &mut rng());
		assert_eq!(projection.nodes, graph.nodes);
		assert_eq!(projection.edges, graph.edges);
	}

	#[test]
	fn full_drops_dangling_edges() {
		let mut graph = ring(4);
		graph.edges.push(Edge::new(3u64, 5u64));
		let index = build_index(&graph);
		let projection = project(&graph, &index, &ViewMode::Full, &mut rng());
		assert_eq!(projection.edges.len(), 4);
		assert_closed(&projection);
	}

	#[test]
	fn sample_picks_exactly_max_nodes() {
		let graph = ring(1000);
		let index = build_index(&graph);
		let mode = ViewMode::Sample { max_nodes: 300 };
		let projection = project(&graph, &index, &mode, &mut rng());
		assert_eq!(projection.nodes.len(), 300);
		assert_eq!(projection.node_ids().len(), 300);
		assert_closed(&projection);
	}

	#[test]
	fn sample_is_not_idempotent() {
		let graph = ring(1000);
		let index = build_index(&graph);
		let mode = ViewMode::Sample { max_nodes: 300 };
		let mut rng = rng();
		let first = project(&graph, &index, &mode, &mut rng);
		let second = project(&graph, &index, &mode, &mut rng);
		assert_ne!(first.node_ids(), second.node_ids());
	}

	#[test]
	fn sample_over_node_count_degrades_to_full() {
		let graph = ring(10);
		let index = build_index(&graph);
		let projection = project(&graph, &index, &ViewMode::Sample { max_nodes: 10 }, &mut rng());
		assert_eq!(projection, project(&graph, &index, &ViewMode::Full, &mut rng()));
	}

	#[test]
	fn sample_excludes_dangling_edges() {
		let mut graph = ring(50);
		graph.edges.extend((0..50u64).map(|i| Edge::new(i, 1000 + i)));
		let index = build_index(&graph);
		let projection = project(&graph, &index, &ViewMode::Sample { max_nodes: 25 }, &mut rng());
		assert_eq!(projection.nodes.len(), 25);
		assert_closed(&projection);
	}

	#[test]
	fn zoom_without_focus_is_empty() {
		let graph = ring(10);
		let index = build_index(&graph);
		for focus in [None, Some(NodeId::from("")), Some(NodeId::from("missing"))] {
			let mode = ViewMode::Zoom {
				focus,
				reach: Reach::default(),
			};
			let projection = project(&graph, &index, &mode, &mut rng());
			assert_eq!(projection, ProjectedGraph::default());
		}
	}

	#[test]
	fn zoom_without_focus_position_is_empty() {
		let mut graph = ring(10);
		graph.nodes[0].position = None;
		let index = build_index(&graph);
		let mode = ViewMode::Zoom {
			focus: Some(NodeId::from(0u64)),
			reach: Reach::Geometric(100.0),
		};
		assert!(project(&graph, &index, &mode, &mut rng()).is_empty());
	}

	#[test]
	fn zoom_edges_stay_inside_geometric_set() {
		// 0 and 1 are adjacent on the ring but 1 sits far away on screen.
		let mut graph = ring(12);
		graph.nodes[1].position = Some(crate::network::model::Position::new(10_000.0, 0.0));
		graph.nodes.push(Node::new("x", Compartment::Infected).at(510.0, 0.0));
		graph.edges.push(Edge::new(0u64, "x"));
		let index = build_index(&graph);
		let mode = ViewMode::Zoom {
			focus: Some(NodeId::from(0u64)),
			reach: Reach::Geometric(0.5),
		};
		let projection = project(&graph, &index, &mode, &mut rng());

		let ids = projection.node_ids();
		assert!(ids.contains(&NodeId::from(0u64)));
		assert!(ids.contains(&NodeId::from("x")));
		assert!(!ids.contains(&NodeId::from(1u64)));
		assert_eq!(projection.edges, vec![Edge::new(0u64, "x")]);
	}

	#[test]
	fn hop_zoom_follows_adjacency() {
		let graph = ring(12);
		let index = build_index(&graph);
		let mode = ViewMode::Zoom {
			focus: Some(NodeId::from(0u64)),
			reach: Reach::Hops(2),
		};
		let projection = project(&graph, &index, &mode, &mut rng());
		assert_eq!(projection.nodes.len(), 5);
		assert_eq!(projection.edges.len(), 4);
		assert_closed(&projection);
	}
}
