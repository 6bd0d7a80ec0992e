use std::collections::{HashMap, HashSet};

use super::model::{Edge, Graph, NodeId};

/// Undirected adjacency derived from a snapshot's valid edges.
///
/// Every node of the snapshot has an entry, isolated nodes included, so
/// membership in the index doubles as the set of valid node ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyIndex {
	adjacency: HashMap<NodeId, HashSet<NodeId>>,
	dropped_edges: usize,
}

impl AdjacencyIndex {
	pub fn contains(&self, id: &NodeId) -> bool {
		self.adjacency.contains_key(id)
	}

	pub fn neighbors(&self, id: &NodeId) -> Option<&HashSet<NodeId>> {
		self.adjacency.get(id)
	}

	pub fn node_count(&self) -> usize {
		self.adjacency.len()
	}

	/// Edges skipped because an endpoint was missing from the snapshot.
	pub fn dropped_edges(&self) -> usize {
		self.dropped_edges
	}

	/// True when both endpoints of `edge` are nodes of the indexed snapshot.
	pub fn is_valid_edge(&self, edge: &Edge) -> bool {
		self.contains(&edge.source) && self.contains(&edge.target)
	}
}

/// Builds the adjacency index for `graph` in one pass over its edges.
///
/// Dangling edges are dropped silently. Self-loops are valid edges but do not
/// make a node its own neighbor.
pub fn build_index(graph: &Graph) -> AdjacencyIndex {
	let mut adjacency: HashMap<NodeId, HashSet<NodeId>> = graph
		.nodes
		.iter()
		.map(|node| (node.id.clone(), HashSet::new()))
		.collect();
	let mut dropped_edges = 0;

	for edge in &graph.edges {
		if !(adjacency.contains_key(&edge.source) && adjacency.contains_key(&edge.target)) {
			dropped_edges += 1;
			continue;
		}
		if edge.source == edge.target {
			continue;
		}
		if let Some(set) = adjacency.get_mut(&edge.source) {
			set.insert(edge.target.clone());
		}
		if let Some(set) = adjacency.get_mut(&edge.target) {
			set.insert(edge.source.clone());
		}
	}

	AdjacencyIndex {
		adjacency,
		dropped_edges,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::model::{Compartment, Node};

	fn ids(list: &[&str]) -> HashSet<NodeId> {
		list.iter().map(|&s| NodeId::from(s)).collect()
	}

	fn scenario() -> Graph {
		Graph::new(
			["1", "2", "3", "4"]
				.into_iter()
				.map(|id| Node::new(id, Compartment::Susceptible))
				.collect(),
			vec![Edge::new("1", "2"), Edge::new("2", "3"), Edge::new("3", "5")],
		)
	}

	#[test]
	fn dangling_edge_is_dropped() {
		let index = build_index(&scenario());
		assert_eq!(index.neighbors(&"1".into()), Some(&ids(&["2"])));
		assert_eq!(index.neighbors(&"2".into()), Some(&ids(&["1", "3"])));
		assert_eq!(index.neighbors(&"3".into()), Some(&ids(&["2"])));
		assert_eq!(index.neighbors(&"4".into()), Some(&ids(&[])));
		assert_eq!(index.neighbors(&"5".into()), None);
		assert_eq!(index.node_count(), 4);
		assert_eq!(index.dropped_edges(), 1);
		assert!(!index.is_valid_edge(&Edge::new("3", "5")));
	}

	#[test]
	fn adjacency_is_symmetric() {
		let nodes = (0..40u64).map(|i| Node::new(i, Compartment::Infected)).collect();
		let edges = (0..40u64)
			.flat_map(|i| [Edge::new(i, (i * 7 + 3) % 45), Edge::new((i * 3) % 40, i)])
			.collect();
		let graph = Graph::new(nodes, edges);
		let index = build_index(&graph);

		for a in graph.nodes.iter().map(|n| &n.id) {
			for b in index.neighbors(a).unwrap() {
				assert!(index.neighbors(b).unwrap().contains(a), "{a} -> {b} not mirrored");
			}
		}
	}

	#[test]
	fn self_loops_and_duplicates_do_not_distort_neighbors() {
		let graph = Graph::new(
			vec![Node::new("a", Compartment::Susceptible), Node::new("b", Compartment::Susceptible)],
			vec![Edge::new("a", "a"), Edge::new("a", "b"), Edge::new("b", "a")],
		);
		let index = build_index(&graph);
		assert_eq!(index.neighbors(&"a".into()), Some(&ids(&["b"])));
		assert_eq!(index.neighbors(&"b".into()), Some(&ids(&["a"])));
		assert_eq!(index.dropped_edges(), 0);
	}
}
