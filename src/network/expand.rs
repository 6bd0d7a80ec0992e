use std::collections::{HashSet, VecDeque};

use super::index::AdjacencyIndex;
use super::model::{Node, NodeId};

/// Upper bound on hop radius; larger requests are clamped so a single focus
/// event cannot walk an entire large network.
pub const MAX_HOP_RADIUS: usize = 8;

/// Render-space units per logical zoom radius unit.
pub const GEOMETRIC_SCALE: f64 = 100.0;

/// Breadth-first expansion of `radius` levels around `focus`.
///
/// Returns an empty set when `focus` is not part of the indexed snapshot.
pub fn expand_hop(index: &AdjacencyIndex, focus: &NodeId, radius: usize) -> HashSet<NodeId> {
	if !index.contains(focus) {
		return HashSet::new();
	}
	let radius = radius.min(MAX_HOP_RADIUS);

	let mut visited = HashSet::from([focus.clone()]);
	let mut queue = VecDeque::from([(focus, 0usize)]);

	while let Some((id, depth)) = queue.pop_front() {
		if depth >= radius {
			continue;
		}
		let Some(neighbors) = index.neighbors(id) else {
			continue;
		};
		for next in neighbors {
			if visited.insert(next.clone()) {
				queue.push_back((next, depth + 1));
			}
		}
	}

	visited
}

/// Nodes whose position lies within `radius * GEOMETRIC_SCALE` of the focus.
///
/// Nodes without a position never match. A focus that is absent or has no
/// position yields an empty set.
pub fn expand_geometric(nodes: &[Node], focus: &NodeId, radius: f64) -> HashSet<NodeId> {
	let Some(center) = nodes
		.iter()
		.find(|n| &n.id == focus)
		.and_then(|n| n.position)
		.filter(|p| p.is_finite())
	else {
		return HashSet::new();
	};
	if !radius.is_finite() || radius < 0.0 {
		return HashSet::new();
	}
	let reach = radius * GEOMETRIC_SCALE;

	nodes
		.iter()
		.filter(|n| n.position.is_some_and(|p| p.distance(&center) <= reach))
		.map(|n| n.id.clone())
		.collect()
}
