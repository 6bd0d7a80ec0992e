use std::collections::HashMap;

use super::model::{Graph, NodeId, NodeState};

/// Narrow mutation surface of an already laid-out graph: states may be
/// rewritten by id, nothing else.
pub trait RenderedNodes {
	/// Calls `f` once per rendered node with mutable access to its state.
	fn visit_states_mut(&mut self, f: &mut dyn FnMut(&NodeId, &mut NodeState));
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
	/// Rendered nodes whose state actually changed.
	pub changed: usize,
	/// Rendered nodes found in the snapshot with an unchanged state.
	pub unchanged: usize,
	/// Rendered nodes missing from the snapshot, left as they were.
	pub stale: usize,
}

/// Writes the snapshot's node states into `rendered` by id.
///
/// The lookup is built before anything is touched and the writes happen in one
/// pass under a single `&mut` borrow, so no frame can be drawn in between.
/// Positions and membership are never changed.
pub fn sync_state<T: RenderedNodes + ?Sized>(rendered: &mut T, snapshot: &Graph) -> SyncReport {
	let latest: HashMap<&NodeId, &NodeState> =
		snapshot.nodes.iter().map(|n| (&n.id, &n.state)).collect();
	let mut report = SyncReport::default();

	rendered.visit_states_mut(&mut |id, state| match latest.get(id) {
		Some(&next) if *next != *state => {
			*state = next.clone();
			report.changed += 1;
		}
		Some(_) => report.unchanged += 1,
		None => report.stale += 1,
	});

	report
}

impl RenderedNodes for Vec<super::model::Node> {
	fn visit_states_mut(&mut self, f: &mut dyn FnMut(&NodeId, &mut NodeState)) {
		for node in self.iter_mut() {
			f(&node.id, &mut node.state);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::model::{Compartment, Node, Position};

	fn rendered() -> Vec<Node> {
		vec![
			Node::new("a", Compartment::Susceptible).at(1.0, 2.0),
			Node::new("b", Compartment::Susceptible).at(3.0, 4.0),
			Node::new("gone", Compartment::Infected).at(5.0, 6.0),
		]
	}

	fn snapshot() -> Graph {
		Graph::new(
			vec![
				Node::new("a", Compartment::Infected).at(90.0, 90.0),
				Node::new("b", Compartment::Susceptible),
				Node::new("new", Compartment::Recovered),
			],
			vec![],
		)
	}

	#[test]
	fn states_follow_snapshot_and_positions_stay() {
		let mut nodes = rendered();
		let report = sync_state(&mut nodes, &snapshot());

		assert_eq!(
			report,
			SyncReport {
				changed: 1,
				unchanged: 1,
				stale: 1
			}
		);
		assert_eq!(nodes.len(), 3);
		assert_eq!(nodes[0].state, Compartment::Infected.into());
		assert_eq!(nodes[0].position, Some(Position::new(1.0, 2.0)));
		assert_eq!(nodes[2].state, Compartment::Infected.into());
		assert!(nodes.iter().all(|n| n.id != NodeId::from("new")));
	}

	#[test]
	fn sync_is_idempotent() {
		let mut nodes = rendered();
		sync_state(&mut nodes, &snapshot());
		let once = nodes.clone();
		let report = sync_state(&mut nodes, &snapshot());
		assert_eq!(nodes, once);
		assert_eq!(report.changed, 0);
	}

	#[test]
	fn unrecognized_states_are_carried() {
		let mut nodes = rendered();
		let mut next = snapshot();
		next.nodes[1].state = NodeState::Unrecognized("\"zombie\"".into());
		sync_state(&mut nodes, &next);
		assert_eq!(nodes[1].state, NodeState::Unrecognized("\"zombie\"".into()));
	}
}
