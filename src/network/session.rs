use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::index::{AdjacencyIndex, build_index};
use super::model::{Graph, NodeId, Position};
use super::project::{ProjectedGraph, Reach, ViewMode, project};

/// Identity of a requested snapshot. Tickets are handed out in request order;
/// only a ticket newer than the last applied one is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTicket(u64);

/// Why a snapshot was fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotKind {
	/// New simulation or explicit refresh; the view is projected again.
	Fresh,
	/// Simulation advanced; only node states change on screen.
	Step,
}

/// What the renderer has to do after a session event.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewUpdate {
	/// Replace the rendered graph (and its layout) with this projection.
	Rebuild(ProjectedGraph),
	/// Keep layout and membership, pull node states from this snapshot.
	Restyle(Rc<Graph>),
}

struct Snapshot {
	graph: Rc<Graph>,
	index: AdjacencyIndex,
}

/// Per-dashboard owner of the current snapshot, its index and the active view
/// mode. Randomness for sampling comes from `R`.
pub struct ViewSession<R = SmallRng> {
	rng: R,
	mode: ViewMode,
	issued: u64,
	applied: u64,
	current: Option<Snapshot>,
	projected: bool,
}

impl ViewSession<SmallRng> {
	pub fn from_entropy(mode: ViewMode) -> Self {
		Self::new(SmallRng::from_entropy(), mode)
	}
}

impl<R: Rng> ViewSession<R> {
	pub fn new(rng: R, mode: ViewMode) -> Self {
		Self {
			rng,
			mode,
			issued: 0,
			applied: 0,
			current: None,
			projected: false,
		}
	}

	pub fn mode(&self) -> &ViewMode {
		&self.mode
	}

	/// Reserves the identity of the next snapshot, before it is requested.
	pub fn issue(&mut self) -> SnapshotTicket {
		self.issued += 1;
		SnapshotTicket(self.issued)
	}

	/// Accepts `graph` unless a newer snapshot has already been applied.
	///
	/// Returns `None` for superseded snapshots; their work is dropped.
	pub fn ingest(
		&mut self,
		ticket: SnapshotTicket,
		graph: Graph,
		kind: SnapshotKind,
	) -> Option<ViewUpdate> {
		if ticket.0 <= self.applied {
			warn!(
				"Discarding snapshot #{} (already showing #{})",
				ticket.0, self.applied
			);
			return None;
		}
		self.applied = ticket.0;

		let index = build_index(&graph);
		debug!(
			"Snapshot #{}: {} nodes, {} edges, {} dangling",
			ticket.0,
			index.node_count(),
			graph.edges.len(),
			index.dropped_edges()
		);
		let graph = Rc::new(graph);
		self.current = Some(Snapshot {
			graph: graph.clone(),
			index,
		});

		match kind {
			SnapshotKind::Step if self.projected => Some(ViewUpdate::Restyle(graph)),
			_ => self.reproject(&HashMap::new()).map(ViewUpdate::Rebuild),
		}
	}

	/// Switches the view mode and projects the current snapshot under it.
	///
	/// `positions` are the renderer's current node positions, used by Zoom.
	pub fn set_mode(
		&mut self,
		mode: ViewMode,
		positions: &HashMap<NodeId, Position>,
	) -> Option<ProjectedGraph> {
		info!("View mode -> {}", mode.label());
		self.mode = mode;
		self.reproject(positions)
	}

	/// Zooms onto `focus`, keeping the current reach when already zoomed.
	pub fn focus_on(
		&mut self,
		focus: NodeId,
		positions: &HashMap<NodeId, Position>,
	) -> Option<ProjectedGraph> {
		let reach = match &self.mode {
			ViewMode::Zoom { reach, .. } => *reach,
			_ => Reach::default(),
		};
		self.set_mode(
			ViewMode::Zoom {
				focus: Some(focus),
				reach,
			},
			positions,
		)
	}

	/// Zooms with a different reach, keeping the current focus if there is one.
	pub fn set_reach(
		&mut self,
		reach: Reach,
		positions: &HashMap<NodeId, Position>,
	) -> Option<ProjectedGraph> {
		let focus = match &self.mode {
			ViewMode::Zoom { focus, .. } => focus.clone(),
			_ => None,
		};
		self.set_mode(ViewMode::Zoom { focus, reach }, positions)
	}

	/// Projects the current snapshot again under the unchanged mode. For Sample
	/// this draws a new subset.
	///
	/// A non-empty `positions` map puts Zoom in the renderer's frame: nodes
	/// missing from it are not on screen and cannot fall inside the radius.
	pub fn reproject(&mut self, positions: &HashMap<NodeId, Position>) -> Option<ProjectedGraph> {
		let snapshot = self.current.as_ref()?;
		let projection = match &self.mode {
			ViewMode::Zoom { .. } if !positions.is_empty() => project(
				&snapshot.graph.with_rendered_positions(positions),
				&snapshot.index,
				&self.mode,
				&mut self.rng,
			),
			mode => project(&snapshot.graph, &snapshot.index, mode, &mut self.rng),
		};
		info!(
			"Projected {} view: {} nodes, {} edges",
			self.mode.label(),
			projection.nodes.len(),
			projection.edges.len()
		);
		self.projected = true;
		Some(projection)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::model::{Compartment, Edge, Node};

	fn session() -> ViewSession {
		ViewSession::new(SmallRng::seed_from_u64(11), ViewMode::Full)
	}

	fn graph(state: Compartment) -> Graph {
		Graph::new(
			(0..6u64)
				.map(|i| Node::new(i, state).at(i as f64 * 100.0, 0.0))
				.collect(),
			(1..6u64).map(|i| Edge::new(i - 1, i)).collect(),
		)
	}

	fn rendered(ids: std::ops::Range<u64>) -> HashMap<NodeId, Position> {
		ids.map(|i| (NodeId::from(i), Position::new(i as f64 * 100.0, 0.0)))
			.collect()
	}

	#[test]
	fn first_snapshot_rebuilds_then_steps_restyle() {
		let mut session = session();
		let t1 = session.issue();
		let first = session.ingest(t1, graph(Compartment::Susceptible), SnapshotKind::Step);
		assert!(matches!(first, Some(ViewUpdate::Rebuild(p)) if p.nodes.len() == 6));

		let t2 = session.issue();
		let second = session.ingest(t2, graph(Compartment::Infected), SnapshotKind::Step);
		match second {
			Some(ViewUpdate::Restyle(g)) => assert_eq!(g.nodes[0].state, Compartment::Infected.into()),
			other => panic!("expected restyle, got {other:?}"),
		}
	}

	#[test]
	fn stale_snapshot_is_discarded() {
		let mut session = session();
		let older = session.issue();
		let newer = session.issue();
		assert!(session.ingest(newer, graph(Compartment::Infected), SnapshotKind::Fresh).is_some());
		assert!(session.ingest(older, graph(Compartment::Susceptible), SnapshotKind::Step).is_none());
		let shown = session.reproject(&HashMap::new()).unwrap();
		assert_eq!(shown.nodes[0].state, Compartment::Infected.into());
	}

	#[test]
	fn mode_change_without_snapshot_projects_nothing() {
		let mut session = session();
		assert!(session.set_mode(ViewMode::Sample { max_nodes: 2 }, &HashMap::new()).is_none());
		assert_eq!(session.mode(), &ViewMode::Sample { max_nodes: 2 });
	}

	#[test]
	fn zoom_uses_rendered_positions() {
		let mut session = session();
		let ticket = session.issue();
		session.ingest(ticket, graph(Compartment::Susceptible), SnapshotKind::Fresh);

		// Node 5 has been dragged next to node 0 on screen.
		let mut positions = rendered(0..6);
		positions.insert(NodeId::from(5u64), Position::new(1.0, 0.0));
		let projection = session.focus_on(NodeId::from(0u64), &positions).unwrap();
		let ids = projection.node_ids();
		assert!(ids.contains(&NodeId::from(5u64)));
		assert!(ids.contains(&NodeId::from(1u64)));
		assert!(!ids.contains(&NodeId::from(3u64)));
		assert_eq!(projection.edges, vec![Edge::new(0u64, 1u64)]);
	}

	#[test]
	fn zoom_ignores_nodes_off_screen() {
		let mut session = session();
		let ticket = session.issue();
		session.ingest(ticket, graph(Compartment::Susceptible), SnapshotKind::Fresh);

		// The renderer shows 0..3 around the origin of its own frame; node 4
		// sits exactly at node 0's rendered spot, but only in snapshot space.
		let mut positions: HashMap<NodeId, Position> = rendered(0..3);
		positions.insert(NodeId::from(0u64), Position::new(400.0, 0.0));
		let projection = session.focus_on(NodeId::from(0u64), &positions).unwrap();
		let ids = projection.node_ids();
		assert!(ids.contains(&NodeId::from(0u64)));
		assert!(!ids.contains(&NodeId::from(4u64)));
		assert!(!ids.contains(&NodeId::from(5u64)));
	}

	#[test]
	fn set_reach_keeps_focus() {
		let mut session = session();
		let ticket = session.issue();
		session.ingest(ticket, graph(Compartment::Susceptible), SnapshotKind::Fresh);
		session.focus_on(NodeId::from(2u64), &HashMap::new());

		let projection = session.set_reach(Reach::Hops(1), &HashMap::new()).unwrap();
		assert_eq!(
			session.mode(),
			&ViewMode::Zoom {
				focus: Some(NodeId::from(2u64)),
				reach: Reach::Hops(1),
			}
		);
		assert_eq!(projection.nodes.len(), 3);
		assert_eq!(projection.edges.len(), 2);
	}

	#[test]
	fn resampling_keeps_mode() {
		let mut session = session();
		let ticket = session.issue();
		session.ingest(ticket, graph(Compartment::Susceptible), SnapshotKind::Fresh);
		session.set_mode(ViewMode::Sample { max_nodes: 3 }, &HashMap::new());
		let again = session.reproject(&HashMap::new()).unwrap();
		assert_eq!(again.nodes.len(), 3);
		assert_eq!(session.mode(), &ViewMode::Sample { max_nodes: 3 });
	}
}
