//! Network view projection: indexing, neighborhood expansion, view modes and
//! in-place state updates for the rendered graph.

mod expand;
mod index;
mod model;
mod project;
mod session;
mod style;
mod sync;

pub use index::{AdjacencyIndex, build_index};
pub use model::{Compartment, DEFAULT_EDGE_WEIGHT, Edge, Graph, Node, NodeId, NodeState, Position};
pub use project::{ProjectedGraph, Reach, ViewMode};
pub use session::{SnapshotKind, ViewSession, ViewUpdate};
pub use style::{compartment_color, state_color};
pub use sync::{RenderedNodes, SyncReport, sync_state};
