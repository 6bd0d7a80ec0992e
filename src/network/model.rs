use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identity across snapshots.
///
/// The backend hands out integer ids for generated networks, but nothing in the
/// view layer depends on that, so ids are kept as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<u64> for NodeId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Int(i64),
			Float(f64),
			Str(String),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Int(i) => Self(i.to_string()),
			RawId::Float(f) => Self(f.to_string()),
			RawId::Str(s) => Self(s),
		})
	}
}

/// The four epidemic compartments. Closed set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compartment {
	#[default]
	Susceptible,
	Infected,
	Recovered,
	Deceased,
}

impl Compartment {
	pub const ALL: [Compartment; 4] = [
		Compartment::Susceptible,
		Compartment::Infected,
		Compartment::Recovered,
		Compartment::Deceased,
	];

	pub fn from_code(code: i64) -> Option<Self> {
		match code {
			0 => Some(Compartment::Susceptible),
			1 => Some(Compartment::Infected),
			2 => Some(Compartment::Recovered),
			3 => Some(Compartment::Deceased),
			_ => None,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Compartment::Susceptible => "Susceptible",
			Compartment::Infected => "Infected",
			Compartment::Recovered => "Recovered",
			Compartment::Deceased => "Deceased",
		}
	}

	fn from_name(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|c| c.label().eq_ignore_ascii_case(name.trim()))
	}
}

/// A node's state as received. Values outside the known compartments are kept
/// rather than rejected so a live simulation keeps rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeState {
	Known(Compartment),
	Unrecognized(String),
}

impl Default for NodeState {
	fn default() -> Self {
		NodeState::Known(Compartment::default())
	}
}

impl fmt::Display for NodeState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeState::Known(c) => f.write_str(c.label()),
			NodeState::Unrecognized(raw) => write!(f, "unknown state {raw}"),
		}
	}
}

impl From<Compartment> for NodeState {
	fn from(c: Compartment) -> Self {
		NodeState::Known(c)
	}
}

impl From<serde_json::Value> for NodeState {
	fn from(value: serde_json::Value) -> Self {
		use serde_json::Value;

		let known = match &value {
			Value::Number(n) => n.as_i64().and_then(Compartment::from_code),
			Value::String(s) => Compartment::from_name(s)
				.or_else(|| s.trim().parse().ok().and_then(Compartment::from_code)),
			_ => None,
		};
		match known {
			Some(c) => NodeState::Known(c),
			None => NodeState::Unrecognized(value.to_string()),
		}
	}
}

impl<'de> Deserialize<'de> for NodeState {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(NodeState::from)
	}
}

/// Render-space coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(&self, other: &Position) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub state: NodeState,
	pub position: Option<Position>,
	pub social_distance: Option<f64>,
	pub degree: Option<u32>,
}

impl Node {
	pub fn new(id: impl Into<NodeId>, state: impl Into<NodeState>) -> Self {
		Self {
			id: id.into(),
			state: state.into(),
			..Default::default()
		}
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.position = Some(Position::new(x, y));
		self
	}
}

pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub source: NodeId,
	pub target: NodeId,
	/// Passed through untouched; styling by weight belongs to the renderer.
	pub weight: f64,
}

impl Edge {
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			weight: DEFAULT_EDGE_WEIGHT,
		}
	}

	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = weight;
		self
	}
}

/// One immutable snapshot of the simulated network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		Self { nodes, edges }
	}

	/// Copy of this snapshot placed in the renderer's frame: every node takes
	/// its rendered position, and nodes that are not on screen get none.
	pub fn with_rendered_positions(
		&self,
		rendered: &std::collections::HashMap<NodeId, Position>,
	) -> Graph {
		let nodes = self
			.nodes
			.iter()
			.map(|node| Node {
				position: rendered.get(&node.id).copied(),
				..node.clone()
			})
			.collect();
		Graph {
			nodes,
			edges: self.edges.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_ids_accept_numbers_and_strings() {
		let ids: Vec<NodeId> = serde_json::from_str(r#"[7, "a", 3.5]"#).unwrap();
		assert_eq!(ids, vec![NodeId::from("7"), NodeId::from("a"), NodeId::from("3.5")]);
	}

	#[test]
	fn states_decode_codes_and_names() {
		let states: Vec<NodeState> =
			serde_json::from_str(r#"[0, 1, 2, 3, "infected", "2", 9, null]"#).unwrap();
		assert_eq!(states[0], Compartment::Susceptible.into());
		assert_eq!(states[1], Compartment::Infected.into());
		assert_eq!(states[2], Compartment::Recovered.into());
		assert_eq!(states[3], Compartment::Deceased.into());
		assert_eq!(states[4], Compartment::Infected.into());
		assert_eq!(states[5], Compartment::Recovered.into());
		assert_eq!(states[6], NodeState::Unrecognized("9".into()));
		assert_eq!(states[7], NodeState::Unrecognized("null".into()));
		assert_eq!(states[1].to_string(), "Infected");
		assert_eq!(states[6].to_string(), "unknown state 9");
	}

	#[test]
	fn rendered_positions_replace_snapshot_frame() {
		let graph = Graph::new(
			vec![Node::new("a", Compartment::Susceptible).at(1.0, 1.0), Node::new("b", Compartment::Infected)],
			vec![Edge::new("a", "b")],
		);
		let positions = [(NodeId::from("b"), Position::new(5.0, 6.0))].into_iter().collect();
		let moved = graph.with_rendered_positions(&positions);
		assert_eq!(moved.nodes[0].position, None);
		assert_eq!(moved.nodes[1].position, Some(Position::new(5.0, 6.0)));
		assert_eq!(moved.edges, graph.edges);
	}
}
