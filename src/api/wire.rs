//! JSON payloads exchanged with the simulation backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::network::{Compartment, DEFAULT_EDGE_WEIGHT, Edge, Graph, Node, NodeId, NodeState, Position};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateResponse {
	pub simulation_id: String,
}

/// Day counter and current compartment sizes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SimulationSummary {
	#[serde(default)]
	pub current_day: u32,
	#[serde(default)]
	pub susceptible: u64,
	#[serde(default)]
	pub infected: u64,
	#[serde(default)]
	pub recovered: u64,
	#[serde(default)]
	pub deceased: u64,
}

impl SimulationSummary {
	pub fn count(&self, compartment: Compartment) -> u64 {
		match compartment {
			Compartment::Susceptible => self.susceptible,
			Compartment::Infected => self.infected,
			Compartment::Recovered => self.recovered,
			Compartment::Deceased => self.deceased,
		}
	}

	pub fn population(&self) -> u64 {
		Compartment::ALL.into_iter().map(|c| self.count(c)).sum()
	}

	/// True unless `shown` is already from a later day.
	pub fn supersedes(&self, shown: Option<&SimulationSummary>) -> bool {
		shown.is_none_or(|shown| self.current_day >= shown.current_day)
	}
}

/// Per-day history since the simulation started. Only the infected series is
/// read; the backend's other series are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SimulationStats {
	#[serde(default)]
	pub days: Vec<u32>,
	#[serde(default)]
	pub infected: Vec<u64>,
}

impl SimulationStats {
	/// Highest infected count and the day it occurred.
	pub fn peak_infected(&self) -> Option<(u32, u64)> {
		self.infected
			.iter()
			.enumerate()
			.max_by_key(|&(i, &count)| (count, std::cmp::Reverse(i)))
			.map(|(i, &count)| (self.days.get(i).copied().unwrap_or(i as u32), count))
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct NetworkPayload {
	#[serde(default)]
	pub nodes: Vec<WireNode>,
	#[serde(default, alias = "links")]
	pub edges: Vec<WireEdge>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WireNode {
	pub id: NodeId,
	#[serde(default)]
	pub state: NodeState,
	pub x: Option<f64>,
	pub y: Option<f64>,
	#[serde(rename = "socialDistance", alias = "social_distance")]
	pub social_distance: Option<f64>,
	pub connections: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WireEdge {
	pub source: NodeId,
	pub target: NodeId,
	pub weight: Option<f64>,
}

impl NetworkPayload {
	/// Converts to a graph snapshot, mapping backend layout coordinates into
	/// render space by `layout_scale`.
	pub fn into_graph(self, layout_scale: f64) -> Graph {
		let nodes = self
			.nodes
			.into_iter()
			.map(|n| {
				let mut node = Node::new(n.id, n.state);
				if let (Some(x), Some(y)) = (n.x, n.y) {
					let scaled = Position::new(x * layout_scale, y * layout_scale);
					if scaled.is_finite() {
						node = node.at(scaled.x, scaled.y);
					}
				}
				node.social_distance = n.social_distance.filter(|d| d.is_finite() && *d > 0.0);
				node.degree = n.connections;
				node
			})
			.collect();
		let edges = self
			.edges
			.into_iter()
			.map(|e| {
				let weight = e.weight.filter(|w| w.is_finite() && *w > 0.0);
				Edge::new(e.source, e.target).with_weight(weight.unwrap_or(DEFAULT_EDGE_WEIGHT))
			})
			.collect();
		Graph::new(nodes, edges)
	}
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct AdvanceRequest {
	pub days: u32,
}

/// Decodes a backend response body. The backend reports failures as
/// `{"error": "..."}` with a success status, so that shape is checked first.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
	let value: serde_json::Value = serde_json::from_str(body)?;
	if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
		return Err(ApiError::Backend(message.to_string()));
	}
	Ok(serde_json::from_value(value)?)
}
