//! Dashboard defaults and simulation creation parameters.

use serde::Serialize;

use crate::network::{Reach, ViewMode};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Backend layout coordinates sit roughly in [-1, 1]; this maps them into
/// render space.
pub const LAYOUT_SCALE: f64 = 400.0;

/// Body of the create-simulation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationParams {
	pub network_model: String,
	pub network_size: u32,
	pub network_connections: u32,
	pub infection_probability: f64,
	pub recovery_days: [u32; 2],
	pub initial_infected_percent: f64,
	pub mortality_rate: f64,
	pub immunity_period: u32,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			network_model: "barabasi_albert".into(),
			network_size: 1000,
			network_connections: 5,
			infection_probability: 0.3,
			recovery_days: [7, 14],
			initial_infected_percent: 0.01,
			mortality_rate: 0.02,
			immunity_period: 60,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
	pub api_base: String,
	pub layout_scale: f64,
	pub sample_size: usize,
	pub zoom_reach: Reach,
	/// Reach of the Neighbors view: contacts within this many hops.
	pub hop_reach: Reach,
	pub advance_days: u32,
	pub initial_mode: ViewMode,
	pub simulation: SimulationParams,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.into(),
			layout_scale: LAYOUT_SCALE,
			sample_size: 300,
			zoom_reach: Reach::Geometric(1.5),
			hop_reach: Reach::Hops(2),
			advance_days: 1,
			initial_mode: ViewMode::Sample { max_nodes: 300 },
			simulation: SimulationParams::default(),
		}
	}
}

impl DashboardConfig {
	pub fn sample_mode(&self) -> ViewMode {
		ViewMode::Sample {
			max_nodes: self.sample_size,
		}
	}
}
