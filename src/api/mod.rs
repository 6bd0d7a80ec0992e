//! Client for the remote epidemic simulation backend.

mod client;
mod error;
mod wire;

pub use client::{ApiClient, SimulationId};
pub use error::ApiError;
pub use wire::SimulationSummary;
