use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::ApiError;
use super::wire::{
	AdvanceRequest, CreateResponse, NetworkPayload, SimulationStats, SimulationSummary, decode,
};
use crate::config::SimulationParams;
use crate::network::Graph;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationId(pub String);

/// Thin fetch-based client for the simulation backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
	layout_scale: f64,
}

impl ApiClient {
	pub fn new(base_url: impl Into<String>, layout_scale: f64) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			layout_scale,
		}
	}

	pub async fn create(&self, params: &SimulationParams) -> Result<SimulationId, ApiError> {
		let created: CreateResponse = self.post("/simulations", params).await?;
		debug!("Created simulation {}", created.simulation_id);
		Ok(SimulationId(created.simulation_id))
	}

	pub async fn state(&self, id: &SimulationId) -> Result<SimulationSummary, ApiError> {
		self.get(&format!("/simulations/{}", id.0)).await
	}

	pub async fn advance(&self, id: &SimulationId, days: u32) -> Result<SimulationSummary, ApiError> {
		self.post(
			&format!("/simulations/{}/advance", id.0),
			&AdvanceRequest { days },
		)
		.await
	}

	pub async fn network(&self, id: &SimulationId) -> Result<Graph, ApiError> {
		let payload: NetworkPayload = self.get(&format!("/simulations/{}/network", id.0)).await?;
		Ok(payload.into_graph(self.layout_scale))
	}

	pub async fn stats(&self, id: &SimulationId) -> Result<SimulationStats, ApiError> {
		self.get(&format!("/simulations/{}/stats", id.0)).await
	}

	async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		self.send("GET", path, None).await
	}

	async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
		let body = serde_json::to_string(body)?;
		self.send("POST", path, Some(body)).await
	}

	async fn send<T: DeserializeOwned>(
		&self,
		method: &str,
		path: &str,
		body: Option<String>,
	) -> Result<T, ApiError> {
		let url = format!("{}{}", self.base_url, path);
		let opts = RequestInit::new();
		opts.set_method(method);
		opts.set_mode(RequestMode::Cors);
		if let Some(body) = &body {
			opts.set_body(&wasm_bindgen::JsValue::from_str(body));
		}

		let request = Request::new_with_str_and_init(&url, &opts)
			.map_err(|e| ApiError::transport(&url, e))?;
		if body.is_some() {
			request
				.headers()
				.set("Content-Type", "application/json")
				.map_err(|e| ApiError::transport(&url, e))?;
		}

		let window = web_sys::window().ok_or_else(|| ApiError::Transport {
			url: url.clone(),
			message: "no window".into(),
		})?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.and_then(|r| r.dyn_into())
			.map_err(|e| ApiError::transport(&url, e))?;

		if !response.ok() {
			warn!("{} {} -> {}", method, url, response.status());
			return Err(ApiError::Status {
				url,
				status: response.status(),
			});
		}

		let text = response.text().map_err(|e| ApiError::transport(&url, e))?;
		let text = JsFuture::from(text)
			.await
			.map_err(|e| ApiError::transport(&url, e))?
			.as_string()
			.unwrap_or_default();
		decode(&text)
	}
}
