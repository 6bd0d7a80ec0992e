use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request to {url} failed: {message}")]
	Transport { url: String, message: String },

	#[error("{url} answered with HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("could not decode response: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("simulation backend: {0}")]
	Backend(String),

	#[error("no simulation has been created yet")]
	NoSimulation,
}

impl ApiError {
	pub(crate) fn transport(url: &str, err: wasm_bindgen::JsValue) -> Self {
		let message = err
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&err, &"message".into())
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{err:?}"));
		ApiError::Transport {
			url: url.to_string(),
			message,
		}
	}
}
