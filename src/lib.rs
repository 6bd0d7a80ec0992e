//! Browser dashboard for a remote epidemic-on-a-network simulator.
//!
//! The `network` module holds the view projection core (adjacency index,
//! neighborhood expansion, view modes, incremental state sync) and has no
//! browser dependencies; the rest is the Leptos client-side app around it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod network;
mod pages;

// Top-Level pages
use crate::pages::dashboard::Dashboard;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the dashboard and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Epidemic Network Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=|| view! { <Dashboard /> } />
			</Routes>
		</Router>
	}
}
