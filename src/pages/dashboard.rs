use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::api::{ApiClient, ApiError, SimulationId, SimulationSummary};
use crate::components::force_graph::{ForceGraphCanvas, GraphHandle};
use crate::components::summary::SummaryPanel;
use crate::config::DashboardConfig;
use crate::network::{NodeId, Reach, SnapshotKind, ViewMode, ViewSession};

/// Event handlers of the dashboard, shared by every control.
#[derive(Clone)]
struct Controller {
	config: Rc<DashboardConfig>,
	client: ApiClient,
	session: Rc<RefCell<ViewSession>>,
	graph: GraphHandle,
	simulation: RwSignal<Option<SimulationId>>,
	summary: RwSignal<Option<SimulationSummary>>,
	peak: RwSignal<Option<(u32, u64)>>,
	mode: RwSignal<String>,
	status: RwSignal<String>,
}

impl Controller {
	fn new(config: DashboardConfig) -> Self {
		let client = ApiClient::new(config.api_base.clone(), config.layout_scale);
		let session = ViewSession::from_entropy(config.initial_mode.clone());
		let mode = RwSignal::new(config.initial_mode.label().to_string());
		Self {
			config: Rc::new(config),
			client,
			session: Rc::new(RefCell::new(session)),
			graph: GraphHandle::default(),
			simulation: RwSignal::new(None),
			summary: RwSignal::new(None),
			peak: RwSignal::new(None),
			mode,
			status: RwSignal::new("Create a simulation to begin".into()),
		}
	}

	fn report(&self, action: &str, err: ApiError) {
		warn!("{action} failed: {err}");
		self.status.set(format!("{action} failed: {err}"));
	}

	/// Fetches the network and hands it to the session. The ticket is taken
	/// before the request so an older response arriving late is dropped.
	async fn load_network(&self, id: &SimulationId, kind: SnapshotKind) -> Result<(), ApiError> {
		let ticket = self.session.borrow_mut().issue();
		let graph = self.client.network(id).await?;

		let mut session = self.session.borrow_mut();
		if let Some(update) = session.ingest(ticket, graph, kind) {
			self.graph.apply(&update, session.mode());
		}
		Ok(())
	}

	fn create(&self) {
		let this = self.clone();
		self.status.set("Creating simulation…".into());
		spawn_local(async move {
			let result: Result<(), ApiError> = async {
				let id = this.client.create(&this.config.simulation).await?;
				info!("Simulation {} created", id.0);
				this.simulation.set(Some(id.clone()));
				this.peak.set(None);
				this.summary.set(Some(this.client.state(&id).await?));
				this.load_network(&id, SnapshotKind::Fresh).await
			}
			.await;
			match result {
				Ok(()) => this.status.set("Ready".into()),
				Err(err) => this.report("Create", err),
			}
		});
	}

	fn advance(&self) {
		let Some(id) = self.simulation.get_untracked() else {
			self.report("Advance", ApiError::NoSimulation);
			return;
		};
		let this = self.clone();
		let days = self.config.advance_days;
		spawn_local(async move {
			let result: Result<(), ApiError> = async {
				let summary = this.client.advance(&id, days).await?;
				// Advances may overlap; a slower response must not roll the day back.
				let day = summary.current_day;
				let mut shown = true;
				this.summary.update(|current| {
					shown = summary.supersedes(current.as_ref());
					if shown {
						*current = Some(summary);
					}
				});
				if shown {
					this.status.set(format!("Day {day}"));
				}
				this.load_network(&id, SnapshotKind::Step).await?;
				let stats = this.client.stats(&id).await?;
				this.peak.set(stats.peak_infected());
				Ok(())
			}
			.await;
			if let Err(err) = result {
				this.report("Advance", err);
			}
		});
	}

	/// Reloads the network and projects it again under the current mode.
	fn refresh(&self) {
		let Some(id) = self.simulation.get_untracked() else {
			return;
		};
		let this = self.clone();
		spawn_local(async move {
			if let Err(err) = this.load_network(&id, SnapshotKind::Fresh).await {
				this.report("Refresh", err);
			}
		});
	}

	fn set_mode(&self, mode: ViewMode) {
		let positions = self.graph.positions();
		let mut session = self.session.borrow_mut();
		self.mode.set(mode.label().to_string());
		if let Some(projection) = session.set_mode(mode, &positions) {
			self.graph.rebuild(&projection, session.mode());
		}
	}

	fn set_reach(&self, reach: Reach) {
		let positions = self.graph.positions();
		let mut session = self.session.borrow_mut();
		if let Some(projection) = session.set_reach(reach, &positions) {
			self.mode.set(session.mode().label().to_string());
			self.graph.rebuild(&projection, session.mode());
		}
	}

	fn resample(&self) {
		let positions = self.graph.positions();
		let mut session = self.session.borrow_mut();
		if let Some(projection) = session.reproject(&positions) {
			self.graph.rebuild(&projection, session.mode());
		}
	}

	fn focus(&self, id: NodeId) {
		info!("Focus on node {id}");
		let positions = self.graph.positions();
		let mut session = self.session.borrow_mut();
		self.mode.set(format!("zoom on {id}"));
		if let Some(projection) = session.focus_on(id, &positions) {
			self.graph.rebuild(&projection, session.mode());
		}
	}
}

/// Simulation dashboard: controls, summary and the network view.
#[component]
pub fn Dashboard(#[prop(optional)] config: Option<DashboardConfig>) -> impl IntoView {
	let controller = Controller::new(config.unwrap_or_default());
	let has_simulation = {
		let simulation = controller.simulation;
		move || simulation.get().is_some()
	};

	let on_focus: Rc<dyn Fn(NodeId)> = {
		let c = controller.clone();
		Rc::new(move |id| c.focus(id))
	};
	let (c_create, c_advance, c_refresh) = (controller.clone(), controller.clone(), controller.clone());
	let (c_full, c_sample, c_zoom, c_hops, c_resample) = (
		controller.clone(),
		controller.clone(),
		controller.clone(),
		controller.clone(),
		controller.clone(),
	);
	let (summary, peak, mode, status) = (
		controller.summary,
		controller.peak,
		controller.mode,
		controller.status,
	);

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas graph=controller.graph.clone() on_focus=on_focus fullscreen=true />
			<div class="graph-overlay">
				<h1>"Epidemic Network"</h1>
				<div class="toolbar">
					<button on:click=move |_| c_create.create()>"New simulation"</button>
					<button
						on:click=move |_| c_advance.advance()
						disabled=move || !has_simulation()
					>
						"Advance"
					</button>
					<button on:click=move |_| c_refresh.refresh()>"Refresh"</button>
				</div>
				<div class="toolbar">
					<button on:click=move |_| c_full.set_mode(ViewMode::Full)>"Full"</button>
					<button on:click=move |_| {
						let mode = c_sample.config.sample_mode();
						c_sample.set_mode(mode)
					}>"Sample"</button>
					<button on:click=move |_| {
						let reach = c_zoom.config.zoom_reach;
						c_zoom.set_reach(reach)
					}>"Zoom"</button>
					<button on:click=move |_| {
						let reach = c_hops.config.hop_reach;
						c_hops.set_reach(reach)
					}>"Neighbors"</button>
					<button on:click=move |_| c_resample.resample()>"Resample"</button>
				</div>
				<p class="subtitle">{move || status.get()}</p>
				<SummaryPanel summary=summary peak=peak mode=mode />
			</div>
		</div>
	}
}
