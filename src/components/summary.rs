use leptos::prelude::*;

use crate::api::SimulationSummary;
use crate::network::{Compartment, compartment_color};

/// Day counter and compartment sizes of the running simulation.
#[component]
pub fn SummaryPanel(
	#[prop(into)] summary: Signal<Option<SimulationSummary>>,
	#[prop(into)] peak: Signal<Option<(u32, u64)>>,
	#[prop(into)] mode: Signal<String>,
) -> impl IntoView {
	let counts = move || {
		summary.get().map(|s| {
			let rows = Compartment::ALL
				.into_iter()
				.map(|c| {
					let swatch = format!("background-color: {};", compartment_color(c));
					view! {
						<li>
							<span class="swatch" style=swatch></span>
							{c.label()}
							": "
							{s.count(c)}
						</li>
					}
				})
				.collect_view();
			view! {
				<p class="day">"Day " {s.current_day} " · population " {s.population()}</p>
				<ul class="compartments">{rows}</ul>
			}
		})
	};

	view! {
		<aside class="summary-panel">
			{counts}
			<p class="peak">
				{move || match peak.get() {
					Some((day, count)) => format!("Peak infected: {count} on day {day}"),
					None => "Peak infected: -".to_string(),
				}}
			</p>
			<p class="view-mode">"View: " {move || mode.get()}</p>
		</aside>
	}
}
