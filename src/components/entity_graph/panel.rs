use leptos::prelude::*;

use super::simulation::Simulation;

/// Side panel for the selected node: risk, details and connections.
#[component]
pub fn DetailsPanel(
	sim: StoredValue<Simulation, LocalStorage>,
	selected: RwSignal<Option<String>>,
	revision: RwSignal<u64>,
) -> impl IntoView {
	move || {
		revision.track();
		let id = selected.get()?;
		let (node, connections) = sim.with_value(|s| Some((s.node(&id)?.clone(), s.connections(&id))))?;
		let level = node.risk_level();

		Some(view! {
			<aside class="details-panel">
				<header>
					<div>
						<h3>{node.label.clone()}</h3>
						<span class="node-kind" style:color=node.kind.color()>
							{format!("{} node", node.kind)}
						</span>
					</div>
					<button class="close" title="Close" on:click=move |_| selected.set(None)>
						"×"
					</button>
				</header>

				<section>
					<label>"Risk Assessment"</label>
					<div class="risk-bar">
						<div
							class="risk-fill"
							style:width=format!("{}%", node.risk)
							style:background-color=level.color()
						></div>
					</div>
					<span class="risk-score" style:color=level.color()>
						{format!("{}/100", node.risk)}
					</span>
				</section>

				<p class="details">{node.details.clone()}</p>

				<section>
					<label>"Connections"</label>
					<ul class="connections">
						{connections
							.into_iter()
							.map(|c| {
								view! {
									<li>
										<span>{format!("{} {}", c.direction.arrow(), c.kind)}</span>
										<span class="other">{c.other_label.unwrap_or(c.other_id)}</span>
									</li>
								}
							})
							.collect_view()}
					</ul>
				</section>
			</aside>
		})
	}
}
