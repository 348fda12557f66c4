use leptos::prelude::*;

use crate::components::entity_graph::EntityGraphCanvas;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="entity-graph-page">
				<EntityGraphCanvas />
				<p class="subtitle">"Click a node to inspect it. Expand grows the graph by one discovered entity."</p>
			</div>
		</ErrorBoundary>
	}
}
