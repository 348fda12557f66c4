use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::panel::DetailsPanel;
use super::physics::SimulationParameters;
use super::render::{self, Frame, NODE_RADIUS};
use super::simulation::{RunState, Simulation};
use super::types::{NodeKind, Vec2};

const ZOOM_STEP: f64 = 0.1;
const ZOOM_MIN: f64 = 0.5;
const ZOOM_MAX: f64 = 2.0;

fn zoom_by(zoom: f64, delta: f64) -> f64 {
	(zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX)
}

#[component]
pub fn EntityGraphCanvas(
	#[prop(optional)] params: Option<SimulationParameters>,
	#[prop(default = 800.0)] width: f64,
	#[prop(default = 600.0)] height: f64,
) -> impl IntoView {
	let params = match params.unwrap_or_default().validate() {
		Ok(params) => params,
		Err(e) => {
			error!("invalid simulation parameters, using defaults: {e}");
			SimulationParameters::default()
		}
	};
	let interval = Duration::from_secs_f64(params.tick_interval_ms() / 1000.0);

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let sim = StoredValue::new_local(Simulation::seeded(params));
	let rng = StoredValue::new(SmallRng::seed_from_u64(js_sys::Date::now() as u64));
	let (zoom, set_zoom) = signal(1.0_f64);
	let selected = RwSignal::new(None::<String>);
	let running = RwSignal::new(true);
	let tick_count = RwSignal::new(0_u64);
	// Bumped whenever nodes or links are added or replaced.
	let revision = RwSignal::new(0_u64);

	sim.update_value(|s| {
		s.subscribe(move |snapshot| tick_count.set(snapshot.tick));
	});

	match set_interval_with_handle(
		move || {
			sim.update_value(|s| {
				s.tick();
			});
		},
		interval,
	) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => error!("failed to start simulation timer: {e:?}"),
	}
	info!("entity graph ticking every {:.1}ms", interval.as_secs_f64() * 1000.0);

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		let started = js_sys::Date::now();
		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			let selected_id = selected.get_untracked();
			let frame = Frame {
				width,
				height,
				zoom: zoom.get_untracked(),
				selected: selected_id.as_deref(),
				time: (js_sys::Date::now() - started) / 1000.0,
			};
			sim.with_value(|s| render::render(s, &frame, &ctx));

			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let k = zoom.get_untracked();
		let point = Vec2::new(
			(ev.client_x() as f64 - rect.left()) / k,
			(ev.client_y() as f64 - rect.top()) / k,
		);
		let hit = sim.with_value(|s| s.node_at(point, NODE_RADIUS).map(|n| n.id.clone()));
		selected.set(hit);
	};

	let on_toggle = move |_| {
		let state = sim.try_update_value(|s| s.toggle());
		running.set(state != Some(RunState::Paused));
	};

	let on_expand = move |_| {
		rng.update_value(|r| {
			sim.update_value(|s| {
				s.expand(r);
			});
		});
		revision.update(|v| *v += 1);
	};

	let on_reset = move |_| {
		sim.update_value(|s| s.reset());
		running.set(true);
		selected.set(None);
		tick_count.set(0);
		revision.update(|v| *v += 1);
	};

	view! {
		<div class="entity-graph">
			<div class="toolbar">
				<h2>"Entity Graph"</h2>
				<button title="Zoom In" on:click=move |_| set_zoom.update(|z| *z = zoom_by(*z, ZOOM_STEP))>
					"+"
				</button>
				<button title="Zoom Out" on:click=move |_| set_zoom.update(|z| *z = zoom_by(*z, -ZOOM_STEP))>
					"−"
				</button>
				<button
					class:active=move || running.get()
					title=move || if running.get() { "Pause Physics" } else { "Resume Physics" }
					on:click=on_toggle
				>
					{move || if running.get() { "Pause" } else { "Resume" }}
				</button>
				<span class="tick-counter">{move || format!("tick {}", tick_count.get())}</span>
				<button class="primary" on:click=on_expand>"Expand"</button>
				<button on:click=on_reset>"Reset"</button>
			</div>
			<div class="graph-body">
				<div class="graph-area">
					<Legend />
					<canvas node_ref=canvas_ref on:mousedown=on_mousedown style="display: block; cursor: pointer;" />
				</div>
				<DetailsPanel sim selected revision />
			</div>
		</div>
	}
}

#[component]
fn Legend() -> impl IntoView {
	view! {
		<ul class="legend">
			{NodeKind::ALL
				.into_iter()
				.map(|kind| {
					view! {
						<li>
							<span class="swatch" style:background-color=kind.color()></span>
							{kind.legend()}
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_is_clamped() {
		assert!((zoom_by(1.0, ZOOM_STEP) - 1.1).abs() < 1e-12);
		assert_eq!(zoom_by(1.95, ZOOM_STEP), ZOOM_MAX);
		assert_eq!(zoom_by(0.55, -ZOOM_STEP), ZOOM_MIN);
	}
}
