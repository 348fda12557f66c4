use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::simulation::Simulation;
use super::types::{GraphNode, RiskLevel};

pub const NODE_RADIUS: f64 = 18.0;
const RISK_HALO_RADIUS: f64 = 25.0;
const SELECTION_RADIUS: f64 = 22.0;
const LABEL_OFFSET: f64 = 32.0;

pub struct Frame<'a> {
	pub width: f64,
	pub height: f64,
	pub zoom: f64,
	pub selected: Option<&'a str>,
	/// Seconds since mount, drives the pulse and the selection ring spin.
	pub time: f64,
}

pub fn render(sim: &Simulation, frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	ctx.save();
	let _ = ctx.scale(frame.zoom, frame.zoom);
	draw_links(sim, ctx);
	draw_nodes(sim, frame, ctx);
	ctx.restore();
}

fn draw_links(sim: &Simulation, ctx: &CanvasRenderingContext2d) {
	let by_id: HashMap<&str, &GraphNode> = sim.nodes().iter().map(|n| (n.id.as_str(), n)).collect();

	ctx.set_stroke_style_str("rgba(51, 65, 85, 0.6)");
	ctx.set_line_width(1.0);
	for link in sim.links() {
		let (Some(source), Some(target)) = (by_id.get(link.source.as_str()), by_id.get(link.target.as_str()))
		else {
			continue;
		};
		ctx.begin_path();
		ctx.move_to(source.position.x, source.position.y);
		ctx.line_to(target.position.x, target.position.y);
		ctx.stroke();
	}
}

fn draw_nodes(sim: &Simulation, frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let pulse = 0.35 + 0.15 * (frame.time * 2.0 * PI).sin();

	for node in sim.nodes() {
		let (x, y) = (node.position.x, node.position.y);

		if node.risk_level() == RiskLevel::High {
			ctx.set_global_alpha(pulse);
			ctx.begin_path();
			let _ = ctx.arc(x, y, RISK_HALO_RADIUS, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(RiskLevel::High.color());
			ctx.set_line_width(1.0);
			ctx.stroke();
			ctx.set_global_alpha(1.0);
		}

		if frame.selected == Some(node.id.as_str()) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(2.0),
			));
			ctx.set_line_dash_offset(-frame.time * 6.0);
			ctx.begin_path();
			let _ = ctx.arc(x, y, SELECTION_RADIUS, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(2.0);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("#0f172a");
		ctx.fill();
		ctx.set_stroke_style_str(node.kind.color());
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.begin_path();
		let _ = ctx.arc(x, y, 4.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.kind.color());
		ctx.fill();

		ctx.set_fill_style_str("#94a3b8");
		ctx.set_font("10px monospace");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&node.label, x, y + LABEL_OFFSET);
	}
}
