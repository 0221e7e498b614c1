//! Draw a [`Scene`] onto a 2d canvas context. This is the only place the
//! frame description meets the DOM.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{NodeOutline, NodeShape, Scene};

const EDGE_STROKE: &str = "#6b7280";
const LABEL_FILL: &str = "#374151";
const TEXT_FILL: &str = "#1e293b";
const GUIDE_STROKE: &str = "#3b82f6";
const HANDLE_FILL: &str = "#3b82f6";
const ARROW_SIZE: f64 = 8.0;
const HANDLE_RADIUS: f64 = 6.0;

/// Render one frame.
pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);
	draw_edges(scene, ctx);
	draw_labels(scene, ctx);
	draw_nodes(scene, ctx);
	draw_guide(scene, ctx);
	ctx.restore();
}

fn set_dash(ctx: &CanvasRenderingContext2d, on: f64, off: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(on),
		&JsValue::from_f64(off),
	));
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(EDGE_STROKE);
	ctx.set_line_width(3.0);
	for edge in &scene.edges {
		if edge.dashed {
			set_dash(ctx, 6.0, 6.0);
		} else {
			clear_dash(ctx);
		}
		ctx.begin_path();
		ctx.move_to(edge.from.0, edge.from.1);
		ctx.bezier_curve_to(
			edge.c1.0, edge.c1.1, edge.c2.0, edge.c2.1, edge.to.0, edge.to.1,
		);
		ctx.stroke();

		// Arrowhead along the incoming tangent (last control point -> end).
		let (dx, dy) = (edge.to.0 - edge.c2.0, edge.to.1 - edge.c2.1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (back_x, back_y) = (edge.to.0 - ux * ARROW_SIZE, edge.to.1 - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		clear_dash(ctx);
		ctx.set_fill_style_str(EDGE_STROKE);
		ctx.begin_path();
		ctx.move_to(edge.to.0, edge.to.1);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	clear_dash(ctx);
}

fn draw_labels(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(LABEL_FILL);
	ctx.set_font("600 14px sans-serif");
	ctx.set_text_align("center");
	for label in &scene.labels {
		let _ = ctx.fill_text(&label.text, label.at.0, label.at.1);
	}
}

fn outline_path(ctx: &CanvasRenderingContext2d, node: &NodeShape) {
	let (x, y) = node.at;
	let (hw, hh) = node.half;
	ctx.begin_path();
	match node.outline {
		NodeOutline::RoundedRect => {
			let r = 15.0_f64.min(hh);
			ctx.move_to(x - hw + r, y - hh);
			let _ = ctx.arc_to(x + hw, y - hh, x + hw, y + hh, r);
			let _ = ctx.arc_to(x + hw, y + hh, x - hw, y + hh, r);
			let _ = ctx.arc_to(x - hw, y + hh, x - hw, y - hh, r);
			let _ = ctx.arc_to(x - hw, y - hh, x + hw, y - hh, r);
			ctx.close_path();
		}
		NodeOutline::Oval => {
			let _ = ctx.ellipse(x, y, hw, hh, 0.0, 0.0, 2.0 * PI);
		}
		NodeOutline::Diamond => {
			ctx.move_to(x, y - hh);
			ctx.line_to(x + hw, y);
			ctx.line_to(x, y + hh);
			ctx.line_to(x - hw, y);
			ctx.close_path();
		}
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in &scene.nodes {
		outline_path(ctx, node);
		ctx.set_fill_style_str(node.fill);
		ctx.fill();
		ctx.set_stroke_style_str(node.stroke);
		ctx.set_line_width(node.stroke_width);
		ctx.stroke();

		ctx.set_fill_style_str(TEXT_FILL);
		ctx.set_font("600 16px sans-serif");
		// A trailing caret marks the inline edit buffer.
		let text = if node.editing {
			format!("{}|", node.text)
		} else {
			node.text.clone()
		};
		let _ = ctx.fill_text(&text, node.at.0, node.at.1);

		if let Some((hx, hy)) = node.handle {
			ctx.begin_path();
			let _ = ctx.arc(hx, hy, HANDLE_RADIUS, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(HANDLE_FILL);
			ctx.fill();
		}
	}
}

fn draw_guide(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let Some(guide) = &scene.guide else {
		return;
	};
	ctx.set_stroke_style_str(GUIDE_STROKE);
	ctx.set_line_width(2.0);
	set_dash(ctx, 8.0, 4.0);
	ctx.begin_path();
	ctx.move_to(guide.from.0, guide.from.1);
	ctx.line_to(guide.to.0, guide.to.1);
	ctx.stroke();
	clear_dash(ctx);
}
