use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::oracle::Point;
use super::state::CardGraphState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Visible nodes with their current position and radius.
fn placed(state: &CardGraphState) -> HashMap<String, (Point, f64)> {
	let mut out = HashMap::new();
	state.layout.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if state.visible.contains(&info.id) {
			out.insert(
				info.id.clone(),
				(Point::new(node.x() as f64, node.y() as f64), info.size),
			);
		}
	});
	out
}

pub fn render(state: &CardGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width(), state.height());
	ctx.save();
	let t = &state.layout.transform;
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	let placed = placed(state);
	draw_edges(state, &placed, ctx);
	draw_drag_origin(state, &placed, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(
	state: &CardGraphState,
	placed: &HashMap<String, (Point, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.layout.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.interaction.highlight_t);

	for &i in &state.visible.edges {
		let edge = &state.graph.edges[i];
		let (Some(&(p1, r1)), Some(&(p2, r2))) = (
			placed.get(edge.source.as_str()),
			placed.get(edge.target.as_str()),
		) else {
			continue;
		};
		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if state.interaction.is_edge_highlighted(i) {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(p1.x + ux * r1, p1.y + uy * r1);
		ctx.line_to(p2.x - ux * (r2 + arrow_size), p2.y - uy * (r2 + arrow_size));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (p2.x - ux * r2, p2.y - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Dotted tether from where the dragged node was picked up.
fn draw_drag_origin(
	state: &CardGraphState,
	placed: &HashMap<String, (Point, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let Some(id) = state.stabilizer.dragged() else {
		return;
	};
	let (Some(origin), Some(&(now, _))) = (state.stabilizer.captured(id), placed.get(id)) else {
		return;
	};
	let k = state.layout.transform.k;
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.35)");
	ctx.set_line_width(1.0 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(2.0 / k),
		&JsValue::from_f64(3.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(origin.x, origin.y);
	ctx.line_to(now.x, now.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, radius: f64, k: f64) {
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
}

fn draw_nodes(state: &CardGraphState, ctx: &CanvasRenderingContext2d) {
	let ui = &state.interaction;
	let (has_highlight, t, k) = (
		ui.has_active_highlight(),
		ease_out_cubic(ui.highlight_t),
		state.layout.transform.k,
	);

	// Dimmed pass first so highlighted nodes land on top.
	state.layout.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if !state.visible.contains(&info.id) || (has_highlight && ui.is_highlighted(&info.id)) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, info.size * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if info.level == 0 || ui.is_selected(&info.id) {
			draw_ring(ctx, x, y, radius, k, alpha, ui.is_selected(&info.id));
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		draw_label(ctx, &info.label, x, y, radius, k);
	});

	if !has_highlight {
		return;
	}

	state.layout.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if !state.visible.contains(&info.id) || !ui.is_highlighted(&info.id) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = ui.is_hovered(&info.id);

		let (radius, glow_radius) = if is_hovered {
			(info.size * (1.0 + 0.35 * t), info.size * (1.8 + 1.2 * t))
		} else {
			(info.size * (1.0 + 0.2 * t), info.size * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
		if info.level == 0 || ui.is_selected(&info.id) {
			draw_ring(ctx, x, y, radius, k, 1.0, ui.is_selected(&info.id));
		}

		ctx.set_fill_style_str("white");
		draw_label(ctx, &info.label, x, y, radius, k);
	});
}

/// Outline marking the center card (thin) or the selected card (gold).
fn draw_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, k: f64, alpha: f64, selected: bool) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
	let color = if selected {
		format!("rgba(255, 200, 60, {})", alpha)
	} else {
		format!("rgba(255, 255, 255, {})", alpha * 0.6)
	};
	ctx.set_stroke_style_str(&color);
	ctx.set_line_width(if selected { 2.0 / k } else { 1.0 / k });
	ctx.stroke();
}
