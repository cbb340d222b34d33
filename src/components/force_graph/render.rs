use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::types::{GraphNode, NodeKind};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];
const GROUP_COLOR: &str = "#5c6b7a";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Stable colour per affiliation; unaffiliated characters share the first.
pub fn node_color(node: &GraphNode) -> &'static str {
	if node.kind == NodeKind::Group {
		return GROUP_COLOR;
	}
	let Some(group) = &node.group else {
		return COLORS[0];
	};
	let hash = group
		.bytes()
		.fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
	COLORS[hash % COLORS.len()]
}

/// Draw the last published snapshot.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let config = state.config();
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, config.width, config.height);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_edge_tooltip(state, ctx);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let radius = state.config().node_radius;
	let arrow_size = 8.0;
	let t = ease_out_cubic(state.hover.highlight_t);
	let hovered_edge = state.interaction.hovered_edge();

	for edge in &state.edges {
		let Some(curve) = state.curve(edge) else {
			continue;
		};
		let (x1, y1) = curve.start;
		let (x2, y2) = curve.end;
		if (x2 - x1).hypot(y2 - y1) < 2.0 * radius {
			continue;
		}

		let is_highlighted = state.is_highlighted(&edge.edge.source)
			&& state.is_highlighted(&edge.edge.target)
			&& (state.is_hovered(&edge.edge.source) || state.is_hovered(&edge.edge.target));
		let (mut edge_alpha, mut width) = if is_highlighted {
			(0.6 + 0.3 * t, 1.5 * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 1.5 * (1.0 - 0.3 * t))
		};
		if hovered_edge == Some(edge.id) {
			(edge_alpha, width) = (1.0, 2.5);
		}

		let touches_group = [&edge.edge.source, &edge.edge.target].into_iter().any(|id| {
			state
				.node_data(id)
				.is_some_and(|n| n.kind == NodeKind::Group)
		});
		if touches_group {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);

		// trim both ends to the node rims along the curve's tangents
		let (sx, sy) = curve.tangent_at(0.0);
		let (ex, ey) = curve.tangent_at(1.0);
		let (tip_x, tip_y) = (x2 - ex * radius, y2 - ey * radius);
		ctx.begin_path();
		ctx.move_to(x1 + sx * radius, y1 + sy * radius);
		ctx.quadratic_curve_to(
			curve.control.0,
			curve.control.1,
			tip_x - ex * arrow_size,
			tip_y - ey * arrow_size,
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", (edge_alpha + 0.2).min(1.0)));
		let (back_x, back_y) = (tip_x - ex * arrow_size, tip_y - ey * arrow_size);
		let (px, py) = (-ey * arrow_size * 0.5, ex * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let base = state.config().node_radius;
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	// dimmed nodes first so highlighted ones draw on top
	for p in state.published() {
		let id = p.node.id.as_str();
		if has_highlight && state.is_highlighted(id) {
			continue;
		}
		let (alpha, radius) = if has_highlight {
			(1.0 - 0.7 * t, base * (1.0 - 0.15 * t))
		} else {
			(1.0, base)
		};
		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_color(&p.node));
		ctx.fill();
		if p.is_fixed {
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&p.node.label, p.x + radius + 3.0, p.y + 3.0);
	}

	if !has_highlight {
		return;
	}

	for p in state.published() {
		let id = p.node.id.as_str();
		if !state.is_highlighted(id) {
			continue;
		}
		let (x, y) = (p.x, p.y);
		let is_hovered = state.is_hovered(id);
		let (radius, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
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
		ctx.set_fill_style_str(node_color(&p.node));
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&p.node.label, x + radius + 3.0, y + 3.0);
	}
}

fn draw_edge_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(edge) = state
		.interaction
		.hovered_edge()
		.and_then(|id| state.edges.get(id))
	else {
		return;
	};
	let (Some(curve), Some(text)) = (state.curve(edge), edge.edge.relationship.as_deref()) else {
		return;
	};
	ctx.set_font("12px sans-serif");
	let width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(60.0);
	let (x, y) = (curve.apex.0 - width / 2.0 - 4.0, curve.apex.1 - 22.0);
	ctx.set_fill_style_str("rgba(20, 20, 40, 0.85)");
	ctx.fill_rect(x, y, width + 8.0, 18.0);
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(text, x + 4.0, y + 13.0);
}
