use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS, NodeInfo};
use crate::network::state_color;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn hover_label(info: &NodeInfo) -> String {
	let mut label = format!("{} · {}", info.id, info.state);
	if let Some(degree) = info.degree {
		label.push_str(&format!(" · {degree} contacts"));
	}
	if let Some(distance) = info.social_distance {
		label.push_str(&format!(" · distancing {distance:.1}"));
	}
	label
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.node_count() == 0 {
		draw_placeholder(state, ctx);
		return;
	}
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_placeholder(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(
		&state.placeholder,
		state.width / 2.0,
		state.height / 2.0,
	);
	ctx.set_text_align("start");
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let line_width = 1.0 / state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let weighted = line_width * state.edge_weight(n1.index(), n2.index()).clamp(0.5, 4.0);

		// t=0: all edges at base (0.35), t=1: highlighted at 0.9, others at 0.08
		let (edge_alpha, width) = if is_highlighted {
			(0.35 + 0.55 * t, weighted * (1.0 + 0.5 * t))
		} else {
			(0.35 - 0.27 * t, weighted)
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	});
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = if has_highlight {
			(1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t))
		} else {
			(1.0, NODE_RADIUS)
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(state_color(&node.data.user_data.state));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if state.focus == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 220, 120, 0.9)");
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);

		let radius = if is_hovered {
			NODE_RADIUS * (1.0 + 0.35 * t)
		} else {
			NODE_RADIUS * (1.0 + 0.2 * t)
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(state_color(&node.data.user_data.state));
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();

			ctx.set_fill_style_str("white");
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(&hover_label(&node.data.user_data), x + radius + 3.0, y + 3.0);
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::{Compartment, NodeId, NodeState};

	#[test]
	fn hover_label_lists_known_details() {
		let mut info = NodeInfo {
			id: NodeId::from(4u64),
			state: Compartment::Recovered.into(),
			..Default::default()
		};
		assert_eq!(hover_label(&info), "4 · Recovered");

		info.state = NodeState::Unrecognized("7".into());
		info.degree = Some(3);
		info.social_distance = Some(1.5);
		assert_eq!(hover_label(&info), "4 · unknown state 7 · 3 contacts · distancing 1.5");
	}
}
