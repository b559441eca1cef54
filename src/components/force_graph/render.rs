use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

const BACKGROUND: &str = "#1a1a2e";

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	clear(ctx, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow_size = 6.0 / k.max(0.5);
	let positions = state.positions();
	let mut nodes = std::collections::HashMap::new();
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		nodes.insert(node.index(), (info.color, info.radius));
	});

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target)) else {
			continue;
		};
		let (Some(&(c1, _)), Some(&(c2, r2))) = (nodes.get(&edge.source), nodes.get(&edge.target)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let alpha = edge.fade.value;
		let (ux, uy) = (dx / dist, dy / dist);

		// Bait color fades into prey color along the edge.
		let gradient = ctx.create_linear_gradient(x1, y1, x2, y2);
		let _ = gradient.add_color_stop(0.0, &c1.to_rgba(alpha));
		let _ = gradient.add_color_stop(1.0, &c2.to_rgba(alpha));
		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.set_line_width(edge.width / k.max(0.5));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();

		let head = edge.color.unwrap_or(c2);
		ctx.set_fill_style_str(&head.to_rgba(alpha));
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let font = format!("{}px sans-serif", 10.0 / k.max(0.5));

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y, alpha) = (node.x() as f64, node.y() as f64, info.fade.value);

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color.to_string());
		ctx.fill();
		ctx.set_line_width(0.4 / k.max(0.5));
		ctx.set_stroke_style_str("#000000");
		ctx.stroke();

		if state.hover == Some(node.index()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.label, x + info.radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	});
}
