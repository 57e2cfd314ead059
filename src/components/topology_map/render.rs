//! Canvas rendering for the topology map scene.
//!
//! Immediate-mode: the whole scene is redrawn each frame from the scene
//! graph under the current view transform. Links paint first, then node
//! glyphs in z-order, so a raised (dragged) node covers everything else.

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::config::MapConfig;
use super::scene::{LinkVisual, NodeVisual, Scene, TipKind};
use super::transform::ViewTransform;

/// Opacity applied to dimmed elements during a hover preview.
const DIM_ALPHA: f64 = 0.15;
/// Fill of the active selection shapes.
const SELECTION_FILL: &str = "#e3f2ff";
/// Dash pattern of the selection outlines.
const SELECTION_DASH: (f64, f64) = (4.0, 3.7);
/// Arrowhead length along the path direction.
const ARROW_LENGTH: f64 = 8.0;
/// Arrowhead half-width across the path direction.
const ARROW_HALF_WIDTH: f64 = 6.0;

/// Cache of class-icon images keyed by URL. Entries start loading when
/// prepared and draw once complete; until then the node shows a disc.
#[derive(Default)]
pub struct IconCache {
	images: HashMap<String, HtmlImageElement>,
}

impl IconCache {
	/// Ensure an image element exists for every icon in the scene.
	pub fn prepare(&mut self, scene: &Scene) {
		for node in &scene.nodes {
			if node.icon.is_empty() || self.images.contains_key(&node.icon) {
				continue;
			}
			if let Ok(img) = HtmlImageElement::new() {
				img.set_src(&node.icon);
				self.images.insert(node.icon.clone(), img);
			}
		}
	}

	fn ready(&self, icon: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(icon)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

/// Draw the whole scene.
pub fn render(
	scene: &Scene,
	ctx: &CanvasRenderingContext2d,
	transform: &ViewTransform,
	config: &MapConfig,
	icons: &IconCache,
	width: f64,
	height: f64,
) {
	ctx.clear_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	for link in &scene.links {
		draw_link(ctx, link, config);
	}
	for &i in &scene.z_order {
		draw_node(ctx, &scene.nodes[i], config, icons);
	}

	ctx.restore();
}

fn set_selection_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(SELECTION_DASH.0),
		&JsValue::from_f64(SELECTION_DASH.1),
	));
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_link(ctx: &CanvasRenderingContext2d, link: &LinkVisual, config: &MapConfig) {
	if link.degenerate {
		return;
	}
	ctx.set_global_alpha(if link.dimmed { DIM_ALPHA } else { 1.0 });

	if link.selected {
		let [p0, p1, p2, p3] = link.halo.points;
		ctx.begin_path();
		ctx.move_to(p0.0, p0.1);
		ctx.line_to(p1.0, p1.1);
		ctx.line_to(p2.0, p2.1);
		ctx.line_to(p3.0, p3.1);
		ctx.close_path();
		ctx.set_fill_style_str(SELECTION_FILL);
		ctx.fill();
		set_selection_dash(ctx);
		ctx.set_stroke_style_str(&config.stroke_active_color);
		ctx.set_line_width(1.0);
		ctx.stroke();
		clear_dash(ctx);
	}

	let (x1, y1, x2, y2) = (link.path.x1, link.path.y1, link.path.x2, link.path.y2);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.set_stroke_style_str(&config.line_color);
	ctx.set_line_width(1.0);
	ctx.stroke();

	// arrowhead continues past the path end toward the target circle
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dr = (dx * dx + dy * dy).sqrt();
	if dr > 0.0 {
		let (ux, uy) = (dx / dr, dy / dr);
		let (tip_x, tip_y) = (x2 + ux * ARROW_LENGTH, y2 + uy * ARROW_LENGTH);
		let (px, py) = (uy * ARROW_HALF_WIDTH, -ux * ARROW_HALF_WIDTH);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(x2 + px, y2 + py);
		ctx.line_to(x2 - px, y2 - py);
		ctx.close_path();
		ctx.set_fill_style_str(&config.line_color);
		ctx.fill();
	}

	if !config.line_text_hide && !link.label.is_empty() {
		ctx.set_fill_style_str(&config.line_text_color);
		ctx.set_text_align("center");
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(&link.label, link.label_x, link.label_y);
	}

	ctx.set_global_alpha(1.0);
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	config: &MapConfig,
	icons: &IconCache,
) {
	ctx.set_global_alpha(if node.dimmed { DIM_ALPHA } else { 1.0 });
	ctx.save();
	let _ = ctx.translate(node.x, node.y);

	let side = -2.0 * node.w;
	if node.selected {
		ctx.set_fill_style_str(SELECTION_FILL);
		ctx.fill_rect(node.w - 5.0, node.w - 5.0, side + 10.0, side + 10.0);
		set_selection_dash(ctx);
		ctx.set_stroke_style_str(&config.stroke_active_color);
		ctx.set_line_width(1.0);
		ctx.stroke_rect(node.w - 5.0, node.w - 5.0, side + 10.0, side + 10.0);
		clear_dash(ctx);
	}

	if let Some(img) = icons.ready(&node.icon) {
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
			img, node.w, node.w, side, side,
		);
	} else {
		ctx.begin_path();
		let _ = ctx.arc(0.0, 0.0, node.r * 0.8, 0.0, std::f64::consts::TAU);
		ctx.set_fill_style_str("#d0d7de");
		ctx.fill();
	}

	if !node.label.is_empty() {
		ctx.set_fill_style_str(&config.text_color);
		ctx.set_text_align("center");
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(&node.label, 0.0, -2.0 * node.w);
	}

	if let Some(tip) = node.tip {
		draw_tip(ctx, node, tip);
	}

	ctx.restore();
	ctx.set_global_alpha(1.0);
}

/// Badge above the glyph marking the trace start or end.
fn draw_tip(ctx: &CanvasRenderingContext2d, node: &NodeVisual, tip: TipKind) {
	let (fill, letter) = match tip {
		TipKind::Source => ("#52c41a", "S"),
		TipKind::Target => ("#f5222d", "E"),
	};
	let (bx, by) = (0.0, node.w - 12.0);
	ctx.begin_path();
	let _ = ctx.arc(bx, by, 8.0, 0.0, std::f64::consts::TAU);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_fill_style_str("#fff");
	ctx.set_text_align("center");
	ctx.set_font("10px sans-serif");
	let _ = ctx.fill_text(letter, bx, by + 3.0);
}
