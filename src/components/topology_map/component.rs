//! Leptos component binding the engine to an HTML canvas.
//!
//! The component creates the canvas element, translates mouse/wheel
//! events into engine pointer events, and runs the animation loop via
//! `requestAnimationFrame`, ticking the simulation and redrawing each
//! frame. Data changes rebuild the scene through the engine's `start`.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::MapConfig;
use super::engine::{TopologyEvents, TopologyMap};
use super::interaction::{PointerButton, PointerEvent};
use super::render::{self, IconCache};
use super::types::{TipConfig, TopologyData};

/// Engine plus its canvas-side companions.
struct MapContext {
	map: TopologyMap,
	icons: IconCache,
	width: f64,
	height: f64,
}

fn canvas_point(canvas_ref: &NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> (f64, f64) {
	let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive topology map on a canvas element.
///
/// The component sizes itself to its parent container unless the config
/// carries explicit dimensions, builds the engine from the reactive
/// `data` signal (rebuilding the scene when it changes), and forwards
/// host callbacks to `events`.
#[component]
pub fn TopologyMapCanvas(
	/// Topology document to render.
	#[prop(into)]
	data: Signal<TopologyData>,
	/// Visual configuration.
	#[prop(optional)]
	config: MapConfig,
	/// Optional start/end markers.
	#[prop(optional)]
	tip: TipConfig,
	/// Host callback sink.
	events: Rc<dyn TopologyEvents>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<MapContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let d = data.get();

		// data changed after mount: rebuild the scene, keep canvas and loop
		if let Some(ref mut c) = *context_init.borrow_mut() {
			if let Err(e) = c.map.start(d.nodes, d.links, d.class_infos) {
				error!("topology-map: rebuild failed: {e}");
			}
			c.icons.prepare(c.map.scene());
			return;
		}

		let (w, h) = (
			config.width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			config.height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut map = TopologyMap::new(config.clone(), events.clone());
		map.set_viewport(w, h);
		map.set_tip(tip.clone());
		if let Err(e) = map.start(d.nodes, d.links, d.class_infos) {
			error!("topology-map: initial build failed: {e}");
		}
		let mut icons = IconCache::default();
		icons.prepare(map.scene());

		*context_init.borrow_mut() = Some(MapContext {
			map,
			icons,
			width: w,
			height: h,
		});

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.map.tick();
				render::render(
					c.map.scene(),
					&ctx,
					c.map.transform(),
					c.map.config(),
					&c.icons,
					c.width,
					c.height,
				);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = web_sys::window()
				.unwrap()
				.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = canvas_point(&canvas_ref, &ev);
		let button = match ev.button() {
			0 => PointerButton::Left,
			2 => PointerButton::Right,
			_ => PointerButton::Other,
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.map.handle_pointer(PointerEvent::Down { x, y, button });
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = canvas_point(&canvas_ref, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.map.handle_pointer(PointerEvent::Move { x, y });
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = canvas_point(&canvas_ref, &ev);
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.map.handle_pointer(PointerEvent::Up { x, y });
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.map.handle_pointer(PointerEvent::Leave);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = {
			let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
			let rect = canvas.get_bounding_client_rect();
			(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			)
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.map.handle_pointer(PointerEvent::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="topology-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block; cursor: pointer;"
		/>
	}
}
