//! topology-map: Interactive force-directed topology map for CMDB graphs.
//!
//! This crate provides a WASM-based visualization component that lays out
//! configuration items and their relationships with a physics simulation
//! and supports pan/zoom, drag pinning, selection, and hover previews.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::topology_map::{
	AttrDef, CiClass, CiLink, CiNode, CiSummary, ClassInfo, ClassInfoMap, MapConfig, NullEvents,
	PointerButton, PointerEvent, Preview, ResolvedNode, Selection, TipConfig, TipKind,
	TopologyData, TopologyError, TopologyEvents, TopologyMap, TopologyMapCanvas,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("topology-map: logging initialized");
}

/// Load topology data from a script element with id="topology-data".
/// Expected format: JSON with { nodes: [...], links: [...], classInfos: {...} }
fn load_topology_data() -> Option<TopologyData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("topology-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<TopologyData>(&json_text) {
		Ok(data) => {
			info!(
				"topology-map: loaded {} nodes, {} links, {} classes",
				data.nodes.len(),
				data.links.len(),
				data.class_infos.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("topology-map: failed to parse topology data: {}", e);
			None
		}
	}
}

/// Event sink that reports interactions to the console.
struct LogEvents;

impl TopologyEvents for LogEvents {
	fn on_node_click(&self, node: &ResolvedNode) {
		info!(
			"topology-map: node {} clicked ({} attrs)",
			node.id,
			node.attrs.len()
		);
	}

	fn on_link_click(&self, link: &CiLink) {
		info!(
			"topology-map: link {} clicked ({} -> {})",
			link.id, link.source, link.target
		);
	}

	fn on_selection_cleared(&self) {
		info!("topology-map: selection cleared");
	}
}

/// Main application component.
/// Loads topology data from the DOM and renders the interactive map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Load topology data from the DOM
	let data = load_topology_data().unwrap_or_default();
	let data_signal = Signal::derive(move || data.clone());
	let events: Rc<dyn TopologyEvents> = Rc::new(LogEvents);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="CI Topology Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-map">
			<TopologyMapCanvas data=data_signal events=events />
			<div class="map-overlay">
				<h1>"CI Topology"</h1>
				<p class="subtitle">
					"Drag items to pin them. Scroll to zoom. Right-drag to pan. Click an item or relationship for details."
				</p>
			</div>
		</div>
	}
}
