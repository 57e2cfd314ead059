//! Public façade tying the solver, scene, selection, and interaction
//! together.
//!
//! [`TopologyMap`] owns every piece of engine state and is fully headless:
//! the canvas component drives it from DOM events and an animation loop,
//! and tests drive it directly. Host callbacks go through the
//! [`TopologyEvents`] sink rather than closures stashed in configuration.

use std::collections::HashMap;
use std::rc::Rc;

use log::info;
use serde_json::Value;

use super::config::MapConfig;
use super::error::{Result, TopologyError};
use super::graph::Topology;
use super::interaction::{Controller, Cx, Outcome, PointerEvent};
use super::scene::Scene;
use super::selection::{Highlight, Preview, Selection};
use super::simulation::{Simulation, SimulationParams};
use super::transform::ViewTransform;
use super::types::{CiClass, CiLink, CiNode, ClassInfoMap, TipConfig};

/// Callbacks the engine raises toward the host application.
///
/// Callbacks fire while the engine is borrowed; implementations must not
/// call back into it synchronously.
pub trait TopologyEvents {
	/// A node was clicked or programmatically selected.
	fn on_node_click(&self, node: &ResolvedNode);
	/// A link was clicked or programmatically selected.
	fn on_link_click(&self, link: &CiLink);
	/// The selection was cleared by an empty-canvas click.
	fn on_selection_cleared(&self);
}

/// Event sink that ignores everything.
pub struct NullEvents;

impl TopologyEvents for NullEvents {
	fn on_node_click(&self, _: &ResolvedNode) {}
	fn on_link_click(&self, _: &CiLink) {}
	fn on_selection_cleared(&self) {}
}

/// A clicked node with its attribute object resolved against the class
/// schema.
#[derive(Clone, Debug)]
pub struct ResolvedNode {
	/// The node's ci id.
	pub id: i64,
	/// The node's class id.
	pub class_id: i64,
	/// Values keyed by `pro_name`; for each definition the standard-name
	/// value wins over the display-name value.
	pub attrs: HashMap<String, Value>,
	/// The node's class display metadata.
	pub ci_class: CiClass,
}

/// The interactive topology map engine.
pub struct TopologyMap {
	config: MapConfig,
	events: Rc<dyn TopologyEvents>,
	tip: TipConfig,
	class_infos: ClassInfoMap,
	topology: Topology,
	scene: Scene,
	simulation: Option<Simulation>,
	highlight: Highlight,
	transform: ViewTransform,
	controller: Controller,
	width: f64,
	height: f64,
	generation: u64,
	running: bool,
}

impl TopologyMap {
	/// Create an engine with no scene yet. Explicit config dimensions are
	/// honored; otherwise the viewport defaults to 800x600 until the host
	/// supplies container measurements via [`set_viewport`].
	///
	/// [`set_viewport`]: TopologyMap::set_viewport
	pub fn new(config: MapConfig, events: Rc<dyn TopologyEvents>) -> Self {
		let width = config.width.unwrap_or(800.0);
		let height = config.height.unwrap_or(600.0);
		Self {
			config,
			events,
			tip: TipConfig::default(),
			class_infos: ClassInfoMap::new(),
			topology: Topology::default(),
			scene: Scene::default(),
			simulation: None,
			highlight: Highlight::default(),
			transform: ViewTransform::default(),
			controller: Controller::default(),
			width,
			height,
			generation: 0,
			running: false,
		}
	}

	/// Override the viewport size with container measurements. Takes
	/// effect at the next `start`.
	pub fn set_viewport(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Designate start/end marker nodes. Takes effect at the next `start`.
	pub fn set_tip(&mut self, tip: TipConfig) {
		self.tip = tip;
	}

	/// (Re)build the scene and restart the simulation, replacing any
	/// prior graph entirely. Scene, selection, and gesture state are
	/// swapped together under the bumped generation, so a stale tick can
	/// never mutate a detached scene. Fails fast on dangling link
	/// endpoints and missing class metadata; on error the previous scene
	/// is left untouched.
	pub fn start(
		&mut self,
		nodes: Vec<CiNode>,
		links: Vec<CiLink>,
		class_infos: ClassInfoMap,
	) -> Result<()> {
		let mut topology = Topology::build(nodes, links, &class_infos)?;
		info!(
			"topology-map: scene built: {} nodes, {} links",
			topology.nodes.len(),
			topology.links.len()
		);

		self.generation += 1;
		self.running = false;

		let simulation = Simulation::new(SimulationParams::for_viewport(self.width, self.height));
		simulation.seed_positions(&mut topology);
		self.scene = Scene::build(&topology, &self.config, &self.tip, &class_infos);
		self.topology = topology;
		self.class_infos = class_infos;
		self.simulation = Some(simulation);
		self.highlight = Highlight::default();
		self.controller = Controller::default();
		self.running = true;
		Ok(())
	}

	/// One animation frame: advance the solver, then refresh scene
	/// geometry, nodes before links. Inert before `start` and after
	/// [`dispose`].
	///
	/// [`dispose`]: TopologyMap::dispose
	pub fn tick(&mut self) {
		if !self.running {
			return;
		}
		let Some(simulation) = self.simulation.as_mut() else {
			return;
		};
		simulation.step(&mut self.topology);
		self.scene.sync(&self.topology);
	}

	/// Stop the simulation and ignore further pointer events. The next
	/// `start` revives the engine.
	pub fn dispose(&mut self) {
		self.running = false;
	}

	/// Monotonic rebuild counter; bumps on every successful `start`.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether a scene is live.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Programmatically set pan/zoom. `(0.0, 0.0, 1.0)` resets the view.
	pub fn change_zoom(&mut self, x: f64, y: f64, k: f64) {
		self.transform.set(x, y, k);
	}

	/// Route one pointer event through the interaction controller and
	/// fire any resulting host callback.
	pub fn handle_pointer(&mut self, event: PointerEvent) {
		if !self.running {
			return;
		}
		let outcome = self.controller.handle(
			event,
			Cx {
				topology: &mut self.topology,
				scene: &mut self.scene,
				highlight: &mut self.highlight,
				transform: &mut self.transform,
			},
		);
		match outcome {
			Some(Outcome::NodeClicked(idx)) => self.fire_node_click(idx),
			Some(Outcome::LinkClicked(idx)) => {
				self.events.on_link_click(&self.topology.links[idx].data);
			}
			Some(Outcome::SelectionCleared) => self.events.on_selection_cleared(),
			None => {}
		}
	}

	/// Select a node by ci id, exactly as if it had been clicked: the
	/// node-click callback fires with the resolved attributes and the
	/// node is highlighted.
	pub fn select_node_by_ci_id(&mut self, ci_id: i64) -> Result<()> {
		let idx = self
			.topology
			.node_index(ci_id)
			.ok_or(TopologyError::UnknownNode(ci_id))?;
		self.highlight
			.select_node(idx, &mut self.scene, &self.topology);
		self.fire_node_click(idx);
		Ok(())
	}

	/// Select a link by rlt id, exactly as if it had been clicked.
	pub fn select_link_by_rlt_id(&mut self, rlt_id: i64) -> Result<()> {
		let idx = self
			.topology
			.link_index(rlt_id)
			.ok_or(TopologyError::UnknownLink(rlt_id))?;
		self.highlight
			.select_link(idx, &mut self.scene, &self.topology);
		self.events.on_link_click(&self.topology.links[idx].data);
		Ok(())
	}

	/// The current scene graph.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// The current node/link arena, for read-only inspection.
	pub fn topology(&self) -> &Topology {
		&self.topology
	}

	/// The current view transform.
	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	/// The current persistent selection.
	pub fn selection(&self) -> Selection {
		self.highlight.selection()
	}

	/// The current hover preview.
	pub fn preview(&self) -> Preview {
		self.highlight.preview()
	}

	/// The engine configuration.
	pub fn config(&self) -> &MapConfig {
		&self.config
	}

	fn fire_node_click(&self, idx: usize) {
		let resolved = self.resolve_node(idx);
		self.events.on_node_click(&resolved);
	}

	/// Build the attribute object delivered on click. The stored node is
	/// left untouched.
	fn resolve_node(&self, idx: usize) -> ResolvedNode {
		let node = &self.topology.nodes[idx].data;
		let class = self
			.class_infos
			.get(&node.class_id)
			.cloned()
			.unwrap_or_default();
		let mut attrs = HashMap::with_capacity(class.attr_defs.len());
		for def in &class.attr_defs {
			let value = def
				.pro_std_name
				.as_ref()
				.and_then(|std| node.attrs.get(std))
				.or_else(|| node.attrs.get(&def.pro_name))
				.cloned();
			if let Some(value) = value {
				attrs.insert(def.pro_name.clone(), value);
			}
		}
		ResolvedNode {
			id: node.id,
			class_id: node.class_id,
			attrs,
			ci_class: class.ci_class,
		}
	}
}
