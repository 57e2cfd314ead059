//! Pointer-event interpretation: drag, click, hover, pan, zoom.
//!
//! The controller consumes abstract pointer events, so the engine core
//! never sees a DOM type; the canvas component is just one adapter
//! feeding it. Gesture families never conflict: the left button drags
//! nodes and clicks, the right button pans, and the wheel zooms.
//!
//! A node drag runs press -> move -> release. The press pins the node and
//! raises it; moves update position and pin together and refresh only the
//! adjacent links; a release with exactly zero net displacement is a
//! click instead of a drag. Pins are never cleared.

use super::graph::Topology;
use super::scene::Scene;
use super::selection::{Highlight, Preview};
use super::transform::ViewTransform;

/// Pointer button, already resolved by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	/// Primary button: drag and click.
	Left,
	/// Secondary button: pan.
	Right,
	/// Anything else; ignored.
	Other,
}

/// One pointer event in canvas-relative screen coordinates.
#[derive(Clone, Copy, Debug)]
pub enum PointerEvent {
	/// Button pressed.
	Down {
		/// Canvas-relative x.
		x: f64,
		/// Canvas-relative y.
		y: f64,
		/// Which button went down.
		button: PointerButton,
	},
	/// Pointer moved.
	Move {
		/// Canvas-relative x.
		x: f64,
		/// Canvas-relative y.
		y: f64,
	},
	/// Button released.
	Up {
		/// Canvas-relative x.
		x: f64,
		/// Canvas-relative y.
		y: f64,
	},
	/// Pointer left the canvas.
	Leave,
	/// Wheel turned.
	Wheel {
		/// Canvas-relative x of the zoom anchor.
		x: f64,
		/// Canvas-relative y of the zoom anchor.
		y: f64,
		/// Positive zooms out, negative zooms in.
		delta_y: f64,
	},
}

/// Interaction results the engine turns into host callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
	NodeClicked(usize),
	LinkClicked(usize),
	SelectionCleared,
}

/// Mutable engine state the controller works against.
pub(crate) struct Cx<'a> {
	pub topology: &'a mut Topology,
	pub scene: &'a mut Scene,
	pub highlight: &'a mut Highlight,
	pub transform: &'a mut ViewTransform,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PressTarget {
	Node(usize),
	Link(usize),
	Canvas,
}

#[derive(Clone, Copy, Debug)]
struct Press {
	target: PressTarget,
	/// Press point in graph coordinates.
	gx: f64,
	gy: f64,
	/// Dragged node position at press time.
	node_x: f64,
	node_y: f64,
}

#[derive(Clone, Copy, Debug)]
struct Pan {
	sx: f64,
	sy: f64,
	tx: f64,
	ty: f64,
}

/// Drag/press bookkeeping between down and up.
#[derive(Debug, Default)]
pub(crate) struct Controller {
	press: Option<Press>,
	pan: Option<Pan>,
}

impl Controller {
	pub(crate) fn handle(&mut self, event: PointerEvent, cx: Cx<'_>) -> Option<Outcome> {
		match event {
			PointerEvent::Down { x, y, button } => self.on_down(x, y, button, cx),
			PointerEvent::Move { x, y } => self.on_move(x, y, cx),
			PointerEvent::Up { x, y } => self.on_up(x, y, cx),
			PointerEvent::Leave => {
				self.press = None;
				self.pan = None;
				cx.highlight.clear_preview(cx.scene, cx.topology);
				None
			}
			PointerEvent::Wheel { x, y, delta_y } => {
				cx.transform.zoom_at(x, y, delta_y);
				None
			}
		}
	}

	fn on_down(&mut self, x: f64, y: f64, button: PointerButton, cx: Cx<'_>) -> Option<Outcome> {
		match button {
			PointerButton::Right => {
				self.pan = Some(Pan {
					sx: x,
					sy: y,
					tx: cx.transform.x,
					ty: cx.transform.y,
				});
			}
			PointerButton::Left => {
				let (gx, gy) = cx.transform.screen_to_graph(x, y);
				let (target, node_x, node_y) = if let Some(i) = cx.scene.node_at(gx, gy) {
					cx.scene.raise(i);
					let n = &mut cx.topology.nodes[i];
					n.fx = Some(n.x);
					n.fy = Some(n.y);
					(PressTarget::Node(i), n.x, n.y)
				} else if let Some(i) = cx.scene.link_at(gx, gy) {
					(PressTarget::Link(i), 0.0, 0.0)
				} else {
					(PressTarget::Canvas, 0.0, 0.0)
				};
				self.press = Some(Press {
					target,
					gx,
					gy,
					node_x,
					node_y,
				});
			}
			PointerButton::Other => {}
		}
		None
	}

	fn on_move(&mut self, x: f64, y: f64, cx: Cx<'_>) -> Option<Outcome> {
		if let Some(pan) = self.pan {
			cx.transform.x = pan.tx + (x - pan.sx);
			cx.transform.y = pan.ty + (y - pan.sy);
			return None;
		}

		let (gx, gy) = cx.transform.screen_to_graph(x, y);
		if let Some(press) = self.press {
			if let PressTarget::Node(i) = press.target {
				let nx = press.node_x + (gx - press.gx);
				let ny = press.node_y + (gy - press.gy);
				let n = &mut cx.topology.nodes[i];
				n.x = nx;
				n.y = ny;
				n.fx = Some(nx);
				n.fy = Some(ny);
				cx.scene.sync_around(i, cx.topology);
			}
			return None;
		}

		let wanted = if let Some(i) = cx.scene.node_at(gx, gy) {
			Preview::Node(i)
		} else if let Some(i) = cx.scene.link_at(gx, gy) {
			Preview::Link(i)
		} else {
			Preview::None
		};
		if cx.highlight.preview() != wanted {
			match wanted {
				Preview::Node(i) => cx.highlight.preview_node(i, cx.scene, cx.topology),
				Preview::Link(i) => cx.highlight.preview_link(i, cx.scene, cx.topology),
				Preview::None => cx.highlight.clear_preview(cx.scene, cx.topology),
			}
		}
		None
	}

	fn on_up(&mut self, x: f64, y: f64, cx: Cx<'_>) -> Option<Outcome> {
		if self.pan.take().is_some() {
			return None;
		}
		let press = self.press.take()?;
		let (gx, gy) = cx.transform.screen_to_graph(x, y);
		let clicked = gx - press.gx == 0.0 && gy - press.gy == 0.0;
		if !clicked {
			// a real drag: the node stays pinned where it was released
			return None;
		}
		match press.target {
			PressTarget::Node(i) => {
				cx.highlight.select_node(i, cx.scene, cx.topology);
				Some(Outcome::NodeClicked(i))
			}
			PressTarget::Link(i) => {
				cx.highlight.select_link(i, cx.scene, cx.topology);
				Some(Outcome::LinkClicked(i))
			}
			PressTarget::Canvas => {
				cx.highlight.clear_selection(cx.scene, cx.topology);
				Some(Outcome::SelectionCleared)
			}
		}
	}
}
