//! Selection and hover-preview state.
//!
//! Selection is persistent and exclusive: at most one node or link is
//! highlighted, and picking a new one drops the old highlight. Preview is
//! transient, hover-driven, and orthogonal; leaving it restores full
//! visibility without touching the selection. Both project onto the scene
//! as `selected`/`dimmed` flags after every change.

use super::graph::Topology;
use super::scene::Scene;

/// The persistent selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	Empty,
	/// A node is selected, by arena index.
	Node(usize),
	/// A link is selected, by arena index.
	Link(usize),
}

/// The transient hover preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preview {
	/// No preview active.
	#[default]
	None,
	/// Previewing a node's 1-hop neighborhood.
	Node(usize),
	/// Previewing a link and its two endpoints.
	Link(usize),
}

/// Combined highlight state.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	selection: Selection,
	preview: Preview,
}

impl Highlight {
	/// Current persistent selection.
	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// Current hover preview.
	pub fn preview(&self) -> Preview {
		self.preview
	}

	/// Select a node, dropping any previous highlight.
	pub fn select_node(&mut self, idx: usize, scene: &mut Scene, topology: &Topology) {
		self.selection = Selection::Node(idx);
		self.apply(scene, topology);
	}

	/// Select a link, dropping any previous highlight.
	pub fn select_link(&mut self, idx: usize, scene: &mut Scene, topology: &Topology) {
		self.selection = Selection::Link(idx);
		self.apply(scene, topology);
	}

	/// Clear the selection.
	pub fn clear_selection(&mut self, scene: &mut Scene, topology: &Topology) {
		self.selection = Selection::Empty;
		self.apply(scene, topology);
	}

	/// Dim the scene down to the node's 1-hop neighborhood.
	pub fn preview_node(&mut self, idx: usize, scene: &mut Scene, topology: &Topology) {
		self.preview = Preview::Node(idx);
		self.apply(scene, topology);
	}

	/// Dim the scene down to the link and its endpoints.
	pub fn preview_link(&mut self, idx: usize, scene: &mut Scene, topology: &Topology) {
		self.preview = Preview::Link(idx);
		self.apply(scene, topology);
	}

	/// Restore full visibility, keeping the selection.
	pub fn clear_preview(&mut self, scene: &mut Scene, topology: &Topology) {
		self.preview = Preview::None;
		self.apply(scene, topology);
	}

	fn apply(&self, scene: &mut Scene, topology: &Topology) {
		for v in &mut scene.nodes {
			v.selected = false;
			v.dimmed = false;
		}
		for v in &mut scene.links {
			v.selected = false;
			v.dimmed = false;
		}

		match self.selection {
			Selection::Node(i) => scene.nodes[i].selected = true,
			Selection::Link(i) => scene.links[i].selected = true,
			Selection::Empty => {}
		}

		match self.preview {
			Preview::Node(i) => {
				dim_all(scene);
				scene.nodes[i].dimmed = false;
				for (li, l) in topology.links.iter().enumerate() {
					if l.source == i || l.target == i {
						scene.links[li].dimmed = false;
						scene.nodes[l.source].dimmed = false;
						scene.nodes[l.target].dimmed = false;
					}
				}
			}
			Preview::Link(li) => {
				dim_all(scene);
				let l = &topology.links[li];
				scene.links[li].dimmed = false;
				scene.nodes[l.source].dimmed = false;
				scene.nodes[l.target].dimmed = false;
			}
			Preview::None => {}
		}
	}
}

fn dim_all(scene: &mut Scene) {
	for v in &mut scene.nodes {
		v.dimmed = true;
	}
	for v in &mut scene.links {
		v.dimmed = true;
	}
}
