//! Persistent scene graph mirroring the node and link collections.
//!
//! One visual per node and per link, keyed by stable id and built once per
//! `start`. Per-tick updates rewrite only position-dependent fields; node
//! geometry is refreshed strictly before link geometry so a path is never
//! computed against a stale endpoint.

use super::config::MapConfig;
use super::graph::Topology;
use super::types::{ClassInfoMap, TipConfig};

/// Offset keeping the visible path clear of the arrowhead.
pub const ARROW_CLEARANCE: f64 = 4.0;
/// Perpendicular half-width of the halo quadrilateral.
pub const HALO_HALF_WIDTH: f64 = 4.0;

/// Marker drawn on a designated start or end node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipKind {
	/// The trace start node.
	Source,
	/// The trace end node.
	Target,
}

/// Visual state of one node glyph group.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	/// Stable scene id, `N_<ci id>`.
	pub id: String,
	/// Glyph translation: the node center x.
	pub x: f64,
	/// Glyph translation: the node center y.
	pub y: f64,
	/// Circle radius, from configuration.
	pub r: f64,
	/// Negative half-diagonal; icon offset and selection-rect corner.
	pub w: f64,
	/// Derived display label.
	pub label: String,
	/// Icon reference from the node's class.
	pub icon: String,
	/// Start/end marker, when designated.
	pub tip: Option<TipKind>,
	/// Selection highlight visible.
	pub selected: bool,
	/// Faded out by an active hover preview.
	pub dimmed: bool,
}

/// Straight segment trimmed to the node circles.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkPath {
	/// Start x, on the source circle.
	pub x1: f64,
	/// Start y, on the source circle.
	pub y1: f64,
	/// End x, clear of the target circle by [`ARROW_CLEARANCE`].
	pub x2: f64,
	/// End y.
	pub y2: f64,
}

/// Thin quadrilateral around the segment: the selection halo, and the
/// clickable shape for a link.
#[derive(Clone, Copy, Debug, Default)]
pub struct HaloQuad {
	/// Corners in draw order: source side, target side, back.
	pub points: [(f64, f64); 4],
}

impl HaloQuad {
	/// Centerline of the band, recovered from the corner midpoints.
	fn centerline(&self) -> ((f64, f64), (f64, f64)) {
		let [p0, p1, p2, p3] = self.points;
		(
			((p0.0 + p3.0) / 2.0, (p0.1 + p3.1) / 2.0),
			((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0),
		)
	}
}

/// Visual state of one link group.
#[derive(Clone, Debug)]
pub struct LinkVisual {
	/// Stable scene id, `L_<rlt id>`.
	pub id: String,
	/// The visible directed path.
	pub path: LinkPath,
	/// Selection halo / hit shape.
	pub halo: HaloQuad,
	/// Label anchor x: the center-to-center midpoint.
	pub label_x: f64,
	/// Label anchor y.
	pub label_y: f64,
	/// Relationship-type text.
	pub label: String,
	/// Selection highlight visible.
	pub selected: bool,
	/// Faded out by an active hover preview.
	pub dimmed: bool,
	/// Endpoints coincide; nothing can be drawn this tick.
	pub degenerate: bool,
}

/// Persistent visuals plus the node paint order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	/// Node visuals, arena order.
	pub nodes: Vec<NodeVisual>,
	/// Link visuals, arena order. Links paint below all nodes.
	pub links: Vec<LinkVisual>,
	/// Node indices back-to-front; dragging raises a node to the end.
	pub z_order: Vec<usize>,
}

impl Scene {
	/// Build visuals for a freshly constructed arena and sync geometry.
	pub fn build(
		topology: &Topology,
		config: &MapConfig,
		tip: &TipConfig,
		class_infos: &ClassInfoMap,
	) -> Self {
		let r = config.radius;
		let w = -r * 0.5_f64.sqrt();

		let nodes = topology
			.nodes
			.iter()
			.map(|n| NodeVisual {
				id: format!("N_{}", n.data.id),
				x: n.x,
				y: n.y,
				r,
				w,
				label: n.data.display_label(),
				icon: class_infos
					.get(&n.data.class_id)
					.map(|c| c.ci_class.icon.clone())
					.unwrap_or_default(),
				tip: tip_kind(tip, n.data.id),
				selected: false,
				dimmed: false,
			})
			.collect();

		let links = topology
			.links
			.iter()
			.map(|l| LinkVisual {
				id: format!("L_{}", l.data.id),
				path: LinkPath::default(),
				halo: HaloQuad::default(),
				label_x: 0.0,
				label_y: 0.0,
				label: l.data.rlt_name.clone().unwrap_or_default(),
				selected: false,
				dimmed: false,
				degenerate: true,
			})
			.collect();

		let mut scene = Self {
			nodes,
			links,
			z_order: (0..topology.nodes.len()).collect(),
		};
		scene.sync(topology);
		scene
	}

	/// Per-tick refresh: every node position, then every link geometry.
	pub fn sync(&mut self, topology: &Topology) {
		for (v, n) in self.nodes.iter_mut().zip(&topology.nodes) {
			v.x = n.x;
			v.y = n.y;
		}
		for i in 0..self.links.len() {
			self.sync_link(i, topology);
		}
	}

	/// Refresh one node and only the links touching it. The drag fast
	/// path: the rest of the scene is untouched until the next tick.
	pub fn sync_around(&mut self, idx: usize, topology: &Topology) {
		let n = &topology.nodes[idx];
		self.nodes[idx].x = n.x;
		self.nodes[idx].y = n.y;
		for i in 0..topology.links.len() {
			let l = &topology.links[i];
			if l.source == idx || l.target == idx {
				self.sync_link(i, topology);
			}
		}
	}

	fn sync_link(&mut self, i: usize, topology: &Topology) {
		let link = &topology.links[i];
		let s = &topology.nodes[link.source];
		let t = &topology.nodes[link.target];
		let sr = self.nodes[link.source].r;
		let tr = self.nodes[link.target].r;

		let v = &mut self.links[i];
		let (dx, dy) = (t.x - s.x, t.y - s.y);
		let dr = (dx * dx + dy * dy).sqrt();
		if dr < f64::EPSILON {
			v.degenerate = true;
			return;
		}
		v.degenerate = false;
		let (ux, uy) = (dx / dr, dy / dr);

		v.path = LinkPath {
			x1: s.x + sr * ux,
			y1: s.y + sr * uy,
			x2: t.x - (tr + ARROW_CLEARANCE) * ux,
			y2: t.y - (tr + ARROW_CLEARANCE) * uy,
		};

		// halo centerline: pulled inside the source circle, ending on the
		// target circle, widened by the half-width on both sides
		let (hx1, hy1) = (
			s.x + (sr - HALO_HALF_WIDTH) * ux,
			s.y + (sr - HALO_HALF_WIDTH) * uy,
		);
		let (hx2, hy2) = (t.x - tr * ux, t.y - tr * uy);
		let (px, py) = (HALO_HALF_WIDTH * uy, -HALO_HALF_WIDTH * ux);
		v.halo = HaloQuad {
			points: [
				(hx1 + px, hy1 + py),
				(hx2 + px, hy2 + py),
				(hx2 - px, hy2 - py),
				(hx1 - px, hy1 - py),
			],
		};

		v.label_x = (s.x + t.x) / 2.0;
		v.label_y = (s.y + t.y) / 2.0;
	}

	/// Raise a node to the top of the paint order.
	pub fn raise(&mut self, idx: usize) {
		if let Some(pos) = self.z_order.iter().position(|&i| i == idx) {
			let i = self.z_order.remove(pos);
			self.z_order.push(i);
		}
	}

	/// Topmost node whose circle contains the graph-space point.
	pub fn node_at(&self, gx: f64, gy: f64) -> Option<usize> {
		self.z_order.iter().rev().copied().find(|&i| {
			let n = &self.nodes[i];
			let (dx, dy) = (n.x - gx, n.y - gy);
			dx * dx + dy * dy <= n.r * n.r
		})
	}

	/// Topmost link whose halo band contains the graph-space point.
	pub fn link_at(&self, gx: f64, gy: f64) -> Option<usize> {
		(0..self.links.len()).rev().find(|&i| {
			let v = &self.links[i];
			if v.degenerate {
				return false;
			}
			let (a, b) = v.halo.centerline();
			point_segment_distance((gx, gy), a, b) <= HALO_HALF_WIDTH
		})
	}
}

fn tip_kind(tip: &TipConfig, id: i64) -> Option<TipKind> {
	if tip.source_id == Some(id) {
		Some(TipKind::Source)
	} else if tip.target_id == Some(id) {
		Some(TipKind::Target)
	} else {
		None
	}
}

fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let (apx, apy) = (p.0 - a.0, p.1 - a.1);
	let len2 = abx * abx + aby * aby;
	if len2 == 0.0 {
		return (apx * apx + apy * apy).sqrt();
	}
	let t = ((apx * abx + apy * aby) / len2).clamp(0.0, 1.0);
	let (cx, cy) = (a.0 + t * abx - p.0, a.1 + t * aby - p.1);
	(cx * cx + cy * cy).sqrt()
}
