//! Force solver assigning node positions each tick.
//!
//! The classic layout trio: a weak spring on every link, pairwise charge
//! repulsion capped at a maximum range, and a barycenter pull toward the
//! viewport center. The energy level is held at its target rather than
//! decayed, so the layout keeps gently adjusting while the user interacts
//! instead of settling once and freezing.

use std::f64::consts::PI;

use super::graph::Topology;

/// Tuning parameters for the solver.
#[derive(Clone, Debug)]
pub struct SimulationParams {
	/// Target separation for linked nodes.
	pub link_distance: f64,
	/// Spring strength. Intentionally weak: the links nudge the layout
	/// rather than constrain it.
	pub link_strength: f64,
	/// Charge strength; negative repels.
	pub charge_strength: f64,
	/// Charge has no effect beyond this distance.
	pub charge_distance_max: f64,
	/// Point the barycenter is pulled toward.
	pub center: (f64, f64),
	/// Fraction of velocity shed each tick.
	pub velocity_decay: f64,
	/// Energy level the solver is held at. Zero would let the layout stop.
	pub alpha_target: f64,
}

impl SimulationParams {
	/// Stock parameters for a `width` x `height` viewport.
	pub fn for_viewport(width: f64, height: f64) -> Self {
		Self {
			link_distance: 100.0,
			link_strength: 0.01,
			charge_strength: -40.0,
			charge_distance_max: height / 2.0,
			center: (width / 2.0, height / 2.0),
			velocity_decay: 0.1,
			alpha_target: 1.0,
		}
	}
}

/// Iterative position solver over the arena.
///
/// `step` applies every force to node velocities, then integrates. Nodes
/// with a pinned axis are snapped to the pin and zero-velocity on that
/// axis, but still push and pull everything else.
#[derive(Clone, Debug)]
pub struct Simulation {
	params: SimulationParams,
	alpha: f64,
	alpha_decay: f64,
	rng: Lcg,
}

const INITIAL_RADIUS: f64 = 10.0;

/// Golden-angle spiral step used for seeding.
fn initial_angle() -> f64 {
	PI * (3.0 - 5.0_f64.sqrt())
}

impl Simulation {
	/// Create a solver with full energy.
	pub fn new(params: SimulationParams) -> Self {
		Self {
			params,
			alpha: 1.0,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			rng: Lcg::new(),
		}
	}

	/// Place nodes on a deterministic spiral around the origin and zero
	/// their velocities. The centering force carries the cloud to the
	/// viewport center on the first tick.
	pub fn seed_positions(&self, topology: &mut Topology) {
		for (i, node) in topology.nodes.iter_mut().enumerate() {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle();
			node.x = radius * angle.cos();
			node.y = radius * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Advance one tick.
	pub fn step(&mut self, topology: &mut Topology) {
		self.alpha += (self.params.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_link_force(topology);
		self.apply_charge_force(topology);
		self.apply_center_force(topology);

		let keep = 1.0 - self.params.velocity_decay;
		for node in &mut topology.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// Spring force on each link, pulling the pair toward the target
	/// separation. Each end moves in proportion to the other end's degree,
	/// so hubs stay put and leaves swing.
	fn apply_link_force(&mut self, topology: &mut Topology) {
		let alpha = self.alpha;
		let distance = self.params.link_distance;
		let strength = self.params.link_strength;

		for li in 0..topology.links.len() {
			let (s, t) = (topology.links[li].source, topology.links[li].target);
			let (sn, tn) = (&topology.nodes[s], &topology.nodes[t]);
			let mut dx = tn.x + tn.vx - sn.x - sn.vx;
			let mut dy = tn.y + tn.vy - sn.y - sn.vy;
			if dx == 0.0 {
				dx = self.rng.jiggle();
			}
			if dy == 0.0 {
				dy = self.rng.jiggle();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let l = (len - distance) / len * alpha * strength;
			let (fx, fy) = (dx * l, dy * l);

			let sd = topology.degree(s) as f64;
			let td = topology.degree(t) as f64;
			let bias = sd / (sd + td);

			let tn = &mut topology.nodes[t];
			tn.vx -= fx * bias;
			tn.vy -= fy * bias;
			let sn = &mut topology.nodes[s];
			sn.vx += fx * (1.0 - bias);
			sn.vy += fy * (1.0 - bias);
		}
	}

	/// Pairwise repulsion, skipped entirely past the cutoff range so
	/// far-apart clusters never perturb each other.
	fn apply_charge_force(&mut self, topology: &mut Topology) {
		let alpha = self.alpha;
		let strength = self.params.charge_strength;
		let max2 = self.params.charge_distance_max * self.params.charge_distance_max;

		let n = topology.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = topology.nodes[j].x - topology.nodes[i].x;
				let mut dy = topology.nodes[j].y - topology.nodes[i].y;
				let mut l = dx * dx + dy * dy;
				if l >= max2 {
					continue;
				}
				if dx == 0.0 {
					dx = self.rng.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = self.rng.jiggle();
					l += dy * dy;
				}
				if l < 1.0 {
					l = l.sqrt();
				}
				let w = strength * alpha / l;
				let a = &mut topology.nodes[i];
				a.vx += dx * w;
				a.vy += dy * w;
				let b = &mut topology.nodes[j];
				b.vx -= dx * w;
				b.vy -= dy * w;
			}
		}
	}

	/// Translate every node so the barycenter lands on the center point.
	fn apply_center_force(&mut self, topology: &mut Topology) {
		let n = topology.nodes.len();
		if n == 0 {
			return;
		}
		let (cx, cy) = self.params.center;
		let (mut sx, mut sy) = (0.0, 0.0);
		for node in &topology.nodes {
			sx += node.x;
			sy += node.y;
		}
		let (dx, dy) = (sx / n as f64 - cx, sy / n as f64 - cy);
		for node in &mut topology.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

/// Small deterministic LCG driving the coincident-node jiggle.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn new() -> Self {
		Self(1)
	}

	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		f64::from(self.0) / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}
