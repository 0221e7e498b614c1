//! Force-directed layout: a cooperative physics simulation.
//!
//! One [`ForceSim::tick`] is one discrete simulation step, meant to run
//! once per animation frame; the sim never loops to convergence inside a
//! tick. Four forces act each step: pairwise charge repulsion, spring
//! attraction along edges toward a rest length, a weak pull toward the
//! viewport center, and a positional pass enforcing a minimum separation
//! between nodes. The simulation cools by decaying `alpha` toward a
//! threshold; a drag calls [`ForceSim::reheat`] and it decays again.
//! Nodes with `fx`/`fy` set are pinned and never moved.

use super::types::{GraphData, GraphNode};

/// Charge (repulsion) strength; negative pushes nodes apart.
pub const CHARGE_STRENGTH: f64 = -200.0;
/// Spring rest length for edges.
pub const LINK_DISTANCE: f64 = 150.0;
/// Spring stiffness.
pub const LINK_STRENGTH: f64 = 0.5;
/// Pull toward the viewport center, per axis.
pub const CENTER_STRENGTH: f64 = 0.1;
/// Minimum separation between node centers.
pub const COLLIDE_RADIUS: f64 = 80.0;

const ALPHA_MIN: f64 = 0.001;
const ALPHA_DECAY: f64 = 0.0228;
const ALPHA_REHEAT: f64 = 0.3;
/// Fraction of velocity retained each step (d3's velocityDecay = 0.4).
const VELOCITY_RETAIN: f64 = 0.6;
/// Floor on pair distances to avoid dividing by zero.
const MIN_DIST: f64 = 1.0;

/// Continuous simulation state kept across ticks. Positions live on the
/// graph itself; the sim owns velocities and the cooling schedule.
pub struct ForceSim {
	alpha: f64,
	center_x: f64,
	center_y: f64,
	vel: Vec<(f64, f64)>,
}

impl ForceSim {
	pub fn new(center_x: f64, center_y: f64) -> Self {
		Self {
			alpha: 1.0,
			center_x,
			center_y,
			vel: Vec::new(),
		}
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center_x = x;
		self.center_y = y;
	}

	/// True once energy has decayed below the threshold; ticks are then
	/// no-ops until [`ForceSim::reheat`].
	pub fn cooled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	/// Bump the energy back up after a perturbation (drag, new edge).
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(ALPHA_REHEAT);
	}

	/// Advance the simulation one step. Returns false when cooled.
	pub fn tick(&mut self, graph: &mut GraphData) -> bool {
		if self.cooled() || graph.nodes.is_empty() {
			return false;
		}
		self.vel.resize(graph.nodes.len(), (0.0, 0.0));
		self.alpha -= self.alpha * ALPHA_DECAY;

		self.apply_charge(graph);
		self.apply_springs(graph);
		self.apply_centering(graph);
		self.integrate(graph);
		self.resolve_collisions(graph);
		true
	}

	fn apply_charge(&mut self, graph: &GraphData) {
		let nodes = &graph.nodes;
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let dx = nodes[j].x - nodes[i].x;
				let dy = nodes[j].y - nodes[i].y;
				let d2 = (dx * dx + dy * dy).max(MIN_DIST);
				// Magnitude |strength| * alpha / distance, along the pair axis.
				let w = CHARGE_STRENGTH * self.alpha / d2;
				self.vel[i].0 += dx * w;
				self.vel[i].1 += dy * w;
				self.vel[j].0 -= dx * w;
				self.vel[j].1 -= dy * w;
			}
		}
	}

	fn apply_springs(&mut self, graph: &GraphData) {
		for edge in &graph.edges {
			let (s, t) = (edge.source, edge.target);
			let dx = graph.nodes[t].x - graph.nodes[s].x;
			let dy = graph.nodes[t].y - graph.nodes[s].y;
			let d = (dx * dx + dy * dy).sqrt().max(MIN_DIST);
			let k = (d - LINK_DISTANCE) / d * LINK_STRENGTH * self.alpha;
			self.vel[t].0 -= dx * k * 0.5;
			self.vel[t].1 -= dy * k * 0.5;
			self.vel[s].0 += dx * k * 0.5;
			self.vel[s].1 += dy * k * 0.5;
		}
	}

	fn apply_centering(&mut self, graph: &GraphData) {
		for (node, vel) in graph.nodes.iter().zip(&mut self.vel) {
			vel.0 += (self.center_x - node.x) * CENTER_STRENGTH * self.alpha;
			vel.1 += (self.center_y - node.y) * CENTER_STRENGTH * self.alpha;
		}
	}

	fn integrate(&mut self, graph: &mut GraphData) {
		for (node, vel) in graph.nodes.iter_mut().zip(&mut self.vel) {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					vel.0 = 0.0;
				}
				None => {
					vel.0 *= VELOCITY_RETAIN;
					node.x += vel.0;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					vel.1 = 0.0;
				}
				None => {
					vel.1 *= VELOCITY_RETAIN;
					node.y += vel.1;
				}
			}
		}
	}

	fn resolve_collisions(&mut self, graph: &mut GraphData) {
		let n = graph.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = graph.nodes[j].x - graph.nodes[i].x;
				let dy = graph.nodes[j].y - graph.nodes[i].y;
				let d = (dx * dx + dy * dy).sqrt();
				if d >= COLLIDE_RADIUS {
					continue;
				}
				// Degenerate overlap: separate along x.
				let (ux, uy) = if d < MIN_DIST {
					(1.0, 0.0)
				} else {
					(dx / d, dy / d)
				};
				let overlap = COLLIDE_RADIUS - d.max(MIN_DIST);
				let i_fixed = graph.nodes[i].fx.is_some() && graph.nodes[i].fy.is_some();
				let j_fixed = graph.nodes[j].fx.is_some() && graph.nodes[j].fy.is_some();
				let (i_share, j_share) = match (i_fixed, j_fixed) {
					(true, true) => continue,
					(true, false) => (0.0, overlap),
					(false, true) => (overlap, 0.0),
					(false, false) => (overlap / 2.0, overlap / 2.0),
				};
				nudge(&mut graph.nodes[i], -ux * i_share, -uy * i_share);
				nudge(&mut graph.nodes[j], ux * j_share, uy * j_share);
			}
		}
	}
}

// Pins are per-axis; a node pinned on one axis still yields on the other.
fn nudge(node: &mut GraphNode, dx: f64, dy: f64) {
	if node.fx.is_none() {
		node.x += dx;
	}
	if node.fy.is_none() {
		node.y += dy;
	}
}
