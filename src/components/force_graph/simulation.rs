//! Force-directed relaxation over a fixed logical viewport.
//!
//! A [`Simulation`] owns every node's position and velocity. Each [`tick`]
//! runs four phases in order: pairwise repulsion, edge springs, centering,
//! then damping and integration. Pinned nodes sit out every phase; their
//! position belongs to whoever pinned them.
//!
//! [`tick`]: Simulation::tick

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info, warn};
use serde::Deserialize;

use super::types::{GraphData, PositionedNode};

/// Tunables for the layout. Every field has a default, so partial overrides
/// deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Logical viewport width.
	pub width: f64,
	/// Logical viewport height.
	pub height: f64,
	/// Drawn radius; positions stay at least this far from the edges.
	pub node_radius: f64,
	/// Inverse-square repulsion numerator.
	pub repulsion: f64,
	/// Hooke constant for edge springs.
	pub spring_constant: f64,
	/// Length at which a spring exerts no force.
	pub rest_distance: f64,
	/// Pull toward the viewport centre, per unit of displacement.
	pub centering: f64,
	/// Velocity multiplier applied every tick.
	pub damping: f64,
	/// Added to squared distances before dividing.
	pub epsilon: f64,
	/// Seed circle radius as a fraction of the smaller half-dimension.
	pub seed_radius_fraction: f64,
	/// Length of one authoritative tick.
	pub tick_interval_ms: f64,
	/// Minimum time between published snapshots.
	pub publish_interval_ms: f64,
	/// Cap on ticks run to catch up after a slow frame.
	pub max_ticks_per_frame: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			node_radius: 8.0,
			repulsion: 1500.0,
			spring_constant: 0.05,
			rest_distance: 120.0,
			centering: 0.002,
			damping: 0.85,
			epsilon: 0.01,
			seed_radius_fraction: 0.35,
			tick_interval_ms: 16.0,
			publish_interval_ms: 50.0,
			max_ticks_per_frame: 4,
		}
	}
}

/// Smallest softening term the repulsion phase will accept.
pub const MIN_EPSILON: f64 = 1e-6;

impl SimulationConfig {
	/// Replace values that would break the integrator with workable ones.
	/// Overrides come straight from story data, so nothing here is trusted.
	pub fn sanitized(self) -> Self {
		let d = Self::default();
		let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
		let positive_or = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };

		let width = positive_or(self.width, d.width);
		let height = positive_or(self.height, d.height);
		Self {
			width,
			height,
			node_radius: finite_or(self.node_radius, d.node_radius).clamp(0.0, width.min(height) / 2.0),
			repulsion: finite_or(self.repulsion, d.repulsion),
			spring_constant: finite_or(self.spring_constant, d.spring_constant),
			rest_distance: finite_or(self.rest_distance, d.rest_distance).max(0.0),
			centering: finite_or(self.centering, d.centering),
			damping: finite_or(self.damping, d.damping).clamp(0.0, 0.99),
			epsilon: finite_or(self.epsilon, d.epsilon).max(MIN_EPSILON),
			seed_radius_fraction: finite_or(self.seed_radius_fraction, d.seed_radius_fraction).max(0.0),
			tick_interval_ms: positive_or(self.tick_interval_ms, d.tick_interval_ms),
			publish_interval_ms: finite_or(self.publish_interval_ms, d.publish_interval_ms).max(0.0),
			max_ticks_per_frame: self.max_ticks_per_frame.max(1),
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Clamp a point into the drawable area.
	pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		let r = self.node_radius;
		(
			x.clamp(r, (self.width - r).max(r)),
			y.clamp(r, (self.height - r).max(r)),
		)
	}
}

pub struct Simulation {
	config: SimulationConfig,
	nodes: Vec<PositionedNode>,
	links: Vec<(usize, usize)>,
	index: HashMap<String, usize>,
}

impl Simulation {
	/// Config values are passed through [`SimulationConfig::sanitized`].
	pub fn new(data: &GraphData, config: SimulationConfig) -> Self {
		let requested = config;
		let config = requested.clone().sanitized();
		if config != requested {
			warn!("layout settings adjusted to safe values: {config:?}");
		}
		let nodes = data
			.nodes
			.iter()
			.map(|node| PositionedNode {
				node: node.clone(),
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				is_fixed: false,
			})
			.collect::<Vec<_>>();
		let index: HashMap<String, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.node.id.clone(), i))
			.collect();

		let mut links = Vec::with_capacity(data.edges.len());
		let mut skipped = 0usize;
		for edge in &data.edges {
			match (index.get(&edge.source), index.get(&edge.target)) {
				(Some(&s), Some(&t)) if s != t => links.push((s, t)),
				_ => skipped += 1,
			}
		}
		if skipped > 0 {
			debug!("skipped {skipped} edges with unresolvable or identical endpoints");
		}

		let mut sim = Self {
			config,
			nodes,
			links,
			index,
		};
		sim.reseed();
		sim
	}

	/// Put every node back on the seed circle, at rest and unpinned.
	pub fn reseed(&mut self) {
		let (cx, cy) = self.config.center();
		let radius = cx.min(cy) * self.config.seed_radius_fraction;
		let n = self.nodes.len().max(1) as f64;
		for (i, p) in self.nodes.iter_mut().enumerate() {
			let angle = i as f64 * 2.0 * PI / n;
			(p.x, p.y) = (cx + radius * angle.cos(), cy + radius * angle.sin());
			(p.vx, p.vy) = (0.0, 0.0);
			p.is_fixed = false;
		}
		info!("seeded layout with {} nodes", self.nodes.len());
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn nodes(&self) -> &[PositionedNode] {
		&self.nodes
	}

	/// Resolved edges as node indices, self-pairs and dangling edges removed.
	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node(&self, id: &str) -> Option<&PositionedNode> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Run `n` ticks back to back.
	pub fn advance(&mut self, n: usize) {
		for _ in 0..n {
			self.tick();
		}
	}

	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.apply_repulsion();
		self.apply_springs();
		self.apply_centering();
		self.integrate();
	}

	fn apply_repulsion(&mut self) {
		let (strength, eps) = (self.config.repulsion, self.config.epsilon);
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				if a.is_fixed && b.is_fixed {
					continue;
				}
				let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
				if dx * dx + dy * dy <= eps {
					// coincident: split along a direction fixed by the pair
					let angle = (i * 31 + j * 17) as f64;
					(dx, dy) = (angle.cos() * eps.sqrt(), angle.sin() * eps.sqrt());
				}
				let dist_sq = dx * dx + dy * dy + eps;
				let dist = dist_sq.sqrt();
				let force = strength / dist_sq;
				let (fx, fy) = (dx / dist * force, dy / dist * force);
				self.push(i, -fx, -fy);
				self.push(j, fx, fy);
			}
		}
	}

	fn apply_springs(&mut self) {
		let (k, rest) = (self.config.spring_constant, self.config.rest_distance);
		for li in 0..self.links.len() {
			let (s, t) = self.links[li];
			let (a, b) = (&self.nodes[s], &self.nodes[t]);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < f64::EPSILON {
				continue;
			}
			let force = k * (dist - rest);
			let (fx, fy) = (dx / dist * force, dy / dist * force);
			self.push(s, fx, fy);
			self.push(t, -fx, -fy);
		}
	}

	fn apply_centering(&mut self) {
		let (cx, cy) = self.config.center();
		let c = self.config.centering;
		for p in self.nodes.iter_mut().filter(|p| !p.is_fixed) {
			p.vx += (cx - p.x) * c;
			p.vy += (cy - p.y) * c;
		}
	}

	fn integrate(&mut self) {
		let damping = self.config.damping;
		for p in self.nodes.iter_mut().filter(|p| !p.is_fixed) {
			p.vx *= damping;
			p.vy *= damping;
			(p.x, p.y) = self.config.clamp(p.x + p.vx, p.y + p.vy);
		}
	}

	fn push(&mut self, i: usize, fx: f64, fy: f64) {
		let p = &mut self.nodes[i];
		if !p.is_fixed {
			p.vx += fx;
			p.vy += fy;
		}
	}

	/// Hold a node at `(x, y)` until [`unpin`](Self::unpin).
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(i) = self.index_of(id) else {
			return false;
		};
		self.nodes[i].is_fixed = true;
		self.place(i, x, y);
		true
	}

	pub fn unpin(&mut self, id: &str) -> bool {
		let Some(i) = self.index_of(id) else {
			return false;
		};
		self.nodes[i].is_fixed = false;
		true
	}

	/// Move a node directly, discarding its velocity.
	pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(i) = self.index_of(id) else {
			return false;
		};
		self.place(i, x, y);
		true
	}

	fn place(&mut self, i: usize, x: f64, y: f64) {
		let (x, y) = self.config.clamp(x, y);
		let p = &mut self.nodes[i];
		(p.x, p.y, p.vx, p.vy) = (x, y, 0.0, 0.0);
	}
}
