//! Parallel-edge separation.
//!
//! Edges sharing an unordered endpoint pair are given offsets centred on
//! zero; the renderer bows each one sideways by `offset * spacing`.

use indexmap::IndexMap;

use super::types::{DecoratedEdge, GraphEdge};

/// Assign every edge its slot within its endpoint-pair group. Output order
/// matches input order and is identical for identical input.
pub fn bundle_edges(edges: &[GraphEdge]) -> Vec<DecoratedEdge> {
	let mut groups: IndexMap<(&str, &str), Vec<usize>> = IndexMap::new();
	for (i, edge) in edges.iter().enumerate() {
		groups
			.entry(pair_key(&edge.source, &edge.target))
			.or_default()
			.push(i);
	}

	let mut slots = vec![(0.0, 1usize); edges.len()];
	for members in groups.values() {
		let n = members.len();
		let centre = (n as f64 - 1.0) / 2.0;
		for (slot, &i) in members.iter().enumerate() {
			slots[i] = (slot as f64 - centre, n);
		}
	}

	edges
		.iter()
		.zip(slots)
		.enumerate()
		.map(|(id, (edge, (curve_index, group_size)))| DecoratedEdge {
			id,
			edge: edge.clone(),
			curve_index,
			group_size,
		})
		.collect()
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
	if a <= b { (a, b) } else { (b, a) }
}

/// True when `source -> target` runs against the pair's sorted order.
pub fn is_reversed(source: &str, target: &str) -> bool {
	source > target
}

/// A quadratic curve from source to target, bowed through a displaced
/// midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	pub start: (f64, f64),
	pub control: (f64, f64),
	/// The displaced midpoint the curve passes through.
	pub apex: (f64, f64),
	pub end: (f64, f64),
}

impl EdgeCurve {
	/// `reversed` flips the normal so that edges in both directions between
	/// the same pair bow relative to one shared axis.
	pub fn new(
		start: (f64, f64),
		end: (f64, f64),
		offset: f64,
		spacing: f64,
		reversed: bool,
	) -> Self {
		let mid = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
		let (dx, dy) = (end.0 - start.0, end.1 - start.1);
		let len = dx.hypot(dy);
		if len < f64::EPSILON || offset == 0.0 {
			return Self {
				start,
				control: mid,
				apex: mid,
				end,
			};
		}
		let sign = if reversed { -1.0 } else { 1.0 };
		let (nx, ny) = (-dy / len * sign, dx / len * sign);
		let shift = offset * spacing;
		let apex = (mid.0 + nx * shift, mid.1 + ny * shift);
		// a quadratic passes through (start + 2c + end) / 4 at t = 0.5
		let control = (2.0 * apex.0 - mid.0, 2.0 * apex.1 - mid.1);
		Self {
			start,
			control,
			apex,
			end,
		}
	}

	pub fn point_at(&self, t: f64) -> (f64, f64) {
		let u = 1.0 - t;
		let (a, b, c) = (u * u, 2.0 * u * t, t * t);
		(
			a * self.start.0 + b * self.control.0 + c * self.end.0,
			a * self.start.1 + b * self.control.1 + c * self.end.1,
		)
	}

	/// Unit tangent at `t`, falling back to the chord direction.
	pub fn tangent_at(&self, t: f64) -> (f64, f64) {
		let (dx, dy) = (
			2.0 * (1.0 - t) * (self.control.0 - self.start.0)
				+ 2.0 * t * (self.end.0 - self.control.0),
			2.0 * (1.0 - t) * (self.control.1 - self.start.1)
				+ 2.0 * t * (self.end.1 - self.control.1),
		);
		let len = dx.hypot(dy);
		if len < f64::EPSILON {
			return (1.0, 0.0);
		}
		(dx / len, dy / len)
	}

	/// Approximate distance from `p` to the curve by sampling.
	pub fn distance_to(&self, p: (f64, f64), samples: usize) -> f64 {
		let samples = samples.max(2);
		(0..=samples)
			.map(|i| {
				let (x, y) = self.point_at(i as f64 / samples as f64);
				(x - p.0).hypot(y - p.1)
			})
			.fold(f64::INFINITY, f64::min)
	}
}
