//! Property-based invariants for the graph pipeline.
//!
//! 1. Identifier normalization is idempotent, Unicode input included.
//! 2. Bundling offsets within a pair group are distinct, centred on zero
//!    and symmetric.
//! 3. Every node stays inside the drawable area, whatever the graph.
//! 4. A pinned node does not move while the layout runs.
//! 5. Tick values are ordered, inside their bounds and evenly spaced.

use proptest::prelude::*;
use scene_graph_canvas::components::force_graph::scale::ticks;
use scene_graph_canvas::components::force_graph::{
	GraphData, GraphEdge, GraphNode, NodeKind, Simulation, SimulationConfig, bundle_edges,
};
use scene_graph_canvas::scene::normalize::normalize_id;

// ── Helpers ─────────────────────────────────────────────────────────────

fn graph(n: usize, pairs: &[(usize, usize)]) -> GraphData {
	let nodes = (0..n)
		.map(|i| GraphNode {
			id: format!("n{i}"),
			label: format!("N{i}"),
			kind: NodeKind::Character,
			group: None,
			stats: None,
		})
		.collect();
	let edges = pairs
		.iter()
		.enumerate()
		.map(|(k, &(s, t))| GraphEdge {
			source: format!("n{}", s % n),
			target: format!("n{}", t % n),
			relationship: None,
			description: None,
			event: format!("action_{k}"),
		})
		.collect();
	GraphData { nodes, edges }
}

fn graph_strategy() -> impl Strategy<Value = GraphData> {
	(1usize..8, prop::collection::vec((0usize..8, 0usize..8), 0..16))
		.prop_map(|(n, pairs)| graph(n, &pairs))
}

fn assert_in_bounds(sim: &Simulation) -> Result<(), TestCaseError> {
	let c = sim.config();
	let r = c.node_radius;
	for p in sim.nodes() {
		prop_assert!(p.x.is_finite() && p.y.is_finite(), "{} is not finite", p.node.id);
		prop_assert!(p.x >= r && p.x <= c.width - r, "{} x={} out of bounds", p.node.id, p.x);
		prop_assert!(p.y >= r && p.y <= c.height - r, "{} y={} out of bounds", p.node.id, p.y);
	}
	Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Normalization is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn normalize_idempotent(raw in "[a-zA-ZÀ-ÖØ-öø-ÿßẞİΣσς ()\\t\\u{3000}]{0,30}") {
		let once = normalize_id(&raw);
		prop_assert_eq!(normalize_id(&once), once.clone(), "raw={:?}", raw);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Bundling offsets are centred and symmetric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn bundle_offsets_centred(data in graph_strategy()) {
		let bundled = bundle_edges(&data.edges);
		prop_assert_eq!(bundled.len(), data.edges.len());

		let mut groups: std::collections::BTreeMap<(String, String), Vec<f64>> = Default::default();
		for e in &bundled {
			let (a, b) = (e.edge.source.clone(), e.edge.target.clone());
			let key = if a <= b { (a, b) } else { (b, a) };
			groups.entry(key).or_default().push(e.curve_index);
		}
		for (key, mut offsets) in groups {
			let sum: f64 = offsets.iter().sum();
			prop_assert!(sum.abs() < 1e-9, "{:?} offsets sum to {}", key, sum);
			offsets.sort_by(f64::total_cmp);
			for w in offsets.windows(2) {
				prop_assert!(w[1] - w[0] > 0.5, "{:?} has clashing offsets", key);
			}
			let mirrored: Vec<f64> = offsets.iter().rev().map(|o| -o).collect();
			prop_assert_eq!(offsets, mirrored);
		}
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Positions stay inside the viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn layout_stays_in_bounds(data in graph_strategy(), steps in 0usize..200) {
		let mut sim = Simulation::new(&data, SimulationConfig::default());
		assert_in_bounds(&sim)?;
		sim.advance(steps);
		assert_in_bounds(&sim)?;
	}

	#[test]
	fn out_of_bounds_placement_is_clamped(
		data in graph_strategy(),
		x in -2000.0f64..2000.0,
		y in -2000.0f64..2000.0,
	) {
		let mut sim = Simulation::new(&data, SimulationConfig::default());
		prop_assert!(sim.set_position("n0", x, y));
		assert_in_bounds(&sim)?;
		sim.advance(10);
		assert_in_bounds(&sim)?;
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Pinned nodes hold still
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn pinned_node_holds(
		data in graph_strategy(),
		x in 8.0f64..792.0,
		y in 8.0f64..592.0,
		steps in 1usize..100,
	) {
		let mut sim = Simulation::new(&data, SimulationConfig::default());
		prop_assert!(sim.pin("n0", x, y));
		sim.advance(steps);
		let p = sim.node("n0").unwrap();
		prop_assert_eq!((p.x, p.y), (x, y));
		prop_assert!(p.is_fixed);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Ticks are ordered, bounded and evenly spaced
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn ticks_ordered_and_bounded(lo in -1e4f64..1e4, span in 1e-3f64..1e4, count in 1usize..12) {
		let hi = lo + span;
		let t = ticks(lo, hi, count);
		let slack = (span + lo.abs()) * 1e-9;
		for v in &t {
			prop_assert!(*v >= lo - slack && *v <= hi + slack, "{} outside [{}, {}]", v, lo, hi);
		}
		for w in t.windows(2) {
			prop_assert!(w[1] > w[0]);
		}
		if t.len() > 2 {
			let step = t[1] - t[0];
			for w in t.windows(2) {
				prop_assert!(((w[1] - w[0]) - step).abs() <= step * 1e-6);
			}
		}
	}
}
