//! Pointer-driven pinning and hover tracking.
//!
//! The controller never touches the DOM. Pointer capture goes through the
//! [`PointerCapture`] port and screen-to-simulation mapping is passed in as a
//! plain function, so drags can be replayed against a headless
//! [`Simulation`].

use std::collections::HashMap;

use super::scale::LinearScale;
use super::simulation::Simulation;
use super::types::{EdgeId, NodeId};

/// Whatever element receives pointer capture during a drag.
pub trait PointerCapture {
	fn capture(&mut self, pointer_id: i32);
	fn release(&mut self, pointer_id: i32);
}

/// Device-space pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
	pub pointer_id: i32,
	pub client_x: f64,
	pub client_y: f64,
}

/// Maps the canvas' current on-screen box onto its fixed logical size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
	x: LinearScale,
	y: LinearScale,
}

impl ScreenTransform {
	pub fn new(
		left: f64,
		top: f64,
		width: f64,
		height: f64,
		logical_width: f64,
		logical_height: f64,
	) -> Self {
		Self {
			x: LinearScale::new((left, left + width), (0.0, logical_width)),
			y: LinearScale::new((top, top + height), (0.0, logical_height)),
		}
	}

	pub fn to_simulation(&self, client_x: f64, client_y: f64) -> (f64, f64) {
		(self.x.scale(client_x), self.y.scale(client_y))
	}

	pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(self.x.invert(x), self.y.invert(y))
	}
}

#[derive(Debug, Default)]
pub struct InteractionController {
	/// Active drags keyed by pointer id.
	drags: HashMap<i32, NodeId>,
	hovered_node: Option<NodeId>,
	hovered_edge: Option<EdgeId>,
}

impl InteractionController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Pin `node_id` under the pointer. Refused when this pointer is already
	/// dragging, the node is held by another pointer, or the node is unknown.
	pub fn begin_drag(
		&mut self,
		sim: &mut Simulation,
		capture: &mut impl PointerCapture,
		node_id: &str,
		input: PointerInput,
		to_sim: impl Fn(f64, f64) -> (f64, f64),
	) -> bool {
		if self.drags.contains_key(&input.pointer_id) || self.dragging(node_id) {
			return false;
		}
		let (x, y) = to_sim(input.client_x, input.client_y);
		if !sim.pin(node_id, x, y) {
			return false;
		}
		capture.capture(input.pointer_id);
		self.drags.insert(input.pointer_id, node_id.to_string());
		true
	}

	/// Follow the pointer. Returns the moved node so the caller can publish
	/// straight away; `None` for pointers that aren't dragging.
	pub fn drag_move(
		&mut self,
		sim: &mut Simulation,
		input: PointerInput,
		to_sim: impl Fn(f64, f64) -> (f64, f64),
	) -> Option<&NodeId> {
		let node_id = self.drags.get(&input.pointer_id)?;
		let (x, y) = to_sim(input.client_x, input.client_y);
		sim.set_position(node_id, x, y);
		Some(node_id)
	}

	/// Release the node held by `pointer_id`. It rejoins the simulation on
	/// the next tick from wherever it was left.
	pub fn end_drag(
		&mut self,
		sim: &mut Simulation,
		capture: &mut impl PointerCapture,
		pointer_id: i32,
	) -> Option<NodeId> {
		let node_id = self.drags.remove(&pointer_id)?;
		sim.unpin(&node_id);
		capture.release(pointer_id);
		Some(node_id)
	}

	/// End every drag, e.g. before the graph is replaced.
	pub fn cancel_all(&mut self, sim: &mut Simulation, capture: &mut impl PointerCapture) {
		let pointers: Vec<i32> = self.drags.keys().copied().collect();
		for pointer_id in pointers {
			self.end_drag(sim, &mut *capture, pointer_id);
		}
	}

	pub fn dragging(&self, node_id: &str) -> bool {
		self.drags.values().any(|n| n == node_id)
	}

	pub fn is_pointer_dragging(&self, pointer_id: i32) -> bool {
		self.drags.contains_key(&pointer_id)
	}

	pub fn active_drags(&self) -> usize {
		self.drags.len()
	}

	pub fn enter_node(&mut self, node_id: &str) {
		self.hovered_node = Some(node_id.to_string());
	}

	/// Clears the hover only if `node_id` is the hovered node.
	pub fn leave_node(&mut self, node_id: &str) {
		if self.hovered_node.as_deref() == Some(node_id) {
			self.hovered_node = None;
		}
	}

	pub fn enter_edge(&mut self, edge: EdgeId) {
		self.hovered_edge = Some(edge);
	}

	pub fn leave_edge(&mut self, edge: EdgeId) {
		if self.hovered_edge == Some(edge) {
			self.hovered_edge = None;
		}
	}

	pub fn hovered_node(&self) -> Option<&str> {
		self.hovered_node.as_deref()
	}

	pub fn hovered_edge(&self) -> Option<EdgeId> {
		self.hovered_edge
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::SimulationConfig;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode, NodeKind};

	#[derive(Default)]
	struct Recorder {
		captured: Vec<i32>,
		released: Vec<i32>,
	}

	impl PointerCapture for Recorder {
		fn capture(&mut self, pointer_id: i32) {
			self.captured.push(pointer_id);
		}
		fn release(&mut self, pointer_id: i32) {
			self.released.push(pointer_id);
		}
	}

	fn sim() -> Simulation {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			kind: NodeKind::Character,
			group: None,
			stats: None,
		};
		let data = GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			edges: vec![GraphEdge {
				source: "a".into(),
				target: "b".into(),
				relationship: None,
				description: None,
				event: "e1".into(),
			}],
		};
		Simulation::new(&data, SimulationConfig::default())
	}

	fn at(pointer_id: i32, x: f64, y: f64) -> PointerInput {
		PointerInput {
			pointer_id,
			client_x: x,
			client_y: y,
		}
	}

	fn identity(x: f64, y: f64) -> (f64, f64) {
		(x, y)
	}

	#[test]
	fn drag_pins_moves_and_releases() {
		let (mut sim, mut cap, mut ctl) = (sim(), Recorder::default(), InteractionController::new());
		assert!(ctl.begin_drag(&mut sim, &mut cap, "a", at(1, 100.0, 120.0), identity));
		let a = sim.node("a").unwrap();
		assert!(a.is_fixed);
		assert_eq!((a.x, a.y), (100.0, 120.0));
		assert_eq!(cap.captured, [1]);

		sim.advance(10);
		assert_eq!(sim.node("a").unwrap().x, 100.0);

		assert_eq!(
			ctl.drag_move(&mut sim, at(1, 200.0, 210.0), identity).map(String::as_str),
			Some("a")
		);
		let a = sim.node("a").unwrap();
		assert_eq!((a.x, a.y, a.vx, a.vy), (200.0, 210.0, 0.0, 0.0));

		assert_eq!(ctl.end_drag(&mut sim, &mut cap, 1).as_deref(), Some("a"));
		assert!(!sim.node("a").unwrap().is_fixed);
		assert_eq!(cap.released, [1]);
		assert_eq!(ctl.active_drags(), 0);
	}

	#[test]
	fn moves_from_other_pointers_are_ignored() {
		let (mut sim, mut cap, mut ctl) = (sim(), Recorder::default(), InteractionController::new());
		ctl.begin_drag(&mut sim, &mut cap, "a", at(1, 100.0, 100.0), identity);
		assert!(ctl.drag_move(&mut sim, at(2, 300.0, 300.0), identity).is_none());
		assert_eq!(sim.node("a").unwrap().x, 100.0);
		assert!(ctl.end_drag(&mut sim, &mut cap, 2).is_none());
	}

	#[test]
	fn two_pointers_drag_two_nodes() {
		let (mut sim, mut cap, mut ctl) = (sim(), Recorder::default(), InteractionController::new());
		assert!(ctl.begin_drag(&mut sim, &mut cap, "a", at(1, 50.0, 50.0), identity));
		assert!(ctl.begin_drag(&mut sim, &mut cap, "b", at(2, 70.0, 70.0), identity));
		// the same node can't be grabbed twice, nor a second node by one pointer
		assert!(!ctl.begin_drag(&mut sim, &mut cap, "a", at(3, 0.0, 0.0), identity));
		assert!(!ctl.begin_drag(&mut sim, &mut cap, "c", at(1, 0.0, 0.0), identity));
		assert_eq!(ctl.active_drags(), 2);
		ctl.cancel_all(&mut sim, &mut cap);
		assert!(sim.nodes().iter().all(|p| !p.is_fixed));
		assert_eq!(cap.released.len(), 2);
	}

	#[test]
	fn unknown_node_is_not_dragged() {
		let (mut sim, mut cap, mut ctl) = (sim(), Recorder::default(), InteractionController::new());
		assert!(!ctl.begin_drag(&mut sim, &mut cap, "zzz", at(1, 0.0, 0.0), identity));
		assert!(cap.captured.is_empty());
	}

	#[test]
	fn transform_accounts_for_css_scaling() {
		// an 800x600 canvas shown at half size, offset by (10, 20)
		let t = ScreenTransform::new(10.0, 20.0, 400.0, 300.0, 800.0, 600.0);
		assert_eq!(t.to_simulation(10.0, 20.0), (0.0, 0.0));
		assert_eq!(t.to_simulation(210.0, 170.0), (400.0, 300.0));
		assert_eq!(t.to_screen(800.0, 600.0), (410.0, 320.0));

		let (mut sim, mut cap, mut ctl) = (sim(), Recorder::default(), InteractionController::new());
		ctl.begin_drag(&mut sim, &mut cap, "c", at(7, 110.0, 95.0), |x, y| t.to_simulation(x, y));
		let c = sim.node("c").unwrap();
		assert_eq!((c.x, c.y), (200.0, 150.0));
	}

	#[test]
	fn hover_tracks_one_node_and_one_edge() {
		let mut ctl = InteractionController::new();
		ctl.enter_node("a");
		ctl.enter_node("b");
		assert_eq!(ctl.hovered_node(), Some("b"));
		ctl.leave_node("a");
		assert_eq!(ctl.hovered_node(), Some("b"));
		ctl.leave_node("b");
		assert_eq!(ctl.hovered_node(), None);

		ctl.enter_edge(3);
		ctl.leave_edge(1);
		assert_eq!(ctl.hovered_edge(), Some(3));
		ctl.leave_edge(3);
		assert_eq!(ctl.hovered_edge(), None);
	}
}
