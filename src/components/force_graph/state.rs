use std::collections::HashSet;

use super::bundle::{EdgeCurve, bundle_edges, is_reversed};
use super::interaction::{InteractionController, PointerCapture, PointerInput, ScreenTransform};
use super::scheduler::{FrameClock, PublishThrottle};
use super::simulation::{Simulation, SimulationConfig};
use super::types::{DecoratedEdge, EdgeId, GraphData, GraphNode, NodeId, PositionedNode};
use crate::scene::CharacterStats;

/// Sideways distance between neighbouring parallel edges.
pub const EDGE_SPACING: f64 = 28.0;
/// Extra slack around a node's drawn radius for picking.
pub const HIT_SLOP: f64 = 4.0;
/// Pointer distance within which an edge counts as hovered.
pub const EDGE_HIT: f64 = 5.0;

/// What the pointer is over, as handed to consuming views.
#[derive(Clone, Debug, PartialEq)]
pub enum HoverTarget {
	Node {
		id: NodeId,
		label: String,
		stats: Option<CharacterStats>,
	},
	Edge {
		relationship: Option<String>,
		description: Option<String>,
		source: String,
		target: String,
	},
}

/// Fade bookkeeping for the neighbourhood highlight. Visual only.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeId>,
	pub neighbors: HashSet<NodeId>,
	pub highlight_t: f64,
	pub prev_node: Option<NodeId>,
	pub prev_neighbors: HashSet<NodeId>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub sim: Simulation,
	pub edges: Vec<DecoratedEdge>,
	pub interaction: InteractionController,
	pub hover: HoverState,
	/// Positions as last handed to the renderer.
	published: Vec<PositionedNode>,
	clock: FrameClock,
	throttle: PublishThrottle,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, config: SimulationConfig) -> Self {
		let sim = Simulation::new(data, config);
		let config = sim.config();
		let clock = FrameClock::new(config.tick_interval_ms, config.max_ticks_per_frame);
		let throttle = PublishThrottle::new(config.publish_interval_ms);
		let published = sim.nodes().to_vec();
		Self {
			sim,
			edges: bundle_edges(&data.edges),
			interaction: InteractionController::new(),
			hover: HoverState::default(),
			published,
			clock,
			throttle,
		}
	}

	pub fn config(&self) -> &SimulationConfig {
		self.sim.config()
	}

	/// Run whatever ticks are owed at `now_ms`. True when a snapshot was
	/// published and the canvas should be redrawn.
	pub fn frame(&mut self, now_ms: f64) -> bool {
		let ticks = self.clock.ticks_due(now_ms);
		self.sim.advance(ticks as usize);
		self.advance_fade(ticks as f64 * self.config().tick_interval_ms / 1000.0);
		if self.throttle.ready(now_ms) {
			self.publish();
			return true;
		}
		false
	}

	/// Copy authoritative positions out for drawing.
	pub fn publish(&mut self) {
		self.published.clear();
		self.published.extend_from_slice(self.sim.nodes());
	}

	pub fn published(&self) -> &[PositionedNode] {
		&self.published
	}

	pub fn published_node(&self, id: &str) -> Option<&PositionedNode> {
		self.sim.index_of(id).and_then(|i| self.published.get(i))
	}

	/// Curve for an edge at published positions; `None` when an endpoint is
	/// missing.
	pub fn curve(&self, edge: &DecoratedEdge) -> Option<EdgeCurve> {
		let s = self.published_node(&edge.edge.source)?;
		let t = self.published_node(&edge.edge.target)?;
		Some(EdgeCurve::new(
			(s.x, s.y),
			(t.x, t.y),
			edge.curve_index,
			EDGE_SPACING,
			is_reversed(&edge.edge.source, &edge.edge.target),
		))
	}

	/// Topmost node within picking distance of a simulation-space point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&PositionedNode> {
		let reach = self.config().node_radius + HIT_SLOP;
		self.published
			.iter()
			.rev()
			.find(|p| (p.x - x).hypot(p.y - y) < reach)
	}

	pub fn edge_at(&self, x: f64, y: f64) -> Option<EdgeId> {
		self.edges
			.iter()
			.filter_map(|e| Some((e.id, self.curve(e)?.distance_to((x, y), 24))))
			.filter(|&(_, d)| d < EDGE_HIT)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	/// Start dragging whatever node is under the pointer.
	pub fn pointer_down(
		&mut self,
		capture: &mut impl PointerCapture,
		input: PointerInput,
		transform: &ScreenTransform,
		now_ms: f64,
	) -> bool {
		let (x, y) = transform.to_simulation(input.client_x, input.client_y);
		let Some(id) = self.node_at(x, y).map(|p| p.node.id.clone()) else {
			return false;
		};
		let to_sim = |cx, cy| transform.to_simulation(cx, cy);
		if !self.interaction.begin_drag(&mut self.sim, capture, &id, input, to_sim) {
			return false;
		}
		self.publish_now(now_ms);
		true
	}

	/// Drag or hover. True when the canvas should be redrawn immediately.
	pub fn pointer_move(
		&mut self,
		input: PointerInput,
		transform: &ScreenTransform,
		now_ms: f64,
	) -> bool {
		let to_sim = |cx, cy| transform.to_simulation(cx, cy);
		if self.interaction.drag_move(&mut self.sim, input, to_sim).is_some() {
			self.publish_now(now_ms);
			return true;
		}
		let (x, y) = transform.to_simulation(input.client_x, input.client_y);
		let node = self.node_at(x, y).map(|p| p.node.id.clone());
		let edge = if node.is_none() { self.edge_at(x, y) } else { None };
		self.set_hover(node.as_deref(), edge)
	}

	pub fn pointer_up(&mut self, capture: &mut impl PointerCapture, pointer_id: i32) -> bool {
		self.interaction
			.end_drag(&mut self.sim, capture, pointer_id)
			.is_some()
	}

	/// The pointer left the canvas: drop its drag and any hover.
	pub fn pointer_leave(&mut self, capture: &mut impl PointerCapture, pointer_id: i32) -> bool {
		let ended = self.pointer_up(capture, pointer_id);
		self.set_hover(None, None) || ended
	}

	fn publish_now(&mut self, now_ms: f64) {
		self.throttle.force(now_ms);
		self.publish();
	}

	/// Move hover to `node` / `edge`. True when anything changed.
	pub fn set_hover(&mut self, node: Option<&str>, edge: Option<EdgeId>) -> bool {
		let before = (
			self.interaction.hovered_node().map(str::to_string),
			self.interaction.hovered_edge(),
		);
		if let Some(old) = before.0.as_deref().filter(|old| Some(*old) != node) {
			self.interaction.leave_node(old);
		}
		if let Some(id) = node {
			self.interaction.enter_node(id);
		}
		if let Some(old) = before.1.filter(|old| Some(*old) != edge) {
			self.interaction.leave_edge(old);
		}
		if let Some(id) = edge {
			self.interaction.enter_edge(id);
		}
		let changed = before.0.as_deref() != node || before.1 != edge;
		if changed {
			self.start_fade(node.map(str::to_string));
		}
		changed
	}

	pub fn hover_target(&self) -> Option<HoverTarget> {
		if let Some(id) = self.interaction.hovered_node() {
			let p = self.sim.node(id)?;
			return Some(HoverTarget::Node {
				id: p.node.id.clone(),
				label: p.node.label.clone(),
				stats: p.node.stats.clone(),
			});
		}
		let edge = self.edges.get(self.interaction.hovered_edge()?)?;
		let label = |id: &str| -> String {
			self.sim
				.node(id)
				.map(|p| p.node.label.clone())
				.unwrap_or_else(|| id.to_string())
		};
		Some(HoverTarget::Edge {
			relationship: edge.edge.relationship.clone(),
			description: edge.edge.description.clone(),
			source: label(&edge.edge.source),
			target: label(&edge.edge.target),
		})
	}

	pub fn node_data(&self, id: &str) -> Option<&GraphNode> {
		self.sim.node(id).map(|p| &p.node)
	}

	fn start_fade(&mut self, node: Option<NodeId>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old neighbourhood around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.neighbors.clear();
		if let Some(id) = &node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for e in &self.edges {
				if &e.edge.source == id {
					self.hover.neighbors.insert(e.edge.target.clone());
				} else if &e.edge.target == id {
					self.hover.neighbors.insert(e.edge.source.clone());
				}
			}
		}
		self.hover.node = node;
	}

	fn advance_fade(&mut self, dt: f64) {
		if dt <= 0.0 {
			return;
		}
		if self.hover.node.is_some() {
			let delay = 0.08;
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (1.0 - self.hover.highlight_t) * (1.8 * dt).min(1.0);
			}
		} else {
			self.hover.highlight_t -= self.hover.highlight_t * (1.26 * dt).min(1.0);
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id)
			|| self.hover.neighbors.contains(id)
			|| self.hover.prev_node.as_deref() == Some(id)
			|| self.hover.prev_neighbors.contains(id)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id) || self.hover.prev_node.as_deref() == Some(id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}
}
