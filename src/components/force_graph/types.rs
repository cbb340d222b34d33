use crate::scene::CharacterStats;

/// Normalized node identity key.
pub type NodeId = String;

/// Position of an edge in its graph's edge list.
pub type EdgeId = usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
	#[default]
	Character,
	/// Synthetic node for a participant that is not in the roster.
	Group,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: NodeId,
	pub label: String,
	pub kind: NodeKind,
	pub group: Option<String>,
	pub stats: Option<CharacterStats>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: NodeId,
	pub target: NodeId,
	pub relationship: Option<String>,
	pub description: Option<String>,
	/// Key of the event that produced this edge.
	pub event: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

/// Simulation state for one node. Owned by [`super::Simulation`].
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub node: GraphNode,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub is_fixed: bool,
}

/// An edge plus its slot among the edges sharing its endpoint pair.
#[derive(Clone, Debug, PartialEq)]
pub struct DecoratedEdge {
	pub id: EdgeId,
	pub edge: GraphEdge,
	/// Offset centred on zero; half-integers for even-sized groups.
	pub curve_index: f64,
	pub group_size: usize,
}
