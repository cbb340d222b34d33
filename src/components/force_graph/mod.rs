//! Live force-directed graph: headless layout core plus its canvas component.

pub mod bundle;
mod component;
pub mod interaction;
mod render;
pub mod scale;
pub mod scheduler;
pub mod simulation;
pub mod state;
mod types;

pub use bundle::{EdgeCurve, bundle_edges};
pub use component::ForceGraphCanvas;
pub use interaction::{InteractionController, PointerCapture, PointerInput, ScreenTransform};
pub use scheduler::{FrameClock, LoopToken, PendingFrame, PublishThrottle, TickLoop};
pub use simulation::{Simulation, SimulationConfig};
pub use state::{ForceGraphState, HoverTarget};
pub use types::{
	DecoratedEdge, EdgeId, GraphData, GraphEdge, GraphNode, NodeId, NodeKind, PositionedNode,
};
