//! The diagram engine: document model, graph compiler, layouts,
//! interaction state machine, and the canvas component that hosts them.

mod compile;
mod component;
mod document;
mod render;
mod scene;
mod sim;
mod state;
mod types;

pub use component::{DiagramHandle, IaDiagramCanvas};
pub use document::DiagramError;
pub use state::{DiagramState, LayoutMode, Mode, ViewTransform};
pub use types::{DocNode, GraphData, GraphEdge, GraphNode, LinkKind, NodeKind};
