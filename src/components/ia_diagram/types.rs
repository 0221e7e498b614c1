use serde::{Deserialize, Serialize};

/// Category of a node in the information architecture, which decides its
/// rendered shape (rounded rectangle, oval, diamond).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Page,
	#[default]
	Action,
	Decision,
}

/// How an edge relates a child to its parent; affects stroke style only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
	#[default]
	Direct,
	Related,
}

/// A node in the authored document tree. Absent fields take defaults when
/// deserializing, so a minimal node is just `{"name": "..."}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	/// Annotation on the edge from this node's parent; empty means unlabeled.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub label: String,
	#[serde(rename = "linkType", default)]
	pub link: LinkKind,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<DocNode>,
}

impl DocNode {
	/// A leaf node with the given name and kind.
	pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			name: name.into(),
			kind,
			..Self::default()
		}
	}

	/// Builder-style children attachment, used by tests and sample data.
	pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
		self.children = children;
		self
	}
}

/// A compiled, renderable node. Positions are in model space; `fx`/`fy`
/// are the pinned position and, when set, the layout engine must not move
/// the node on that axis.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: usize,
	pub name: String,
	pub kind: NodeKind,
	pub depth: usize,
	pub x: f64,
	pub y: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	pub has_children: bool,
}

/// A compiled edge. Endpoints are indices into [`GraphData::nodes`], which
/// keeps the graph an arena of plain values instead of a self-referential
/// structure.
#[derive(Clone, Debug)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
	/// Empty label means the edge renders without text.
	pub label: String,
	pub link: LinkKind,
}

/// The flat node/edge lists the renderer and interaction layer work on.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}
