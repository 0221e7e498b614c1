//! Pure scene construction: (graph, transform, interaction state) in,
//! drawable shape list out. Nothing here touches the DOM, so the geometry
//! the renderer draws is testable on any target.

use super::state::{DiagramState, LayoutMode, Mode, ViewTransform, half_extents};
use super::types::{LinkKind, NodeKind};

/// Stroke palette cycled by node depth.
const DEPTH_STROKES: &[&str] = &["#f8fafc", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b"];
const SELECTED_STROKE: &str = "#2563eb";
/// Vertical lift of an edge label above the edge midpoint.
const LABEL_LIFT: f64 = 20.0;

/// Outline shape of a node, decided by its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeOutline {
	RoundedRect,
	Oval,
	Diamond,
}

/// One edge as a cubic bezier, plus its stroke style.
#[derive(Clone, Debug)]
pub struct EdgeShape {
	pub from: (f64, f64),
	pub c1: (f64, f64),
	pub c2: (f64, f64),
	pub to: (f64, f64),
	pub dashed: bool,
}

/// A non-empty edge label anchored above the edge midpoint.
#[derive(Clone, Debug)]
pub struct LabelShape {
	pub text: String,
	pub at: (f64, f64),
}

/// One node ready to draw: outline, fill/stroke, and its display text
/// (the edit buffer while the node is being renamed).
#[derive(Clone, Debug)]
pub struct NodeShape {
	pub at: (f64, f64),
	pub half: (f64, f64),
	pub outline: NodeOutline,
	pub fill: &'static str,
	pub stroke: &'static str,
	pub stroke_width: f64,
	pub text: String,
	pub editing: bool,
	/// Link handle center, present in force mode.
	pub handle: Option<(f64, f64)>,
}

/// Guide line shown while dragging a new link out of a node.
#[derive(Clone, Debug)]
pub struct GuideLine {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub transform: ViewTransform,
	pub edges: Vec<EdgeShape>,
	pub labels: Vec<LabelShape>,
	pub nodes: Vec<NodeShape>,
	pub guide: Option<GuideLine>,
}

fn fill_for(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Page => "#e0e7ff",
		NodeKind::Action => "#d1fae5",
		NodeKind::Decision => "#fed7aa",
	}
}

fn outline_for(kind: NodeKind) -> NodeOutline {
	match kind {
		NodeKind::Page => NodeOutline::RoundedRect,
		NodeKind::Action => NodeOutline::Oval,
		NodeKind::Decision => NodeOutline::Diamond,
	}
}

/// Build the frame description for the current diagram state.
pub fn build_scene(state: &DiagramState) -> Scene {
	let nodes = &state.graph.nodes;

	let mut edges = Vec::with_capacity(state.graph.edges.len());
	let mut labels = Vec::new();
	for edge in &state.graph.edges {
		let s = &nodes[edge.source];
		let t = &nodes[edge.target];
		let (dx, dy) = (t.x - s.x, t.y - s.y);
		edges.push(EdgeShape {
			from: (s.x, s.y),
			c1: (s.x + dx / 3.0, s.y + dy / 2.0 - 20.0),
			c2: (s.x + 2.0 * dx / 3.0, t.y - dy / 2.0 + 20.0),
			to: (t.x, t.y),
			dashed: edge.link == LinkKind::Related,
		});
		if !edge.label.is_empty() {
			labels.push(LabelShape {
				text: edge.label.clone(),
				at: ((s.x + t.x) / 2.0, s.y.min(t.y) - LABEL_LIFT),
			});
		}
	}

	let show_handles = state.layout == LayoutMode::Force;
	let node_shapes = nodes
		.iter()
		.map(|node| {
			let half = half_extents(node.kind);
			let selected = state.selected.as_deref() == Some(node.name.as_str());
			let editing = matches!(&state.mode, Mode::Editing { id, .. } if *id == node.id);
			let text = match &state.mode {
				Mode::Editing { id, buffer } if *id == node.id => buffer.clone(),
				_ => node.name.clone(),
			};
			NodeShape {
				at: (node.x, node.y),
				half,
				outline: outline_for(node.kind),
				fill: fill_for(node.kind),
				stroke: if selected {
					SELECTED_STROKE
				} else {
					DEPTH_STROKES[node.depth % DEPTH_STROKES.len()]
				},
				stroke_width: if selected { 4.0 } else { 2.0 },
				text,
				editing,
				handle: show_handles.then(|| (node.x + half.0, node.y)),
			}
		})
		.collect();

	let guide = match &state.mode {
		Mode::LinkDragging { source, pointer } => Some(GuideLine {
			from: (nodes[*source].x, nodes[*source].y),
			to: *pointer,
		}),
		_ => None,
	};

	Scene {
		width: state.width,
		height: state.height,
		transform: state.transform.clone(),
		edges,
		labels,
		nodes: node_shapes,
		guide,
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::DocNode;
	use super::*;

	fn state_with(doc: DocNode) -> DiagramState {
		let mut state = DiagramState::new(800.0, 600.0);
		state.set_document(Some(doc));
		state
	}

	fn labeled_doc() -> DocNode {
		let mut related = DocNode::new("Blog", NodeKind::Page);
		related.link = LinkKind::Related;
		let mut labeled = DocNode::new("Checkout", NodeKind::Action);
		labeled.label = "Proceed".into();
		DocNode::new("Home", NodeKind::Page).with_children(vec![related, labeled])
	}

	#[test]
	fn empty_labels_are_not_emitted() {
		let scene = build_scene(&state_with(labeled_doc()));
		assert_eq!(scene.edges.len(), 2);
		assert_eq!(scene.labels.len(), 1);
		assert_eq!(scene.labels[0].text, "Proceed");
	}

	#[test]
	fn related_links_render_dashed() {
		let scene = build_scene(&state_with(labeled_doc()));
		assert!(scene.edges[0].dashed);
		assert!(!scene.edges[1].dashed);
	}

	#[test]
	fn outline_follows_kind() {
		let doc = DocNode::new("P", NodeKind::Page).with_children(vec![
			DocNode::new("A", NodeKind::Action),
			DocNode::new("D", NodeKind::Decision),
		]);
		let scene = build_scene(&state_with(doc));
		let outlines: Vec<_> = scene.nodes.iter().map(|n| n.outline).collect();
		assert_eq!(
			outlines,
			[
				NodeOutline::RoundedRect,
				NodeOutline::Oval,
				NodeOutline::Diamond
			]
		);
	}

	#[test]
	fn selection_changes_stroke() {
		let mut state = state_with(labeled_doc());
		state.selected = Some("Blog".into());
		let scene = build_scene(&state);
		assert_eq!(scene.nodes[1].stroke, SELECTED_STROKE);
		assert_eq!(scene.nodes[1].stroke_width, 4.0);
		assert_eq!(scene.nodes[0].stroke_width, 2.0);
	}

	#[test]
	fn editing_node_shows_its_buffer() {
		let mut state = state_with(labeled_doc());
		let (x, y) = (state.graph.nodes[0].x, state.graph.nodes[0].y);
		state.double_click(x, y);
		state.edit_input("Draft");
		let scene = build_scene(&state);
		assert!(scene.nodes[0].editing);
		assert_eq!(scene.nodes[0].text, "Draft");
		assert_eq!(scene.nodes[1].text, "Blog");
	}

	#[test]
	fn handles_and_guide_only_in_force_mode() {
		let mut state = state_with(labeled_doc());
		assert!(build_scene(&state).nodes[0].handle.is_none());

		state.set_layout(LayoutMode::Force);
		let scene = build_scene(&state);
		assert!(scene.nodes[0].handle.is_some());
		assert!(scene.guide.is_none());

		let (x, y, hw) = {
			let n = &state.graph.nodes[0];
			(n.x, n.y, half_extents(n.kind).0)
		};
		state.pointer_down(x + hw, y);
		state.pointer_move(x + 200.0, y + 40.0);
		let scene = build_scene(&state);
		let guide = scene.guide.expect("guide line while link dragging");
		assert_eq!(guide.from, (x, y));
		assert_eq!(guide.to, (x + 200.0, y + 40.0));
	}

	#[test]
	fn label_sits_above_edge_midpoint() {
		let scene = build_scene(&state_with(labeled_doc()));
		let edge = &scene.edges[1];
		let label = &scene.labels[0];
		assert_eq!(label.at.0, (edge.from.0 + edge.to.0) / 2.0);
		assert_eq!(label.at.1, edge.from.1.min(edge.to.1) - 20.0);
	}
}
