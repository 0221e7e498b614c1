//! Graph Compiler: flatten a document tree into renderable nodes and edges.
//!
//! Ids are assigned in pre-order (a node before its children), so a
//! document with N nodes always compiles to ids `0..N-1` and N-1 edges.
//! Coordinates come from a deterministic horizontal tree layout: leaves get
//! evenly spaced slots on the breadth axis in visit order, an internal node
//! sits at the mean of its children, and depth levels spread across the
//! remaining width. Both `x`/`y` and the `fx`/`fy` pins are set, so fixed
//! mode keeps every node where the compiler put it.

use super::types::{DocNode, GraphData, GraphEdge, GraphNode};

/// Horizontal padding kept free of nodes (depth axis).
const DEPTH_MARGIN: f64 = 200.0;
/// Vertical padding kept free of nodes (breadth axis).
const BREADTH_MARGIN: f64 = 100.0;

struct Flat<'a> {
	doc: &'a DocNode,
	parent: Option<usize>,
	depth: usize,
}

/// Compile `doc` into a flat graph laid out for a `width` x `height`
/// viewport. Pure: same document and viewport always produce the same
/// graph.
pub fn compile(doc: &DocNode, width: f64, height: f64) -> GraphData {
	let flat = flatten(doc);
	let n = flat.len();

	// Breadth slots: leaves first (DFS order), then parents at the mean of
	// their children. Pre-order guarantees children index above parents, so
	// one reverse sweep resolves every internal node.
	let mut breadth = vec![0.0_f64; n];
	let mut child_sum = vec![0.0_f64; n];
	let mut child_count = vec![0usize; n];
	let mut leaves = 0usize;
	for (i, entry) in flat.iter().enumerate() {
		if entry.doc.children.is_empty() {
			breadth[i] = leaves as f64;
			leaves += 1;
		}
	}
	for i in (0..n).rev() {
		if child_count[i] > 0 {
			breadth[i] = child_sum[i] / child_count[i] as f64;
		}
		if let Some(p) = flat[i].parent {
			child_sum[p] += breadth[i];
			child_count[p] += 1;
		}
	}

	let max_depth = flat.iter().map(|e| e.depth).max().unwrap_or(0);
	let breadth_step = if leaves > 1 {
		(height - BREADTH_MARGIN) / (leaves - 1) as f64
	} else {
		0.0
	};
	let depth_step = if max_depth > 0 {
		(width - DEPTH_MARGIN) / max_depth as f64
	} else {
		0.0
	};

	let mut nodes = Vec::with_capacity(n);
	let mut edges = Vec::with_capacity(n.saturating_sub(1));
	for (id, entry) in flat.iter().enumerate() {
		// Rotate depth onto x and breadth onto y for a left-to-right tree,
		// offset so the layout sits around the viewport center.
		let x = entry.depth as f64 * depth_step + width / 2.0;
		let y = breadth[id] * breadth_step + height / 2.0;
		nodes.push(GraphNode {
			id,
			name: entry.doc.name.clone(),
			kind: entry.doc.kind,
			depth: entry.depth,
			x,
			y,
			fx: Some(x),
			fy: Some(y),
			has_children: !entry.doc.children.is_empty(),
		});
		if let Some(parent) = entry.parent {
			edges.push(GraphEdge {
				source: parent,
				target: id,
				label: entry.doc.label.clone(),
				link: entry.doc.link,
			});
		}
	}

	GraphData { nodes, edges }
}

fn flatten(doc: &DocNode) -> Vec<Flat<'_>> {
	let mut flat = Vec::new();
	let mut stack = vec![(doc, None::<usize>, 0usize)];
	while let Some((node, parent, depth)) = stack.pop() {
		let id = flat.len();
		flat.push(Flat {
			doc: node,
			parent,
			depth,
		});
		for child in node.children.iter().rev() {
			stack.push((child, Some(id), depth + 1));
		}
	}
	flat
}
