//! Interaction state machine and viewport controller.
//!
//! All pointer/keyboard handling is pure state mutation over
//! [`DiagramState`]; nothing in here can fail — invalid targets (a drag
//! released over empty canvas, a link dropped nowhere) are silently
//! ignored. Pointer coordinates arrive in screen space and are converted
//! through the inverse view transform before hit testing.

use log::{debug, info};

use super::compile::compile;
use super::document::{self, Result};
use super::sim::ForceSim;
use super::types::{DocNode, GraphData, GraphEdge, LinkKind, NodeKind};

/// Zoom clamp range.
pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 4.0;
/// Grid pitch for snap-to-grid dragging.
pub const GRID_STEP: f64 = 20.0;
/// A released link drag connects if the pointer is within this distance of
/// a node center.
pub const LINK_TARGET_RADIUS: f64 = 60.0;
/// Hit radius of the small link handle on a node's right edge.
const LINK_HANDLE_RADIUS: f64 = 10.0;
const ZOOM_STEP_IN: f64 = 1.2;
const ZOOM_STEP_OUT: f64 = 0.8;
const WHEEL_STEP_IN: f64 = 1.1;
const WHEEL_STEP_OUT: f64 = 0.9;
const FIT_SCALE: f64 = 0.85;

/// Half extents of a node's outline by kind (page 180x50, action 160x50,
/// decision 140x50).
pub fn half_extents(kind: NodeKind) -> (f64, f64) {
	match kind {
		NodeKind::Page => (90.0, 25.0),
		NodeKind::Action => (80.0, 25.0),
		NodeKind::Decision => (70.0, 25.0),
	}
}

/// Scale/translate pair mapping model space to screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Identity transform (scale 1, no translation).
	pub fn identity() -> Self {
		Self::default()
	}
}

#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Which layout strategy currently owns node positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	/// Deterministic tree layout; every node pinned where the compiler put it.
	#[default]
	Fixed,
	/// Continuous force simulation; only dragged nodes are pinned.
	Force,
}

/// The active gesture/editing state. Selection is tracked separately (by
/// name) because it survives entering and leaving an edit.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
	#[default]
	Idle,
	/// Inline rename in progress; at most one node is editable at a time.
	Editing { id: usize, buffer: String },
	NodeDragging { id: usize, grab_dx: f64, grab_dy: f64 },
	/// Force mode only: a new edge being dragged out of `source`.
	LinkDragging { source: usize, pointer: (f64, f64) },
}

/// Everything the diagram engine owns for one session: the document, its
/// compiled graph, the interaction mode, and the view transform.
pub struct DiagramState {
	pub doc: Option<DocNode>,
	pub graph: GraphData,
	pub mode: Mode,
	/// Selected node, tracked by display name.
	pub selected: Option<String>,
	pub transform: ViewTransform,
	pub snap_to_grid: bool,
	pub layout: LayoutMode,
	pub width: f64,
	pub height: f64,
	pan: PanState,
	sim: ForceSim,
}

impl DiagramState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			doc: None,
			graph: GraphData::default(),
			mode: Mode::Idle,
			selected: None,
			transform: ViewTransform::identity(),
			snap_to_grid: false,
			layout: LayoutMode::Fixed,
			width,
			height,
			pan: PanState::default(),
			sim: ForceSim::new(width / 2.0, height / 2.0),
		}
	}

	/// Replace the document wholesale and recompile the graph. Interaction
	/// state is reset; the view transform is kept.
	pub fn set_document(&mut self, doc: Option<DocNode>) {
		self.doc = doc;
		self.mode = Mode::Idle;
		self.selected = None;
		self.recompile();
	}

	/// Parse and load an uploaded JSON document. On failure the diagram is
	/// left in its last valid state and the error is surfaced to the caller.
	pub fn load_json(&mut self, text: &str) -> Result<()> {
		let doc = DocNode::from_json(text)?;
		info!("loaded document {:?}", doc.name);
		self.set_document(Some(doc));
		Ok(())
	}

	fn recompile(&mut self) {
		self.graph = match &self.doc {
			Some(doc) => compile(doc, self.width, self.height),
			None => GraphData::default(),
		};
		if self.layout == LayoutMode::Force {
			self.unpin_all();
			self.sim.reheat();
		}
	}

	fn unpin_all(&mut self) {
		for node in &mut self.graph.nodes {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Switch layout strategies. Entering force mode releases the compile
	/// pins and heats the simulation; returning to fixed mode recompiles
	/// the tree layout.
	pub fn set_layout(&mut self, layout: LayoutMode) {
		if self.layout == layout {
			return;
		}
		self.layout = layout;
		match layout {
			LayoutMode::Fixed => self.recompile(),
			LayoutMode::Force => {
				self.unpin_all();
				self.sim.reheat();
			}
		}
		debug!("layout mode now {layout:?}");
	}

	/// One animation-frame step: advances the force simulation when it is
	/// the active strategy. Returns true if anything may have moved.
	pub fn tick(&mut self) -> bool {
		match self.layout {
			LayoutMode::Force => self.sim.tick(&mut self.graph),
			LayoutMode::Fixed => false,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(width / 2.0, height / 2.0);
		if self.layout == LayoutMode::Fixed {
			self.recompile();
		}
	}

	// --- viewport -----------------------------------------------------

	/// Inverse of the view transform: screen pixels to model space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	fn zoom_anchored(&mut self, factor: f64, ax: f64, ay: f64) {
		let k = (self.transform.k * factor).clamp(SCALE_MIN, SCALE_MAX);
		let ratio = k / self.transform.k;
		self.transform.x = ax - (ax - self.transform.x) * ratio;
		self.transform.y = ay - (ay - self.transform.y) * ratio;
		self.transform.k = k;
	}

	/// Step zoom in (x1.2), anchored at the view center.
	pub fn zoom_in(&mut self) {
		self.zoom_anchored(ZOOM_STEP_IN, self.width / 2.0, self.height / 2.0);
	}

	/// Step zoom out (x0.8), anchored at the view center.
	pub fn zoom_out(&mut self) {
		self.zoom_anchored(ZOOM_STEP_OUT, self.width / 2.0, self.height / 2.0);
	}

	/// Wheel zoom anchored at the cursor.
	pub fn wheel_zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_STEP_OUT
		} else {
			WHEEL_STEP_IN
		};
		self.zoom_anchored(factor, sx, sy);
	}

	/// Scale to a fixed 0.85 and translate so the content bounding box
	/// center maps to the viewport center.
	pub fn fit_to_content(&mut self) {
		if self.graph.nodes.is_empty() {
			return;
		}
		let mut min_x = f64::INFINITY;
		let mut min_y = f64::INFINITY;
		let mut max_x = f64::NEG_INFINITY;
		let mut max_y = f64::NEG_INFINITY;
		for node in &self.graph.nodes {
			let (hw, hh) = half_extents(node.kind);
			min_x = min_x.min(node.x - hw);
			max_x = max_x.max(node.x + hw);
			min_y = min_y.min(node.y - hh);
			max_y = max_y.max(node.y + hh);
		}
		let mid_x = (min_x + max_x) / 2.0;
		let mid_y = (min_y + max_y) / 2.0;
		self.transform = ViewTransform {
			k: FIT_SCALE,
			x: self.width / 2.0 - FIT_SCALE * mid_x,
			y: self.height / 2.0 - FIT_SCALE * mid_y,
		};
	}

	/// Back to the identity transform.
	pub fn reset_view(&mut self) {
		self.transform = ViewTransform::identity();
	}

	// --- hit testing --------------------------------------------------

	/// Topmost node whose outline box contains the model-space point.
	pub fn node_at(&self, gx: f64, gy: f64) -> Option<usize> {
		self.graph.nodes.iter().rev().find_map(|node| {
			let (hw, hh) = half_extents(node.kind);
			((gx - node.x).abs() <= hw && (gy - node.y).abs() <= hh).then_some(node.id)
		})
	}

	/// Link handle under the model-space point, if any (force mode only).
	fn link_handle_at(&self, gx: f64, gy: f64) -> Option<usize> {
		if self.layout != LayoutMode::Force {
			return None;
		}
		self.graph.nodes.iter().rev().find_map(|node| {
			let (hw, _) = half_extents(node.kind);
			let (dx, dy) = (gx - (node.x + hw), gy - node.y);
			(dx.hypot(dy) <= LINK_HANDLE_RADIUS).then_some(node.id)
		})
	}

	/// Nearest node within `radius` of the point, ignoring `exclude`.
	fn node_within(&self, gx: f64, gy: f64, radius: f64, exclude: usize) -> Option<usize> {
		self.graph
			.nodes
			.iter()
			.filter(|node| node.id != exclude)
			.map(|node| (node.id, (gx - node.x).hypot(gy - node.y)))
			.filter(|&(_, d)| d <= radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	// --- pointer gestures ---------------------------------------------

	/// Pointer pressed at screen coordinates. Starts a link drag (from a
	/// handle), a node drag, or a background pan; clicking anywhere first
	/// commits an active edit.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.commit_edit();

		if let Some(source) = self.link_handle_at(gx, gy) {
			self.mode = Mode::LinkDragging {
				source,
				pointer: (gx, gy),
			};
			return;
		}
		if let Some(id) = self.node_at(gx, gy) {
			self.selected = Some(self.graph.nodes[id].name.clone());
			self.mode = Mode::NodeDragging {
				id,
				grab_dx: self.graph.nodes[id].x - gx,
				grab_dy: self.graph.nodes[id].y - gy,
			};
			return;
		}
		self.selected = None;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Pointer moved. Advances whichever gesture is active.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		match &mut self.mode {
			Mode::NodeDragging { id, grab_dx, grab_dy } => {
				let id = *id;
				let (raw_x, raw_y) = (gx + *grab_dx, gy + *grab_dy);
				let (x, y) = if self.snap_to_grid {
					(snap(raw_x), snap(raw_y))
				} else {
					(raw_x, raw_y)
				};
				let node = &mut self.graph.nodes[id];
				node.x = x;
				node.y = y;
				// Dragging pins the node; the pin stays after release.
				node.fx = Some(x);
				node.fy = Some(y);
				if self.layout == LayoutMode::Force {
					self.sim.reheat();
				}
			}
			Mode::LinkDragging { pointer, .. } => {
				*pointer = (gx, gy);
			}
			_ => {
				if self.pan.active {
					self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
					self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
				}
			}
		}
	}

	/// Pointer released. A link drag connects if it ends near another
	/// node; everything else just ends its gesture.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		match self.mode.clone() {
			Mode::LinkDragging { source, .. } => {
				if let Some(target) = self.node_within(gx, gy, LINK_TARGET_RADIUS, source) {
					self.graph.edges.push(GraphEdge {
						source,
						target,
						label: String::new(),
						link: LinkKind::Direct,
					});
					self.sim.reheat();
					debug!("linked {source} -> {target}");
				}
				self.mode = Mode::Idle;
			}
			Mode::NodeDragging { .. } => self.mode = Mode::Idle,
			_ => {}
		}
		self.pan.active = false;
	}

	/// Pointer left the canvas: cancel any gesture in flight.
	pub fn pointer_leave(&mut self) {
		if matches!(
			self.mode,
			Mode::NodeDragging { .. } | Mode::LinkDragging { .. }
		) {
			self.mode = Mode::Idle;
		}
		self.pan.active = false;
	}

	// --- inline editing -----------------------------------------------

	/// Double click starts an inline rename, first committing any edit
	/// already in progress elsewhere.
	pub fn double_click(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let Some(id) = self.node_at(gx, gy) else {
			return;
		};
		if matches!(&self.mode, Mode::Editing { id: cur, .. } if *cur == id) {
			return;
		}
		self.commit_edit();
		self.mode = Mode::Editing {
			id,
			buffer: self.graph.nodes[id].name.clone(),
		};
	}

	/// Replace the edit buffer (text input while editing). No document or
	/// graph mutation happens until commit.
	pub fn edit_input(&mut self, text: &str) {
		if let Mode::Editing { buffer, .. } = &mut self.mode {
			*buffer = text.to_string();
		}
	}

	/// Commit the edit buffer into the node's name (graph only). No-op
	/// outside of editing.
	pub fn commit_edit(&mut self) {
		if !matches!(self.mode, Mode::Editing { .. }) {
			return;
		}
		if let Mode::Editing { id, buffer } = std::mem::take(&mut self.mode) {
			let node = &mut self.graph.nodes[id];
			if self.selected.as_deref() == Some(node.name.as_str()) {
				self.selected = Some(buffer.clone());
			}
			node.name = buffer;
		}
	}

	/// Discard the edit buffer; the node name is unchanged.
	pub fn cancel_edit(&mut self) {
		if matches!(self.mode, Mode::Editing { .. }) {
			self.mode = Mode::Idle;
		}
	}

	/// Focus loss behaves like commit-on-Enter.
	pub fn blur(&mut self) {
		self.commit_edit();
	}

	/// Keyboard routing: while editing, keys feed the buffer; otherwise
	/// they are the zoom/fit/reset shortcuts. Returns true when handled.
	pub fn key_down(&mut self, key: &str) -> bool {
		if matches!(self.mode, Mode::Editing { .. }) {
			match key {
				"Enter" => self.commit_edit(),
				"Escape" => self.cancel_edit(),
				"Backspace" => {
					if let Mode::Editing { buffer, .. } = &mut self.mode {
						buffer.pop();
					}
				}
				k if k.chars().count() == 1 => {
					if let Mode::Editing { buffer, .. } = &mut self.mode {
						buffer.push_str(k);
					}
				}
				_ => return false,
			}
			return true;
		}
		match key {
			"+" | "=" => self.zoom_in(),
			"-" => self.zoom_out(),
			"f" | "F" => self.fit_to_content(),
			"r" | "R" | "0" => self.reset_view(),
			_ => return false,
		}
		true
	}

	// --- structural mutations -----------------------------------------

	/// Append a new child under the selected node, then recompile. The
	/// selection is cleared on success.
	pub fn add_child_to_selected(&mut self, child: DocNode) -> Result<()> {
		let (Some(doc), Some(name)) = (&self.doc, &self.selected) else {
			return Ok(());
		};
		let next = document::add_child_under(doc, name, child)?;
		self.set_document(Some(next));
		Ok(())
	}

	/// Remove the selected node's subtree, then recompile. Removing the
	/// root leaves an empty document.
	pub fn delete_selected(&mut self) -> Result<()> {
		let (Some(doc), Some(name)) = (&self.doc, &self.selected) else {
			return Ok(());
		};
		let next = document::remove_by_name(doc, name)?;
		self.set_document(next);
		Ok(())
	}

	pub fn toggle_snap(&mut self) {
		self.snap_to_grid = !self.snap_to_grid;
	}
}

fn snap(v: f64) -> f64 {
	(v / GRID_STEP).round() * GRID_STEP
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_page_state() -> DiagramState {
		let mut state = DiagramState::new(800.0, 600.0);
		let doc = DocNode::new("Home", NodeKind::Page)
			.with_children(vec![DocNode::new("About", NodeKind::Page)]);
		state.set_document(Some(doc));
		state
	}

	fn press_on_node(state: &mut DiagramState, id: usize) {
		let (x, y) = (state.graph.nodes[id].x, state.graph.nodes[id].y);
		state.pointer_down(x, y);
	}

	#[test]
	fn zoom_scale_stays_clamped() {
		let mut state = two_page_state();
		for _ in 0..50 {
			state.zoom_in();
		}
		assert!(state.transform.k <= SCALE_MAX);
		for _ in 0..100 {
			state.zoom_out();
		}
		assert!(state.transform.k >= SCALE_MIN);
		for i in 0..40 {
			state.wheel_zoom(123.0, 45.0, if i % 3 == 0 { 1.0 } else { -1.0 });
			assert!(state.transform.k >= SCALE_MIN && state.transform.k <= SCALE_MAX);
		}
	}

	#[test]
	fn fit_then_reset_is_identity() {
		let mut state = two_page_state();
		state.fit_to_content();
		assert_ne!(state.transform, ViewTransform::identity());
		state.reset_view();
		assert_eq!(state.transform, ViewTransform::identity());
	}

	#[test]
	fn click_selects_by_name() {
		let mut state = two_page_state();
		press_on_node(&mut state, 1);
		state.pointer_up(0.0, 0.0);
		assert_eq!(state.selected.as_deref(), Some("About"));
		// Background click clears the selection.
		state.pointer_down(-5000.0, -5000.0);
		assert_eq!(state.selected, None);
	}

	#[test]
	fn drag_with_snap_rounds_to_grid() {
		let mut state = two_page_state();
		state.snap_to_grid = true;
		press_on_node(&mut state, 1);
		state.pointer_move(53.0, 78.0);
		let node = &state.graph.nodes[1];
		assert_eq!((node.x, node.y), (60.0, 80.0));
		assert_eq!((node.fx, node.fy), (Some(60.0), Some(80.0)));
		state.pointer_up(53.0, 78.0);
		assert_eq!(state.mode, Mode::Idle);
		// Pin is sticky after release.
		assert_eq!(state.graph.nodes[1].fx, Some(60.0));
	}

	#[test]
	fn drag_converts_through_view_transform() {
		let mut state = two_page_state();
		state.transform = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		};
		let node_screen_x = state.graph.nodes[1].x * 2.0 + 100.0;
		let node_screen_y = state.graph.nodes[1].y * 2.0 + 50.0;
		state.pointer_down(node_screen_x, node_screen_y);
		state.pointer_move(node_screen_x + 20.0, node_screen_y);
		// 20 screen px at k=2 is 10 model units.
		assert!((state.graph.nodes[1].x - (node_screen_x - 100.0) / 2.0 - 10.0).abs() < 1e-9);
	}

	#[test]
	fn single_editor_with_auto_commit() {
		let mut state = two_page_state();
		let (ax, ay) = (state.graph.nodes[0].x, state.graph.nodes[0].y);
		let (bx, by) = (state.graph.nodes[1].x, state.graph.nodes[1].y);

		state.double_click(ax, ay);
		state.edit_input("Start");
		assert!(matches!(state.mode, Mode::Editing { id: 0, .. }));

		// Double-clicking B commits A's buffer first; only one editor ever.
		state.double_click(bx, by);
		assert!(matches!(state.mode, Mode::Editing { id: 1, .. }));
		assert_eq!(state.graph.nodes[0].name, "Start");

		state.key_down("Escape");
		assert_eq!(state.mode, Mode::Idle);
		assert_eq!(state.graph.nodes[1].name, "About");
	}

	#[test]
	fn enter_commits_and_escape_discards() {
		let mut state = two_page_state();
		let (bx, by) = (state.graph.nodes[1].x, state.graph.nodes[1].y);
		state.double_click(bx, by);
		state.key_down("Backspace");
		for c in ["o", "u", "t"] {
			state.key_down(c);
		}
		state.key_down("Enter");
		assert_eq!(state.graph.nodes[1].name, "Abouout");

		state.double_click(bx, by);
		state.edit_input("scratch");
		state.key_down("Escape");
		assert_eq!(state.graph.nodes[1].name, "Abouout");
	}

	#[test]
	fn blur_commits_like_enter() {
		let mut state = two_page_state();
		let (bx, by) = (state.graph.nodes[1].x, state.graph.nodes[1].y);
		state.double_click(bx, by);
		state.edit_input("Contact");
		state.blur();
		assert_eq!(state.graph.nodes[1].name, "Contact");
		assert_eq!(state.mode, Mode::Idle);
	}

	#[test]
	fn click_during_edit_commits_then_selects() {
		let mut state = two_page_state();
		let (ax, ay) = (state.graph.nodes[0].x, state.graph.nodes[0].y);
		state.double_click(ax, ay);
		state.edit_input("Landing");
		press_on_node(&mut state, 1);
		assert_eq!(state.graph.nodes[0].name, "Landing");
		assert_eq!(state.selected.as_deref(), Some("About"));
		assert!(matches!(state.mode, Mode::NodeDragging { id: 1, .. }));
	}

	#[test]
	fn rename_keeps_selection_in_sync() {
		let mut state = two_page_state();
		press_on_node(&mut state, 1);
		state.pointer_up(0.0, 0.0);
		let (bx, by) = (state.graph.nodes[1].x, state.graph.nodes[1].y);
		state.double_click(bx, by);
		state.edit_input("Contact");
		state.commit_edit();
		assert_eq!(state.selected.as_deref(), Some("Contact"));
	}

	#[test]
	fn link_drag_appends_graph_only_edge() {
		let mut state = two_page_state();
		state.set_layout(LayoutMode::Force);
		let edges_before = state.graph.edges.len();
		let source = &state.graph.nodes[0];
		let (hw, _) = half_extents(source.kind);
		let handle = (source.x + hw, source.y);

		state.pointer_down(handle.0, handle.1);
		assert!(matches!(state.mode, Mode::LinkDragging { source: 0, .. }));
		let (tx, ty) = (state.graph.nodes[1].x + 30.0, state.graph.nodes[1].y);
		state.pointer_move(tx, ty);
		state.pointer_up(tx, ty);

		assert_eq!(state.graph.edges.len(), edges_before + 1);
		let edge = state.graph.edges.last().unwrap();
		assert_eq!((edge.source, edge.target), (0, 1));
		assert_eq!(edge.label, "");
		// The document tree is untouched by diagram-only edges.
		assert_eq!(state.doc.as_ref().unwrap().children.len(), 1);
	}

	#[test]
	fn link_drag_released_on_empty_canvas_is_discarded() {
		let mut state = two_page_state();
		state.set_layout(LayoutMode::Force);
		let edges_before = state.graph.edges.len();
		let (x, y, hw) = {
			let source = &state.graph.nodes[0];
			(source.x, source.y, half_extents(source.kind).0)
		};
		state.pointer_down(x + hw, y);
		state.pointer_move(-4000.0, -4000.0);
		state.pointer_up(-4000.0, -4000.0);
		assert_eq!(state.graph.edges.len(), edges_before);
		assert_eq!(state.mode, Mode::Idle);
	}

	#[test]
	fn link_release_near_source_connects_nearby_target() {
		let mut state = two_page_state();
		state.set_layout(LayoutMode::Force);
		// Park About next to Home so a sloppy release lands within range
		// of both nodes, nearer the source.
		press_on_node(&mut state, 1);
		state.pointer_move(460.0, 300.0);
		state.pointer_up(460.0, 300.0);

		let (hx, hy) = {
			let home = &state.graph.nodes[0];
			(home.x + half_extents(home.kind).0, home.y)
		};
		state.pointer_down(hx, hy);
		assert!(matches!(state.mode, Mode::LinkDragging { source: 0, .. }));
		state.pointer_up(410.0, 300.0);

		assert_eq!(state.graph.edges.len(), 2);
		let edge = state.graph.edges.last().unwrap();
		assert_eq!((edge.source, edge.target), (0, 1));
	}

	#[test]
	fn link_drag_onto_source_is_discarded() {
		let mut state = two_page_state();
		state.set_layout(LayoutMode::Force);
		let edges_before = state.graph.edges.len();
		let (x, y, hw) = {
			let source = &state.graph.nodes[0];
			(source.x, source.y, half_extents(source.kind).0)
		};
		state.pointer_down(x + hw, y);
		state.pointer_up(x, y);
		assert_eq!(state.graph.edges.len(), edges_before);
	}

	#[test]
	fn no_link_handles_in_fixed_mode() {
		let mut state = two_page_state();
		let source = &state.graph.nodes[0];
		let (hw, _) = half_extents(source.kind);
		let (x, y) = (source.x + hw, source.y);
		state.pointer_down(x, y);
		assert!(!matches!(state.mode, Mode::LinkDragging { .. }));
	}

	#[test]
	fn force_mode_unpins_and_simulates() {
		let mut state = two_page_state();
		state.set_layout(LayoutMode::Force);
		assert!(state.graph.nodes.iter().all(|n| n.fx.is_none()));
		assert!(state.tick());
	}

	#[test]
	fn fixed_mode_never_ticks() {
		let mut state = two_page_state();
		assert!(!state.tick());
		let before: Vec<_> = state.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..10 {
			state.tick();
		}
		let after: Vec<_> = state.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn add_and_delete_through_selection() {
		let mut state = two_page_state();
		press_on_node(&mut state, 1);
		state.pointer_up(0.0, 0.0);
		state
			.add_child_to_selected(DocNode::new("Team", NodeKind::Action))
			.unwrap();
		assert_eq!(state.graph.nodes.len(), 3);
		assert_eq!(state.selected, None);

		press_on_node(&mut state, 1);
		state.pointer_up(0.0, 0.0);
		state.delete_selected().unwrap();
		assert_eq!(state.graph.nodes.len(), 1);
	}

	#[test]
	fn deleting_root_empties_the_diagram() {
		let mut state = two_page_state();
		press_on_node(&mut state, 0);
		state.pointer_up(0.0, 0.0);
		state.delete_selected().unwrap();
		assert!(state.doc.is_none());
		assert!(state.graph.nodes.is_empty());
	}

	#[test]
	fn invalid_json_leaves_previous_diagram() {
		let mut state = two_page_state();
		assert!(state.load_json("{not json").is_err());
		assert_eq!(state.graph.nodes.len(), 2);
	}

	#[test]
	fn pan_moves_translation_only() {
		let mut state = two_page_state();
		let nodes_before: Vec<_> = state.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		state.pointer_down(-5000.0, -5000.0);
		state.pointer_move(-4950.0, -4970.0);
		state.pointer_up(-4950.0, -4970.0);
		assert_eq!((state.transform.x, state.transform.y), (50.0, 30.0));
		let nodes_after: Vec<_> = state.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(nodes_before, nodes_after);
	}

	#[test]
	fn keyboard_shortcuts_drive_viewport() {
		let mut state = two_page_state();
		assert!(state.key_down("+"));
		assert!((state.transform.k - 1.2).abs() < 1e-9);
		assert!(state.key_down("0"));
		assert_eq!(state.transform, ViewTransform::identity());
		assert!(state.key_down("f"));
		assert!((state.transform.k - 0.85).abs() < 1e-9);
		assert!(!state.key_down("ArrowUp"));
	}
}
