use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
	WheelEvent, Window,
};

use super::render;
use super::scene::build_scene;
use super::state::DiagramState;
use super::types::DocNode;

/// Shared handle to the diagram state, so toolbar buttons outside the
/// canvas component can drive zoom/fit/mutations. Empty until the canvas
/// mounts.
#[derive(Clone, Default)]
pub struct DiagramHandle(Rc<RefCell<Option<DiagramState>>>);

impl DiagramHandle {
	/// Run `f` against the state if the canvas has mounted.
	pub fn with<R>(&self, f: impl FnOnce(&mut DiagramState) -> R) -> Option<R> {
		self.0.borrow_mut().as_mut().map(f)
	}
}

/// Keys typed into a form field or editable region belong to that element,
/// not the diagram shortcuts.
fn is_text_entry(tag: &str, content_editable: bool) -> bool {
	content_editable || matches!(tag, "INPUT" | "TEXTAREA")
}

fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Interactive IA diagram canvas. Compiles the given document into a graph
/// and runs the render/simulation loop; all interaction state lives in the
/// shared [`DiagramHandle`].
#[component]
pub fn IaDiagramCanvas(
	#[prop(into)] document: Signal<Option<DocNode>>,
	handle: DiagramHandle,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = handle.0.clone();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, keydown_cb_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
	);

	Effect::new(move |_| {
		let doc = document.get();
		// Later document changes only swap the document in.
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.set_document(doc);
			return;
		}

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut initial = DiagramState::new(w, h);
		initial.set_document(doc);
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(parent) = canvas_resize.parent_element() else {
				return;
			};
			let (nw, nh) = (parent.client_width() as f64, parent.client_height() as f64);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_keys = state_init.clone();
		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if let Some(target) = ev.target() {
				if let Some(el) = target.dyn_ref::<HtmlElement>() {
					if is_text_entry(&el.tag_name(), el.is_content_editable()) {
						return;
					}
				}
			}
			if let Some(ref mut s) = *state_keys.borrow_mut() {
				if s.key_down(&ev.key()) {
					ev.prevent_default();
				}
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(&build_scene(s), &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		ev.stop_propagation();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.double_click(x, y);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel_zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="ia-diagram-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab; width: 100%; height: 100%;"
		/>
	}
}
