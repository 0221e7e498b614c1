use leptos::prelude::*;

use crate::components::ia_diagram::{
	DiagramHandle, DocNode, IaDiagramCanvas, LayoutMode, LinkKind, NodeKind,
};

/// A small built-in document so the page has something to show before the
/// user pastes their own. Mirrors the shape of a generic site IA.
fn sample_document() -> DocNode {
	let mut blog = DocNode::new("Blog", NodeKind::Page);
	blog.link = LinkKind::Related;
	let mut checkout = DocNode::new("Checkout", NodeKind::Decision);
	checkout.label = "Proceed to payment".into();

	DocNode::new("Generic Site", NodeKind::Page).with_children(vec![
		DocNode::new("Home", NodeKind::Page),
		DocNode::new("Services", NodeKind::Page),
		DocNode::new("Service Selection", NodeKind::Decision).with_children(vec![
			DocNode::new("Basic Service", NodeKind::Action),
			DocNode::new("Premium Service", NodeKind::Page),
		]),
		blog,
		DocNode::new("Login", NodeKind::Action),
		DocNode::new("Contact", NodeKind::Page),
		checkout.with_children(vec![
			DocNode::new("Payment Methods", NodeKind::Page),
			DocNode::new("Order Review", NodeKind::Action),
		]),
		DocNode::new("Payment", NodeKind::Page),
	])
}

/// Default Home Page: the diagram canvas plus its toolbar.
#[component]
pub fn Home() -> impl IntoView {
	let handle = StoredValue::new_local(DiagramHandle::default());
	let (document, set_document) = signal(Some(sample_document()));
	let error = RwSignal::new(String::new());
	let json_text = RwSignal::new(String::new());
	let force_mode = RwSignal::new(false);
	let snap = RwSignal::new(false);

	let zoom_in = move |_| {
		handle.with_value(|h| h.with(|s| s.zoom_in()));
	};
	let zoom_out = move |_| {
		handle.with_value(|h| h.with(|s| s.zoom_out()));
	};
	let fit = move |_| {
		handle.with_value(|h| h.with(|s| s.fit_to_content()));
	};
	let reset = move |_| {
		handle.with_value(|h| h.with(|s| s.reset_view()));
	};

	let add_node = move |_| {
		let child = DocNode::new(
			format!("New Node {}", js_sys::Date::now() as u64),
			NodeKind::Action,
		);
		let result = handle.with_value(|h| h.with(|s| s.add_child_to_selected(child)));
		match result {
			Some(Err(err)) => error.set(err.to_string()),
			_ => error.set(String::new()),
		}
	};
	let delete_node = move |_| {
		let result = handle.with_value(|h| h.with(|s| s.delete_selected()));
		match result {
			Some(Err(err)) => error.set(err.to_string()),
			_ => error.set(String::new()),
		}
	};

	let toggle_snap = move |_| {
		handle.with_value(|h| h.with(|s| s.toggle_snap()));
		snap.update(|v| *v = !*v);
	};
	let toggle_layout = move |_| {
		let next = !force_mode.get();
		force_mode.set(next);
		handle.with_value(|h| {
			h.with(|s| {
				s.set_layout(if next {
					LayoutMode::Force
				} else {
					LayoutMode::Fixed
				})
			})
		});
	};

	let load_sample = move |_| {
		set_document.set(Some(sample_document()));
		error.set(String::new());
	};
	let load_json = move |_| match DocNode::from_json(&json_text.get()) {
		Ok(doc) => {
			set_document.set(Some(doc));
			error.set(String::new());
		}
		Err(err) => error.set(err.to_string()),
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="diagram-page">
				<div class="diagram-toolbar">
					<button on:click=zoom_in title="Zoom in (+)">"+"</button>
					<button on:click=zoom_out title="Zoom out (-)">"-"</button>
					<button on:click=fit title="Fit to content (f)">"fit"</button>
					<button on:click=reset title="Reset view (r)">"reset"</button>
					<button on:click=add_node title="Add child under selection">"add"</button>
					<button on:click=delete_node title="Delete selected subtree">"del"</button>
					<button on:click=toggle_snap>
						{move || if snap.get() { "snap: on" } else { "snap: off" }}
					</button>
					<button on:click=toggle_layout>
						{move || if force_mode.get() { "layout: force" } else { "layout: tree" }}
					</button>
					<button on:click=load_sample>"sample"</button>
				</div>
				<div class="diagram-import">
					<textarea
						placeholder="Paste an IA document as JSON"
						prop:value=move || json_text.get()
						on:input=move |ev| json_text.set(event_target_value(&ev))
					/>
					<button on:click=load_json>"load"</button>
				</div>
				{move || {
					let message = error.get();
					(!message.is_empty())
						.then(|| view! { <p class="diagram-error">{message}</p> })
				}}
				<div class="diagram-canvas-wrap">
					<IaDiagramCanvas document=document handle=handle.get_value() />
				</div>
				<p class="subtitle">
					"Click to select, double-click to rename, drag to move. Scroll to zoom, drag background to pan."
				</p>
			</div>
		</ErrorBoundary>
	}
}
