use leptos::prelude::*;

/// 404 fallback page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"404: Page not found"</h1>
			<a href="/">"Back to the diagram"</a>
		</div>
	}
}
