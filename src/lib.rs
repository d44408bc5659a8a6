//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::info;

// Modules
pub mod components;
mod pages;

// Top-Level pages
use crate::pages::graph::Graph;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

use crate::components::diagram::EditorConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(config: &EditorConfig) {
	let _ = console_log::init_with_level(config.log_level());
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Raw JSON of the page's `<script id="editor-config">` block, if any.
pub fn config_source() -> Option<String> {
	web_sys::window()?
		.document()?
		.get_element_by_id("editor-config")?
		.text_content()
}

/// An app router which renders the editor, the force view and handles 404's
#[component]
pub fn App(config: EditorConfig) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Diagram Canvas" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/graph") view=Graph />
			</Routes>
		</Router>
	}
}
