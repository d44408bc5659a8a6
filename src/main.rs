use diagram_canvas::components::diagram::EditorConfig;
use diagram_canvas::{App, config_source, init_logging};
use leptos::prelude::*;

fn main() {
	let (config, rejected) = EditorConfig::from_source(config_source().as_deref());
	init_logging(&config);
	if let Some(err) = rejected {
		log::warn!("{err}; using default editor config");
	}
	leptos::mount::mount_to_body(move || view! { <App config /> });
}
