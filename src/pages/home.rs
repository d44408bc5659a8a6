use leptos::prelude::*;

use crate::components::diagram::{DiagramEditor, NewNode, Rgb, Scene, Shape};

/// Small starter diagram so the editor opens on something.
fn sample_scene() -> Scene {
	let mut scene = Scene::new();
	let node = |label: &str, x: f64, y: f64, shape: Shape, color: Rgb| NewNode {
		shape,
		x,
		y,
		label: label.into(),
		color,
		category: None,
	};
	let circle = Shape::Circle { radius: 25.0 };
	let rect = Shape::Rect {
		width: 110.0,
		height: 40.0,
	};

	let nodes = [
		node("Customer", 0.0, 0.0, circle, Rgb(31, 119, 180)),
		node("Order", 200.0, 0.0, rect, Rgb(255, 127, 14)),
		node("Product", 400.0, -80.0, circle, Rgb(44, 160, 44)),
		node("Invoice", 400.0, 100.0, rect, Rgb(148, 103, 189)),
	]
	.map(|n| scene.add_node(n));
	if let [Ok(customer), Ok(order), Ok(product), Ok(invoice)] = nodes {
		let _ = scene.add_edge(customer, order, "places", true);
		let _ = scene.add_edge(order, product, "contains", true);
		let _ = scene.add_edge(order, invoice, "billed by", true);
	}
	scene
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let scene = Signal::derive(sample_scene);

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

			<div class="fullscreen-graph">
				<DiagramEditor scene=scene fullscreen=true />
				<div class="graph-overlay">
					<h1>"Diagram Editor"</h1>
					<p class="subtitle">
						"Click to select. Drag a selected node to move it. Drag background to pan. Scroll to zoom."
					</p>
					<a href="/graph">"Force view"</a>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_scene_is_connected() {
		let scene = sample_scene();
		assert_eq!(scene.node_count(), 4);
		assert_eq!(scene.edge_count(), 3);
	}
}
