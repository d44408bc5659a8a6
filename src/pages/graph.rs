use leptos::prelude::*;

use crate::components::diagram::{NewNode, NodeId, Rgb, Scene, Shape};
use crate::components::force_graph::ForceGraphCanvas;

/// Random tree whose nodes carry one of ten numeric categories.
fn generate_sample_scene(n: usize) -> Scene {
	let mut scene = Scene::new();
	let ids: Vec<NodeId> = (0..n)
		.filter_map(|i| {
			scene
				.add_node(NewNode {
					shape: Shape::Circle { radius: 5.0 },
					x: 0.0,
					y: 0.0,
					label: if i < 10 {
						format!("Node {}", i)
					} else {
						String::new()
					},
					color: Rgb(31, 119, 180),
					category: Some((i % 10).to_string()),
				})
				.ok()
		})
		.collect();

	for i in 1..ids.len() {
		let target = (rand_simple(i) * (i as f64)) as usize;
		// target < i, never a self loop
		let _ = scene.add_edge(ids[i], ids[target], "", true);
	}
	scene
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Force-directed view of a generated scene.
#[component]
pub fn Graph() -> impl IntoView {
	let scene = Signal::derive(move || generate_sample_scene(100));

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas data=scene fullscreen=true />
			<div class="graph-overlay">
				<h1>"Force-Directed Graph"</h1>
				<p class="subtitle">"Hover to highlight. Scroll to zoom. Drag background to pan."</p>
				<a href="/">"Editor"</a>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_is_a_tree() {
		let scene = generate_sample_scene(100);
		assert_eq!(scene.node_count(), 100);
		assert_eq!(scene.edge_count(), 99);
		assert!(scene.edges().all(|e| e.source != e.target));
	}
}
