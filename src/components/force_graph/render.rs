use crate::components::diagram::render::{Frame, clear, draw_edges, draw_labels, draw_nodes};
use crate::components::diagram::session::Selection;
use crate::components::diagram::surface::Surface;

use super::state::ForceGraphState;

/// Same painters as the editor, fed with simulated positions and palette
/// fills. The hovered node borrows the selection highlight.
pub fn render<S: Surface + ?Sized>(state: &ForceGraphState, ctx: &S) {
	let frame = Frame {
		scene: &state.scene,
		viewport: &state.transform,
		config: &state.config,
		selection: state.hover.map_or(Selection::None, Selection::Node),
		width: state.width,
		height: state.height,
	};
	clear(ctx, &frame);
	draw_edges(ctx, &frame);
	draw_nodes(ctx, &frame, &|node| state.palette.color(node));
	draw_labels(ctx, &frame);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::EditorConfig;
	use crate::components::diagram::scene::{NewNode, NodeId, Rgb, Scene, Shape};
	use crate::components::diagram::surface::tests::{Op, Recording};
	use crate::components::force_graph::state::COLORS;

	fn scene() -> Scene {
		let mut scene = Scene::new();
		let mk = |label: &str, category: &str| NewNode {
			shape: Shape::Circle { radius: 6.0 },
			x: 0.0,
			y: 0.0,
			label: label.into(),
			color: Rgb(0, 0, 0),
			category: Some(category.into()),
		};
		let a = scene.add_node(mk("a", "2")).unwrap();
		let b = scene.add_node(mk("b", "5")).unwrap();
		scene.add_edge(a, b, "link", true).unwrap();
		scene
	}

	#[test]
	fn fills_come_from_palette() {
		let state = ForceGraphState::new(&scene(), EditorConfig::default(), 400.0, 300.0);
		let rec = Recording::default();
		render(&state, &rec);
		let ops = rec.ops();
		assert!(ops.contains(&Op::Fill(COLORS[2].css())));
		assert!(ops.contains(&Op::Fill(COLORS[5].css())));
		assert!(!ops.contains(&Op::Fill(Rgb(0, 0, 0).css())));
	}

	#[test]
	fn edges_follow_latest_tick() {
		let mut state = ForceGraphState::new(&scene(), EditorConfig::default(), 400.0, 300.0);
		state.tick(0.016);
		let a = state.scene.node(NodeId(0)).unwrap().clone();
		let rec = Recording::default();
		render(&state, &rec);
		let start = state.transform.world_to_screen(a.x, a.y);
		assert!(rec.ops().contains(&Op::Move(start.0, start.1)));
	}

	#[test]
	fn no_grid_in_force_view() {
		let state = ForceGraphState::new(&scene(), EditorConfig::default(), 400.0, 300.0);
		let rec = Recording::default();
		render(&state, &rec);
		assert!(!rec.ops().contains(&Op::Stroke(state.config.grid_color.css())));
	}

	#[test]
	fn hovered_node_is_highlighted() {
		let mut state = ForceGraphState::new(&scene(), EditorConfig::default(), 400.0, 300.0);
		state.set_hover(Some(NodeId(1)));
		let rec = Recording::default();
		render(&state, &rec);
		assert!(rec.ops().contains(&Op::Stroke(state.config.selection_color.css())));
	}
}
