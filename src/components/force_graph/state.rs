use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::components::diagram::EditorConfig;
use crate::components::diagram::hit::node_at;
use crate::components::diagram::scene::{Node, NodeId, Rgb, Scene};
use crate::components::diagram::viewport::Viewport;

/// Fixed category palette.
pub const COLORS: [Rgb; 10] = [
	Rgb(31, 119, 180),
	Rgb(255, 127, 14),
	Rgb(44, 160, 44),
	Rgb(214, 39, 40),
	Rgb(148, 103, 189),
	Rgb(140, 86, 75),
	Rgb(227, 119, 194),
	Rgb(127, 127, 127),
	Rgb(188, 189, 34),
	Rgb(23, 190, 207),
];

const SEED_RADIUS: f64 = 100.0;

/// Maps a node's category to a palette slot. Numeric categories index the
/// palette directly, anything else gets slots in order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct CategoryPalette {
	slots: BTreeMap<String, usize>,
}

impl CategoryPalette {
	pub fn from_scene(scene: &Scene) -> Self {
		let mut slots = BTreeMap::new();
		for category in scene.nodes().filter_map(|n| n.category.as_deref()) {
			if category.parse::<usize>().is_err() && !slots.contains_key(category) {
				let next = slots.len();
				slots.insert(category.to_string(), next);
			}
		}
		Self { slots }
	}

	/// Palette colour for `node`, or its own colour when uncategorised.
	pub fn color(&self, node: &Node) -> Rgb {
		let Some(category) = node.category.as_deref() else {
			return node.color;
		};
		let slot = category
			.parse::<usize>()
			.ok()
			.or_else(|| self.slots.get(category).copied())
			.unwrap_or(0);
		COLORS[slot % COLORS.len()]
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Read-only physics view of a scene. Positions come from the simulation;
/// `scene` mirrors them after every tick so the shared painters can read it.
pub struct ForceGraphState {
	pub graph: ForceGraph<u64, ()>,
	pub scene: Scene,
	pub config: EditorConfig,
	pub transform: Viewport,
	pub pan: PanState,
	pub hover: Option<NodeId>,
	pub palette: CategoryPalette,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl ForceGraphState {
	pub fn new(scene: &Scene, config: EditorConfig, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut scene = scene.clone();
		let mut index = HashMap::new();
		let count = scene.node_count().max(1) as f64;

		let ids: Vec<NodeId> = scene.nodes().map(|n| n.id).collect();
		for (i, id) in ids.into_iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let (x, y) = (SEED_RADIUS * angle.cos(), SEED_RADIUS * angle.sin());
			// seeded from a fixed circle, always finite
			let _ = scene.update_node_position(id, x, y);
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: id.0,
			});
			index.insert(id, idx);
		}

		for edge in scene.edges() {
			if let (Some(&src), Some(&tgt)) = (index.get(&edge.source), index.get(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		let mut transform = Viewport::with_limits(config.min_zoom, config.max_zoom);
		transform.pan_x = width / 2.0;
		transform.pan_y = height / 2.0;

		log::info!(
			"force view over {} nodes, {} edges",
			scene.node_count(),
			scene.edge_count()
		);

		Self {
			palette: CategoryPalette::from_scene(&scene),
			graph,
			scene,
			config,
			transform,
			pan: PanState::default(),
			hover: None,
			width,
			height,
			animation_running: true,
		}
	}

	/// Advance the simulation and copy positions into the scene mirror.
	/// Non-finite positions from the solver are ignored.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		let scene = &mut self.scene;
		self.graph.visit_nodes(|node| {
			let _ = scene.update_node_position(
				NodeId(node.data.user_data),
				node.x() as f64,
				node.y() as f64,
			);
		});
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.transform.screen_to_world(sx, sy);
		node_at(&self.scene, gx, gy)
	}

	pub fn set_hover(&mut self, node: Option<NodeId>) {
		self.hover = node;
	}

	pub fn pan_start(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.pan_x,
			transform_start_y: self.transform.pan_y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.pan_x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.pan_y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn pan_end(&mut self) {
		self.pan.active = false;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::scene::{NewNode, Shape};

	fn node(label: &str, category: Option<&str>) -> NewNode {
		NewNode {
			shape: Shape::Circle { radius: 5.0 },
			x: 0.0,
			y: 0.0,
			label: label.into(),
			color: Rgb(1, 1, 1),
			category: category.map(Into::into),
		}
	}

	fn chain() -> Scene {
		let mut scene = Scene::new();
		let ids: Vec<NodeId> = ["a", "b", "c", "d"]
			.iter()
			.map(|l| scene.add_node(node(l, Some("svc"))).unwrap())
			.collect();
		for w in ids.windows(2) {
			scene.add_edge(w[0], w[1], "", true).unwrap();
		}
		scene
	}

	#[test]
	fn palette_by_number_and_first_appearance() {
		let mut scene = Scene::new();
		let a = scene.add_node(node("a", Some("db"))).unwrap();
		let b = scene.add_node(node("b", Some("api"))).unwrap();
		let c = scene.add_node(node("c", Some("db"))).unwrap();
		let d = scene.add_node(node("d", Some("13"))).unwrap();
		let e = scene.add_node(node("e", None)).unwrap();
		let palette = CategoryPalette::from_scene(&scene);
		let color = |id| palette.color(scene.node(id).unwrap());

		assert_eq!(color(a), COLORS[0]);
		assert_eq!(color(b), COLORS[1]);
		assert_eq!(color(c), COLORS[0]);
		assert_eq!(color(d), COLORS[3]);
		assert_eq!(color(e), Rgb(1, 1, 1));
	}

	#[test]
	fn seeds_nodes_on_a_circle() {
		let state = ForceGraphState::new(&chain(), EditorConfig::default(), 800.0, 600.0);
		for n in state.scene.nodes() {
			assert!(((n.x * n.x + n.y * n.y).sqrt() - SEED_RADIUS).abs() < 1e-3);
		}
		assert_eq!((state.transform.pan_x, state.transform.pan_y), (400.0, 300.0));
	}

	#[test]
	fn tick_mirrors_simulation_positions() {
		let mut state = ForceGraphState::new(&chain(), EditorConfig::default(), 800.0, 600.0);
		for _ in 0..10 {
			state.tick(0.016);
		}
		let mut bodies = Vec::new();
		state
			.graph
			.visit_nodes(|n| bodies.push((NodeId(n.data.user_data), n.x() as f64, n.y() as f64)));
		assert_eq!(bodies.len(), 4);
		for (id, x, y) in bodies {
			let mirrored = state.scene.node(id).unwrap();
			assert_eq!((mirrored.x, mirrored.y), (x, y));
		}
		assert_eq!(state.scene.edge_count(), 3);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = ForceGraphState::new(&chain(), EditorConfig::default(), 800.0, 600.0);
		state.pan_start(10.0, 10.0);
		state.pan_to(30.0, 5.0);
		state.pan_end();
		state.pan_to(100.0, 100.0);
		assert_eq!((state.transform.pan_x, state.transform.pan_y), (420.0, 295.0));
	}

	#[test]
	fn hover_hit_test_uses_mirror() {
		let state = ForceGraphState::new(&chain(), EditorConfig::default(), 800.0, 600.0);
		// first node is seeded at (100, 0) world
		let (sx, sy) = state.transform.world_to_screen(SEED_RADIUS, 0.0);
		assert_eq!(state.node_at_position(sx, sy), Some(NodeId(0)));
		assert_eq!(state.node_at_position(400.0, 300.0), None);
	}
}
