//! Which scene entity lies under a screen point.

use super::scene::{Edge, EdgeId, Node, NodeId, Scene, Shape};
use super::viewport::Viewport;

/// Result of a hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(NodeId),
	Edge(EdgeId),
}

/// World-space containment test for a single node.
pub fn node_contains(node: &Node, wx: f64, wy: f64) -> bool {
	let (dx, dy) = (wx - node.x, wy - node.y);
	match node.shape {
		Shape::Circle { radius } => (dx * dx + dy * dy).sqrt() <= radius,
		Shape::Rect { width, height } => dx.abs() <= width / 2.0 && dy.abs() <= height / 2.0,
	}
}

/// Perpendicular distance from `(px, py)` to the segment `a`→`b`, or `None`
/// when the projection falls outside the segment.
pub fn segment_distance(a: (f64, f64), b: (f64, f64), px: f64, py: f64) -> Option<f64> {
	let (lx, ly) = (b.0 - a.0, b.1 - a.1);
	let len = (lx * lx + ly * ly).sqrt();
	if len < 1e-9 {
		return None;
	}
	let (vx, vy) = (px - a.0, py - a.1);
	let proj = (vx * lx + vy * ly) / len;
	if !(0.0..=len).contains(&proj) {
		return None;
	}
	Some((vx * ly - vy * lx).abs() / len)
}

/// Topmost node under a world point. Later nodes are painted over earlier ones.
pub fn node_at(scene: &Scene, wx: f64, wy: f64) -> Option<NodeId> {
	scene
		.nodes()
		.rev()
		.find(|n| node_contains(n, wx, wy))
		.map(|n| n.id)
}

fn edge_distance(scene: &Scene, edge: &Edge, wx: f64, wy: f64) -> Option<f64> {
	let (s, t) = (scene.node(edge.source)?, scene.node(edge.target)?);
	segment_distance((s.x, s.y), (t.x, t.y), wx, wy)
}

/// Nearest edge closer than `tolerance` world units to a world point.
pub fn edge_at(scene: &Scene, wx: f64, wy: f64, tolerance: f64) -> Option<EdgeId> {
	scene
		.edges()
		.filter_map(|e| Some((e.id, edge_distance(scene, e, wx, wy)?)))
		.filter(|&(_, d)| d < tolerance)
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(id, _)| id)
}

/// Resolve a screen point. `tolerance_px` is divided by the zoom so edges
/// stay equally easy to grab at any zoom level.
pub fn hit_test(
	scene: &Scene,
	viewport: &Viewport,
	sx: f64,
	sy: f64,
	tolerance_px: f64,
) -> Option<Hit> {
	let (wx, wy) = viewport.screen_to_world(sx, sy);
	if let Some(id) = node_at(scene, wx, wy) {
		return Some(Hit::Node(id));
	}
	edge_at(scene, wx, wy, tolerance_px / viewport.zoom).map(Hit::Edge)
}
