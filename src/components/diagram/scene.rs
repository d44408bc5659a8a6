//! Nodes, edges and the validated scene that owns them.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a node, unique within a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Identifier of an edge, unique within a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "node {}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "edge {}", self.0)
	}
}

/// Plain 8-bit RGB colour, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	/// CSS colour string, e.g. `rgb(31, 119, 180)`.
	pub fn css(&self) -> String {
		format!("rgb({}, {}, {})", self.0, self.1, self.2)
	}
}

impl From<[u8; 3]> for Rgb {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Self(r, g, b)
	}
}

impl From<Rgb> for [u8; 3] {
	fn from(c: Rgb) -> Self {
		[c.0, c.1, c.2]
	}
}

/// Geometry of a node, centered on its position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
	/// Disc of the given radius.
	Circle { radius: f64 },
	/// Axis-aligned rectangle.
	Rect { width: f64, height: f64 },
}

impl Shape {
	fn is_valid(&self) -> bool {
		match *self {
			Shape::Circle { radius } => radius.is_finite() && radius > 0.0,
			Shape::Rect { width, height } => {
				width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
			}
		}
	}

	/// Distance from the center to the outline along `angle` (radians).
	pub fn extent_towards(&self, angle: f64) -> f64 {
		match *self {
			Shape::Circle { radius } => radius,
			Shape::Rect { width, height } => {
				let (hw, hh) = (width / 2.0, height / 2.0);
				let (c, s) = (angle.cos().abs(), angle.sin().abs());
				let tx = if c > f64::EPSILON { hw / c } else { f64::INFINITY };
				let ty = if s > f64::EPSILON { hh / s } else { f64::INFINITY };
				tx.min(ty)
			}
		}
	}

	/// Smallest half-dimension, used as the node's nominal size.
	pub fn half_size(&self) -> f64 {
		match *self {
			Shape::Circle { radius } => radius,
			Shape::Rect { width, height } => width.min(height) / 2.0,
		}
	}
}

/// A node of the diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	pub shape: Shape,
	pub x: f64,
	pub y: f64,
	pub label: String,
	pub color: Rgb,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

/// A connection between two distinct nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub id: EdgeId,
	#[serde(rename = "sourceId")]
	pub source: NodeId,
	#[serde(rename = "targetId")]
	pub target: NodeId,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub directed: bool,
}

/// Attributes of a node that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewNode {
	pub shape: Shape,
	pub x: f64,
	pub y: f64,
	pub label: String,
	pub color: Rgb,
	pub category: Option<String>,
}

/// Invariant violations. A failed mutation leaves the scene untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
	#[error("an edge cannot connect {0} to itself")]
	SelfLoop(NodeId),

	#[error("{0} does not exist")]
	UnknownNode(NodeId),

	#[error("{0} does not exist")]
	UnknownEdge(EdgeId),

	#[error("{0} is defined more than once")]
	DuplicateNodeId(NodeId),

	#[error("{0} is defined more than once")]
	DuplicateEdgeId(EdgeId),

	#[error("position of {0} is not finite")]
	NonFinitePosition(NodeId),

	#[error("shape of {0} has a non-positive or non-finite size")]
	InvalidShape(NodeId),

	#[error("{edge} references missing {node}")]
	InvalidReference { edge: EdgeId, node: NodeId },

	#[error("no identifiers left to allocate")]
	IdSpaceExhausted,
}

/// Complete set of nodes and edges being edited.
///
/// Both maps are ordered by id, which is also the paint order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	nodes: BTreeMap<NodeId, Node>,
	edges: BTreeMap<EdgeId, Edge>,
	next_node: u64,
	next_edge: u64,
}

// Id counters are bookkeeping, two scenes with the same content are equal.
impl PartialEq for Scene {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes && self.edges == other.edges
	}
}

impl Scene {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a scene from already-identified parts, validating everything.
	pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, SceneError> {
		let mut scene = Scene::new();
		for node in nodes {
			if scene.nodes.contains_key(&node.id) {
				return Err(SceneError::DuplicateNodeId(node.id));
			}
			if !node.x.is_finite() || !node.y.is_finite() {
				return Err(SceneError::NonFinitePosition(node.id));
			}
			if !node.shape.is_valid() {
				return Err(SceneError::InvalidShape(node.id));
			}
			let after = node.id.0.checked_add(1).ok_or(SceneError::IdSpaceExhausted)?;
			scene.next_node = scene.next_node.max(after);
			scene.nodes.insert(node.id, node);
		}
		for edge in edges {
			if scene.edges.contains_key(&edge.id) {
				return Err(SceneError::DuplicateEdgeId(edge.id));
			}
			if edge.source == edge.target {
				return Err(SceneError::SelfLoop(edge.source));
			}
			for node in [edge.source, edge.target] {
				if !scene.nodes.contains_key(&node) {
					return Err(SceneError::InvalidReference { edge: edge.id, node });
				}
			}
			let after = edge.id.0.checked_add(1).ok_or(SceneError::IdSpaceExhausted)?;
			scene.next_edge = scene.next_edge.max(after);
			scene.edges.insert(edge.id, edge);
		}
		Ok(scene)
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(&id)
	}

	/// Nodes in id order.
	pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
		self.nodes.values()
	}

	/// Edges in id order.
	pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> {
		self.edges.values()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Edges whose source or target is `id`.
	pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
		self.edges
			.values()
			.filter(move |e| e.source == id || e.target == id)
	}

	/// Id the next [`Self::add_node`] will hand out.
	pub fn next_node_id(&self) -> NodeId {
		NodeId(self.next_node)
	}

	pub fn add_node(&mut self, new: NewNode) -> Result<NodeId, SceneError> {
		let id = NodeId(self.next_node);
		if !new.x.is_finite() || !new.y.is_finite() {
			return Err(SceneError::NonFinitePosition(id));
		}
		if !new.shape.is_valid() {
			return Err(SceneError::InvalidShape(id));
		}
		self.next_node = id.0.checked_add(1).ok_or(SceneError::IdSpaceExhausted)?;
		self.nodes.insert(
			id,
			Node {
				id,
				shape: new.shape,
				x: new.x,
				y: new.y,
				label: new.label,
				color: new.color,
				category: new.category,
			},
		);
		Ok(id)
	}

	pub fn add_edge(
		&mut self,
		source: NodeId,
		target: NodeId,
		label: impl Into<String>,
		directed: bool,
	) -> Result<EdgeId, SceneError> {
		if source == target {
			return Err(SceneError::SelfLoop(source));
		}
		for node in [source, target] {
			if !self.nodes.contains_key(&node) {
				return Err(SceneError::UnknownNode(node));
			}
		}
		let id = EdgeId(self.next_edge);
		self.next_edge = id.0.checked_add(1).ok_or(SceneError::IdSpaceExhausted)?;
		self.edges.insert(
			id,
			Edge {
				id,
				source,
				target,
				label: label.into(),
				directed,
			},
		);
		Ok(id)
	}

	/// Remove a node together with every edge touching it.
	pub fn remove_node(&mut self, id: NodeId) -> Result<(Node, Vec<Edge>), SceneError> {
		let node = self.nodes.remove(&id).ok_or(SceneError::UnknownNode(id))?;
		let doomed: HashSet<EdgeId> = self.incident_edges(id).map(|e| e.id).collect();
		let mut removed = Vec::with_capacity(doomed.len());
		self.edges.retain(|eid, edge| {
			if doomed.contains(eid) {
				removed.push(edge.clone());
				false
			} else {
				true
			}
		});
		Ok((node, removed))
	}

	pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, SceneError> {
		self.edges.remove(&id).ok_or(SceneError::UnknownEdge(id))
	}

	pub fn update_node_position(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), SceneError> {
		let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
		if !x.is_finite() || !y.is_finite() {
			return Err(SceneError::NonFinitePosition(id));
		}
		node.x = x;
		node.y = y;
		Ok(())
	}

	pub fn set_node_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), SceneError> {
		let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
		node.label = label.into();
		Ok(())
	}

	pub fn set_edge_label(&mut self, id: EdgeId, label: impl Into<String>) -> Result<(), SceneError> {
		let edge = self.edges.get_mut(&id).ok_or(SceneError::UnknownEdge(id))?;
		edge.label = label.into();
		Ok(())
	}

	/// Drop every node and edge. Ids keep counting up.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}

	/// World-space bounding box `(min_x, min_y, max_x, max_y)` of all node outlines.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		self.nodes.values().fold(None, |acc, n| {
			let (hw, hh) = match n.shape {
				Shape::Circle { radius } => (radius, radius),
				Shape::Rect { width, height } => (width / 2.0, height / 2.0),
			};
			let b = (n.x - hw, n.y - hh, n.x + hw, n.y + hh);
			Some(match acc {
				None => b,
				Some((a, c, d, e)) => (a.min(b.0), c.min(b.1), d.max(b.2), e.max(b.3)),
			})
		})
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn circle(x: f64, y: f64, radius: f64, label: &str) -> NewNode {
		NewNode {
			shape: Shape::Circle { radius },
			x,
			y,
			label: label.into(),
			color: Rgb(31, 119, 180),
			category: None,
		}
	}

	/// `A(0,0,r=25)` and `B(100,0,r=25)`.
	pub(crate) fn two_nodes() -> (Scene, NodeId, NodeId) {
		let mut scene = Scene::new();
		let a = scene.add_node(circle(0.0, 0.0, 25.0, "A")).unwrap();
		let b = scene.add_node(circle(100.0, 0.0, 25.0, "B")).unwrap();
		(scene, a, b)
	}

	#[test]
	fn ids_are_monotonic_even_after_removal() {
		let (mut scene, a, b) = two_nodes();
		assert_eq!((a, b), (NodeId(0), NodeId(1)));
		scene.remove_node(b).unwrap();
		let c = scene.add_node(circle(5.0, 5.0, 10.0, "C")).unwrap();
		assert_eq!(c, NodeId(2));
	}

	#[test]
	fn self_loop_is_rejected_without_change() {
		let (mut scene, a, _) = two_nodes();
		let before = scene.clone();
		assert_eq!(scene.add_edge(a, a, "x", true), Err(SceneError::SelfLoop(a)));
		assert_eq!(scene, before);
	}

	#[test]
	fn edge_to_missing_node_is_rejected() {
		let (mut scene, a, _) = two_nodes();
		let err = scene.add_edge(a, NodeId(42), "", false).unwrap_err();
		assert_eq!(err, SceneError::UnknownNode(NodeId(42)));
		assert_eq!(scene.edge_count(), 0);
	}

	#[test]
	fn remove_node_cascades_to_incident_edges() {
		let (mut scene, a, b) = two_nodes();
		let c = scene.add_node(circle(50.0, 80.0, 25.0, "C")).unwrap();
		scene.add_edge(a, b, "ab", true).unwrap();
		scene.add_edge(c, a, "ca", false).unwrap();
		let bc = scene.add_edge(b, c, "bc", false).unwrap();

		let (node, removed) = scene.remove_node(a).unwrap();
		assert_eq!(node.label, "A");
		assert_eq!(removed.len(), 2);
		assert!(scene.edges().all(|e| e.source != a && e.target != a));
		assert_eq!(scene.edges().map(|e| e.id).collect::<Vec<_>>(), vec![bc]);
	}

	#[test]
	fn non_finite_positions_never_land() {
		let (mut scene, a, _) = two_nodes();
		assert!(scene.add_node(circle(f64::NAN, 0.0, 5.0, "bad")).is_err());
		assert_eq!(
			scene.update_node_position(a, 1.0, f64::INFINITY),
			Err(SceneError::NonFinitePosition(a))
		);
		let node = scene.node(a).unwrap();
		assert_eq!((node.x, node.y), (0.0, 0.0));
		assert_eq!(scene.node_count(), 2);
	}

	#[test]
	fn degenerate_shapes_are_rejected() {
		let mut scene = Scene::new();
		let mut bad = circle(0.0, 0.0, 0.0, "flat");
		assert!(matches!(scene.add_node(bad.clone()), Err(SceneError::InvalidShape(_))));
		bad.shape = Shape::Rect { width: 10.0, height: -1.0 };
		assert!(matches!(scene.add_node(bad), Err(SceneError::InvalidShape(_))));
		assert!(scene.is_empty());
	}

	#[test]
	fn from_parts_rejects_dangling_reference() {
		let (scene, a, _) = two_nodes();
		let nodes: Vec<Node> = scene.nodes().cloned().collect();
		let edges = vec![Edge {
			id: EdgeId(0),
			source: a,
			target: NodeId(9),
			label: String::new(),
			directed: false,
		}];
		assert_eq!(
			Scene::from_parts(nodes, edges),
			Err(SceneError::InvalidReference {
				edge: EdgeId(0),
				node: NodeId(9)
			})
		);
	}

	#[test]
	fn from_parts_rejects_duplicate_ids() {
		let (scene, _, _) = two_nodes();
		let mut nodes: Vec<Node> = scene.nodes().cloned().collect();
		nodes.push(nodes[0].clone());
		assert_eq!(
			Scene::from_parts(nodes, vec![]),
			Err(SceneError::DuplicateNodeId(NodeId(0)))
		);
	}

	#[test]
	fn from_parts_continues_id_sequence() {
		let (scene, _, _) = two_nodes();
		let mut rebuilt = Scene::from_parts(scene.nodes().cloned().collect(), vec![]).unwrap();
		let next = rebuilt.add_node(circle(0.0, 0.0, 1.0, "")).unwrap();
		assert_eq!(next, NodeId(2));
	}

	#[test]
	fn rect_extent_hits_the_closer_side() {
		let shape = Shape::Rect { width: 40.0, height: 20.0 };
		assert!((shape.extent_towards(0.0) - 20.0).abs() < 1e-9);
		assert!((shape.extent_towards(std::f64::consts::FRAC_PI_2) - 10.0).abs() < 1e-9);
	}

	#[test]
	fn last_id_is_never_handed_out() {
		let (scene, _, _) = two_nodes();
		let mut nodes: Vec<Node> = scene.nodes().cloned().collect();
		nodes[1].id = NodeId(u64::MAX - 1);
		let mut near_end = Scene::from_parts(nodes, vec![]).unwrap();
		let before = near_end.clone();
		assert_eq!(
			near_end.add_node(circle(0.0, 0.0, 5.0, "late")),
			Err(SceneError::IdSpaceExhausted)
		);
		assert_eq!(near_end, before);
		assert_eq!(near_end.node(NodeId(0)).map(|n| n.label.as_str()), Some("A"));

		nodes = scene.nodes().cloned().collect();
		nodes[0].id = NodeId(u64::MAX);
		assert_eq!(
			Scene::from_parts(nodes, vec![]),
			Err(SceneError::IdSpaceExhausted)
		);
	}

	#[test]
	fn next_node_id_previews_allocation() {
		let (mut scene, _, _) = two_nodes();
		let preview = scene.next_node_id();
		assert_eq!(scene.add_node(circle(1.0, 1.0, 2.0, "")).unwrap(), preview);
	}
}
