//! The editor session: scene, viewport, selection and the pointer-driven
//! interaction state machine that mutates them.

use log::{debug, info};

use super::config::EditorConfig;
use super::hit::{Hit, hit_test};
use super::notify::Notifier;
use super::scene::{EdgeId, NewNode, NodeId, Rgb, Scene, SceneError, Shape};
use super::viewport::Viewport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
	#[default]
	Select,
	AddNode,
	AwaitingEdgeSource,
	AwaitingEdgeTarget,
	Delete,
}

/// At most one selected entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	Node(NodeId),
	Edge(EdgeId),
}

impl From<Hit> for Selection {
	fn from(hit: Hit) -> Self {
		match hit {
			Hit::Node(id) => Selection::Node(id),
			Hit::Edge(id) => Selection::Edge(id),
		}
	}
}

/// A node being dragged. The grab offset keeps the node from jumping to the
/// pointer when the press was off-center.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
	pub node: NodeId,
	pub grab_offset_x: f64,
	pub grab_offset_y: f64,
}

#[derive(Clone, Debug, Default)]
struct PanState {
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

#[derive(Clone, Copy, Debug)]
struct Press {
	x: f64,
	y: f64,
	moved: bool,
}

/// Attributes given to nodes created in [`InteractionMode::AddNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct PendingNode {
	/// Empty means "Node {id}".
	pub label: String,
	pub shape: Shape,
	pub color: Rgb,
	pub category: Option<String>,
}

/// Attributes given to edges created by the connect gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingEdge {
	pub label: String,
	pub directed: bool,
}

/// Everything one editor canvas owns. Every command goes through here and
/// marks the session dirty when something visible changed.
#[derive(Clone, Debug)]
pub struct EditorSession {
	config: EditorConfig,
	scene: Scene,
	viewport: Viewport,
	selection: Selection,
	mode: InteractionMode,
	drag: Option<DragSession>,
	pan: Option<PanState>,
	press: Option<Press>,
	edge_source: Option<NodeId>,
	pointer_world: Option<(f64, f64)>,
	pending_node: PendingNode,
	pending_edge: PendingEdge,
	dirty: bool,
}

impl Default for EditorSession {
	fn default() -> Self {
		Self::new(EditorConfig::default())
	}
}

impl EditorSession {
	pub fn new(config: EditorConfig) -> Self {
		Self {
			viewport: Viewport::with_limits(config.min_zoom, config.max_zoom),
			pending_node: PendingNode {
				label: String::new(),
				shape: config.default_shape,
				color: config.default_color,
				category: None,
			},
			pending_edge: PendingEdge {
				label: String::new(),
				directed: true,
			},
			config,
			scene: Scene::new(),
			selection: Selection::None,
			mode: InteractionMode::Select,
			drag: None,
			pan: None,
			press: None,
			edge_source: None,
			pointer_world: None,
			dirty: true,
		}
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	pub fn mode(&self) -> InteractionMode {
		self.mode
	}

	pub fn drag(&self) -> Option<&DragSession> {
		self.drag.as_ref()
	}

	/// Source node of an edge under construction.
	pub fn edge_source(&self) -> Option<NodeId> {
		self.edge_source
	}

	/// Last known pointer position in world space.
	pub fn pointer_world(&self) -> Option<(f64, f64)> {
		self.pointer_world
	}

	pub fn pending_node(&self) -> &PendingNode {
		&self.pending_node
	}

	pub fn pending_edge(&self) -> &PendingEdge {
		&self.pending_edge
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Clear the dirty flag, returning whether a repaint is due.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	pub fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	pub fn set_pending_node(&mut self, pending: PendingNode) {
		self.pending_node = pending;
	}

	pub fn set_pending_edge(&mut self, pending: PendingEdge) {
		self.pending_edge = pending;
	}

	/// Switch tool. The two edge modes go through [`Self::connect`].
	pub fn set_mode(&mut self, mode: InteractionMode) {
		match mode {
			InteractionMode::AwaitingEdgeSource | InteractionMode::AwaitingEdgeTarget => {
				self.connect()
			}
			_ => {
				self.edge_source = None;
				self.enter(mode);
			}
		}
	}

	fn enter(&mut self, mode: InteractionMode) {
		if self.mode != mode {
			debug!("mode {:?} -> {:?}", self.mode, mode);
			self.mode = mode;
			self.dirty = true;
		}
	}

	/// Start (or restart) the two-phase edge gesture from the selected node.
	pub fn connect(&mut self) {
		self.end_gestures();
		match self.selection {
			Selection::Node(id) => {
				self.edge_source = Some(id);
				self.enter(InteractionMode::AwaitingEdgeTarget);
			}
			_ => {
				self.edge_source = None;
				self.enter(InteractionMode::AwaitingEdgeSource);
			}
		}
		self.dirty = true;
	}

	/// Abandon whatever is in progress and go back to selecting.
	pub fn cancel(&mut self) {
		self.end_gestures();
		self.edge_source = None;
		self.enter(InteractionMode::Select);
	}

	fn end_gestures(&mut self) {
		self.drag = None;
		self.pan = None;
		self.press = None;
	}

	fn select(&mut self, selection: Selection) {
		if self.selection != selection {
			self.selection = selection;
			self.dirty = true;
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(stale) = self.drag.take() {
			debug!("closing stale drag of {}", stale.node);
		}
		self.pan = None;
		self.press = Some(Press {
			x: sx,
			y: sy,
			moved: false,
		});
		if self.mode != InteractionMode::Select {
			return;
		}
		let (wx, wy) = self.viewport.screen_to_world(sx, sy);
		match self.hit(sx, sy) {
			Some(Hit::Node(id)) if self.selection == Selection::Node(id) => {
				if let Some(node) = self.scene.node(id) {
					self.drag = Some(DragSession {
						node: id,
						grab_offset_x: node.x - wx,
						grab_offset_y: node.y - wy,
					});
				}
			}
			Some(_) => {}
			None => {
				self.pan = Some(PanState {
					start_x: sx,
					start_y: sy,
					transform_start_x: self.viewport.pan_x,
					transform_start_y: self.viewport.pan_y,
				});
			}
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(press) = self.press.as_mut() {
			let (dx, dy) = (sx - press.x, sy - press.y);
			if (dx * dx + dy * dy).sqrt() > self.config.click_slop_px {
				press.moved = true;
			}
		}
		let (wx, wy) = self.viewport.screen_to_world(sx, sy);
		self.pointer_world = Some((wx, wy));
		if self.mode == InteractionMode::AwaitingEdgeTarget {
			self.dirty = true;
		}

		if let Some(drag) = self.drag.clone() {
			let (nx, ny) = (wx + drag.grab_offset_x, wy + drag.grab_offset_y);
			if self.scene.update_node_position(drag.node, nx, ny).is_ok() {
				self.dirty = true;
			} else {
				self.drag = None;
			}
		} else if let Some(pan) = &self.pan {
			self.viewport.pan_x = pan.transform_start_x + (sx - pan.start_x);
			self.viewport.pan_y = pan.transform_start_y + (sy - pan.start_y);
			self.dirty = true;
		}
	}

	/// Release. A release that did not travel past the click slop is a click.
	pub fn pointer_up(&mut self, sx: f64, sy: f64, notifier: &dyn Notifier) {
		let drag = self.drag.take();
		self.pan = None;
		let Some(press) = self.press.take() else {
			return;
		};
		if press.moved {
			if let Some(drag) = drag {
				debug!("dropped {}", drag.node);
			}
			return;
		}
		self.click(sx, sy, notifier);
	}

	/// Pointer left the surface: end any gesture without clicking.
	pub fn pointer_leave(&mut self) {
		self.end_gestures();
		if self.pointer_world.take().is_some() && self.mode == InteractionMode::AwaitingEdgeTarget
		{
			self.dirty = true;
		}
	}

	fn hit(&self, sx: f64, sy: f64) -> Option<Hit> {
		hit_test(
			&self.scene,
			&self.viewport,
			sx,
			sy,
			self.config.hit_tolerance_px,
		)
	}

	pub fn click(&mut self, sx: f64, sy: f64, notifier: &dyn Notifier) {
		let hit = self.hit(sx, sy);
		match self.mode {
			InteractionMode::Select => self.select(hit.map(Selection::from).unwrap_or_default()),
			InteractionMode::AddNode => self.add_node_at(sx, sy, notifier),
			InteractionMode::Delete => match hit {
				Some(Hit::Node(id)) => self.delete_node(id, notifier),
				Some(Hit::Edge(id)) => self.delete_edge(id, notifier),
				None => {}
			},
			InteractionMode::AwaitingEdgeSource => match hit {
				Some(Hit::Node(id)) => {
					self.select(Selection::Node(id));
					self.edge_source = Some(id);
					self.enter(InteractionMode::AwaitingEdgeTarget);
				}
				_ => {
					notifier.notify_info("Edge creation cancelled");
					self.cancel();
				}
			},
			InteractionMode::AwaitingEdgeTarget => match (hit, self.edge_source) {
				(Some(Hit::Node(target)), Some(source)) => self.finish_edge(source, target, notifier),
				_ => {
					notifier.notify_info("Edge creation cancelled");
					self.cancel();
				}
			},
		}
	}

	fn add_node_at(&mut self, sx: f64, sy: f64, notifier: &dyn Notifier) {
		let (x, y) = self.viewport.screen_to_world(sx, sy);
		let pending = self.pending_node.clone();
		let label = if pending.label.trim().is_empty() {
			format!("Node {}", self.scene.next_node_id().0)
		} else {
			pending.label
		};
		let added = self.scene.add_node(NewNode {
			shape: pending.shape,
			x,
			y,
			label,
			color: pending.color,
			category: pending.category,
		});
		match added {
			Ok(id) => {
				info!("added {id} at ({x:.1}, {y:.1})");
				notifier.notify_info("Node added");
				self.selection = Selection::Node(id);
			}
			Err(err) => notifier.notify_error(&err.to_string()),
		}
		self.enter(InteractionMode::Select);
		self.dirty = true;
	}

	fn finish_edge(&mut self, source: NodeId, target: NodeId, notifier: &dyn Notifier) {
		let PendingEdge { label, directed } = self.pending_edge.clone();
		match self.scene.add_edge(source, target, label, directed) {
			Ok(id) => {
				info!("added {id} from {source} to {target}");
				notifier.notify_info("Edge created");
				self.edge_source = None;
				self.selection = Selection::Edge(id);
				self.enter(InteractionMode::Select);
				self.dirty = true;
			}
			Err(err @ SceneError::SelfLoop(_)) => {
				log::warn!("{err}");
				notifier.notify_error(&err.to_string());
			}
			Err(err) => {
				log::warn!("{err}");
				notifier.notify_error(&err.to_string());
				self.cancel();
			}
		}
	}

	fn delete_node(&mut self, id: NodeId, notifier: &dyn Notifier) {
		match self.scene.remove_node(id) {
			Ok((node, edges)) => {
				info!("removed {id} and {} incident edges", edges.len());
				notifier.notify_info(&format!("Deleted \"{}\"", node.label));
				let edge_selected =
					matches!(self.selection, Selection::Edge(e) if edges.iter().any(|x| x.id == e));
				if self.selection == Selection::Node(id) || edge_selected {
					self.selection = Selection::None;
				}
				if self.edge_source == Some(id) {
					self.edge_source = None;
					self.enter(InteractionMode::Select);
				}
				self.dirty = true;
			}
			Err(err) => notifier.notify_error(&err.to_string()),
		}
	}

	fn delete_edge(&mut self, id: EdgeId, notifier: &dyn Notifier) {
		match self.scene.remove_edge(id) {
			Ok(_) => {
				info!("removed {id}");
				notifier.notify_info("Edge deleted");
				if self.selection == Selection::Edge(id) {
					self.selection = Selection::None;
				}
				self.dirty = true;
			}
			Err(err) => notifier.notify_error(&err.to_string()),
		}
	}

	/// Remove whatever is selected (keyboard Delete).
	pub fn delete_selected(&mut self, notifier: &dyn Notifier) {
		match self.selection {
			Selection::Node(id) => self.delete_node(id, notifier),
			Selection::Edge(id) => self.delete_edge(id, notifier),
			Selection::None => {}
		}
	}

	pub fn rename_selected(&mut self, label: &str, notifier: &dyn Notifier) {
		let result = match self.selection {
			Selection::Node(id) => self.scene.set_node_label(id, label),
			Selection::Edge(id) => self.scene.set_edge_label(id, label),
			Selection::None => return,
		};
		match result {
			Ok(()) => self.dirty = true,
			Err(err) => notifier.notify_error(&err.to_string()),
		}
	}

	pub fn zoom_by(&mut self, factor: f64) {
		if self.viewport.zoom_by(factor) {
			self.dirty = true;
		}
	}

	/// Wheel zoom around the cursor.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
		if self.viewport.zoom_at(factor, sx, sy) {
			self.dirty = true;
		}
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.viewport.pan_by(dx, dy);
		self.dirty = true;
	}

	/// Zoom and pan so the whole scene fits a `width` x `height` surface.
	pub fn fit_to_scene(&mut self, width: f64, height: f64) {
		if let Some(bounds) = self.scene.bounds() {
			self.viewport.fit_to(bounds, width, height, 40.0);
			self.dirty = true;
		}
	}

	/// Replace the scene wholesale, dropping all transient state.
	pub fn load_scene(&mut self, scene: Scene) {
		info!(
			"loaded scene with {} nodes, {} edges",
			scene.node_count(),
			scene.edge_count()
		);
		self.scene = scene;
		self.selection = Selection::None;
		self.edge_source = None;
		self.end_gestures();
		self.mode = InteractionMode::Select;
		self.dirty = true;
	}

	/// Empty canvas, identity viewport. Ids keep counting up.
	pub fn reset(&mut self) {
		let mut scene = std::mem::take(&mut self.scene);
		scene.clear();
		self.load_scene(scene);
		self.viewport.reset();
	}

	/// Direct scene access for hosts that seed content programmatically.
	pub fn scene_mut(&mut self) -> &mut Scene {
		self.dirty = true;
		&mut self.scene
	}
}
