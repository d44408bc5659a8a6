//! Paint pipeline: background, grid, edges, nodes, labels. Reads state only.

use super::config::EditorConfig;
use super::scene::{Node, Rgb, Scene, Shape};
use super::session::{EditorSession, InteractionMode, Selection};
use super::surface::Surface;
use super::viewport::Viewport;

const LINE_WIDTH: f64 = 1.5;
const SELECTED_LINE_WIDTH: f64 = 3.0;
const LABEL_PADDING: f64 = 3.0;

/// Read-only snapshot handed to the painters.
pub struct Frame<'a> {
	pub scene: &'a Scene,
	pub viewport: &'a Viewport,
	pub config: &'a EditorConfig,
	pub selection: Selection,
	pub width: f64,
	pub height: f64,
}

impl<'a> Frame<'a> {
	pub fn of_session(session: &'a EditorSession, width: f64, height: f64) -> Self {
		Self {
			scene: session.scene(),
			viewport: session.viewport(),
			config: session.config(),
			selection: session.selection(),
			width,
			height,
		}
	}
}

/// Paint a full editor frame.
pub fn render<S: Surface + ?Sized>(surface: &S, session: &EditorSession, width: f64, height: f64) {
	let frame = Frame::of_session(session, width, height);
	clear(surface, &frame);
	if frame.config.show_grid {
		draw_grid(surface, &frame);
	}
	draw_edges(surface, &frame);
	if session.mode() == InteractionMode::AwaitingEdgeTarget {
		draw_rubber_band(surface, session);
	}
	draw_nodes(surface, &frame, &|n: &Node| n.color);
	draw_labels(surface, &frame);
}

pub fn clear<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	surface.set_fill_style(&frame.config.background.css());
	surface.fill_rect(0.0, 0.0, frame.width, frame.height);
}

/// Lines every `grid_spacing_px` screen pixels, anchored to the world origin
/// so the lattice follows panning.
pub fn draw_grid<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	let spacing = frame.config.grid_spacing_px;
	if spacing <= 0.0 {
		return;
	}
	let vp = frame.viewport;
	let step = spacing / vp.zoom;
	let (x0, y0, x1, y1) = vp.visible_world_bounds(frame.width, frame.height);

	surface.set_stroke_style(&frame.config.grid_color.css());
	surface.set_line_width(1.0);
	surface.begin_path();
	let mut wx = (x0 / step).ceil() * step;
	while wx <= x1 {
		let (sx, _) = vp.world_to_screen(wx, 0.0);
		surface.move_to(sx, 0.0);
		surface.line_to(sx, frame.height);
		wx += step;
	}
	let mut wy = (y0 / step).ceil() * step;
	while wy <= y1 {
		let (_, sy) = vp.world_to_screen(0.0, wy);
		surface.move_to(0.0, sy);
		surface.line_to(frame.width, sy);
		wy += step;
	}
	surface.stroke();
}

/// Edges straight from the current node positions.
pub fn draw_edges<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	let (vp, config) = (frame.viewport, frame.config);
	for edge in frame.scene.edges() {
		let (Some(src), Some(tgt)) = (frame.scene.node(edge.source), frame.scene.node(edge.target))
		else {
			continue;
		};
		let (x1, y1) = vp.world_to_screen(src.x, src.y);
		let (x2, y2) = vp.world_to_screen(tgt.x, tgt.y);
		if (x2 - x1).hypot(y2 - y1) < 0.001 {
			continue;
		}

		let selected = frame.selection == Selection::Edge(edge.id);
		let color = if selected {
			config.selection_color
		} else {
			config.edge_color
		}
		.css();
		surface.set_stroke_style(&color);
		surface.set_line_width(if selected {
			SELECTED_LINE_WIDTH
		} else {
			LINE_WIDTH
		});
		surface.begin_path();
		surface.move_to(x1, y1);
		surface.line_to(x2, y2);
		surface.stroke();

		if edge.directed {
			let angle = (tgt.y - src.y).atan2(tgt.x - src.x);
			let back = tgt.shape.extent_towards(angle) * vp.zoom;
			let tip = (x2 - back * angle.cos(), y2 - back * angle.sin());
			let [left, right] = arrow_wings(tip, angle, config.arrow_length, config.arrow_wing_angle);
			surface.set_fill_style(&color);
			surface.begin_path();
			surface.move_to(tip.0, tip.1);
			surface.line_to(left.0, left.1);
			surface.line_to(right.0, right.1);
			surface.close_path();
			surface.fill();
		}
	}
}

/// Wing points of an arrowhead pointing along `angle` with its tip at `tip`.
pub fn arrow_wings(tip: (f64, f64), angle: f64, length: f64, wing: f64) -> [(f64, f64); 2] {
	[angle - wing, angle + wing].map(|a| (tip.0 - length * a.cos(), tip.1 - length * a.sin()))
}

fn draw_rubber_band<S: Surface + ?Sized>(surface: &S, session: &EditorSession) {
	let (Some(source), Some((px, py))) = (
		session.edge_source().and_then(|id| session.scene().node(id)),
		session.pointer_world(),
	) else {
		return;
	};
	let vp = session.viewport();
	let (x1, y1) = vp.world_to_screen(source.x, source.y);
	let (x2, y2) = vp.world_to_screen(px, py);
	surface.set_stroke_style(&session.config().selection_color.css());
	surface.set_line_width(LINE_WIDTH);
	surface.set_line_dash(&[6.0, 4.0]);
	surface.begin_path();
	surface.move_to(x1, y1);
	surface.line_to(x2, y2);
	surface.stroke();
	surface.set_line_dash(&[]);
}

/// Node bodies. `fill` picks the fill colour so other views can recolour.
pub fn draw_nodes<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>, fill: &dyn Fn(&Node) -> Rgb) {
	let (vp, config) = (frame.viewport, frame.config);
	for node in frame.scene.nodes() {
		let (x, y) = vp.world_to_screen(node.x, node.y);
		let k = vp.zoom;
		surface.begin_path();
		match node.shape {
			Shape::Circle { radius } => surface.arc(x, y, radius * k),
			Shape::Rect { width, height } => {
				surface.rect(x - width * k / 2.0, y - height * k / 2.0, width * k, height * k)
			}
		}
		surface.set_fill_style(&fill(node).css());
		surface.fill();

		let selected = frame.selection == Selection::Node(node.id);
		if selected {
			surface.set_stroke_style(&config.selection_color.css());
			surface.set_line_width(SELECTED_LINE_WIDTH);
		} else {
			surface.set_stroke_style(&config.node_stroke.css());
			surface.set_line_width(LINE_WIDTH);
		}
		surface.stroke();
	}
}

/// Labels big enough to read, or selected, on an opaque plate.
pub fn draw_labels<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	let (vp, config) = (frame.viewport, frame.config);
	surface.set_font(&format!("{}px sans-serif", config.font_px));

	for edge in frame.scene.edges() {
		let (Some(src), Some(tgt)) = (frame.scene.node(edge.source), frame.scene.node(edge.target))
		else {
			continue;
		};
		let selected = frame.selection == Selection::Edge(edge.id);
		let on_screen = (tgt.x - src.x).hypot(tgt.y - src.y) * vp.zoom;
		if edge.label.is_empty() || !(selected || on_screen >= config.label_min_screen_px) {
			continue;
		}
		let (x, y) = vp.world_to_screen((src.x + tgt.x) / 2.0, (src.y + tgt.y) / 2.0);
		draw_label(surface, config, &edge.label, x, y);
	}

	for node in frame.scene.nodes() {
		let selected = frame.selection == Selection::Node(node.id);
		let on_screen = node.shape.half_size() * 2.0 * vp.zoom;
		if node.label.is_empty() || !(selected || on_screen >= config.label_min_screen_px) {
			continue;
		}
		let (x, y) = vp.world_to_screen(node.x, node.y);
		draw_label(surface, config, &node.label, x, y);
	}
}

fn draw_label<S: Surface + ?Sized>(surface: &S, config: &EditorConfig, text: &str, x: f64, y: f64) {
	let width = surface.measure_text(text);
	let height = config.font_px;
	surface.set_fill_style(&config.label_background.css());
	surface.fill_rect(
		x - width / 2.0 - LABEL_PADDING,
		y - height / 2.0 - LABEL_PADDING,
		width + 2.0 * LABEL_PADDING,
		height + 2.0 * LABEL_PADDING,
	);
	surface.set_fill_style(&config.label_color.css());
	surface.fill_text(text, x - width / 2.0, y + height / 3.0);
}
