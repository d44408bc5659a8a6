use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::config::EditorConfig;
use super::export::{export_raster, export_scene, import_scene};
use super::notify::{LogNotifier, Notifier};
use super::render;
use super::scene::{Scene, Shape};
use super::session::{EditorSession, InteractionMode, PendingEdge, PendingNode};
use crate::components::canvas::{
	CallbackSlot, context_2d, follow_window_size, init_once, local_point, run_frame_loop,
	size_canvas,
};

struct EditorCanvas {
	session: EditorSession,
	width: f64,
	height: f64,
}

type Shared = Rc<RefCell<Option<EditorCanvas>>>;

/// Routes editor messages to the log and a status line.
#[derive(Clone, Copy)]
struct StatusNotifier(WriteSignal<String>);

impl Notifier for StatusNotifier {
	fn notify_error(&self, message: &str) {
		LogNotifier.notify_error(message);
		self.0.set(format!("Error: {message}"));
	}

	fn notify_info(&self, message: &str) {
		LogNotifier.notify_info(message);
		self.0.set(message.to_string());
	}
}

/// Run `f` against the live session and publish the resulting mode.
fn command<F>(
	state: &Shared,
	mode: WriteSignal<InteractionMode>,
	f: F,
) -> impl Fn(MouseEvent) + 'static + use<F>
where
	F: Fn(&mut EditorCanvas) + 'static,
{
	let state = state.clone();
	move |_| {
		if let Some(ref mut c) = *state.borrow_mut() {
			f(c);
			mode.set(c.session.mode());
		}
	}
}

#[component]
pub fn DiagramEditor(
	#[prop(into)] scene: Signal<Scene>,
	#[prop(optional)] config: Option<EditorConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared = Rc::new(RefCell::new(None));
	let animate: CallbackSlot = Rc::new(RefCell::new(None));
	let resize_cb: CallbackSlot = Rc::new(RefCell::new(None));
	let state_init = state.clone();

	let (mode, set_mode) = signal(InteractionMode::Select);
	let (status, set_status) = signal(String::new());
	let (scene_json, set_scene_json) = signal(String::new());
	let (node_label, set_node_label) = signal(String::new());
	let (edge_label, set_edge_label) = signal(String::new());
	let notifier = StatusNotifier(set_status);
	let config = config.or_else(use_context::<EditorConfig>).unwrap_or_default();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window");
			return;
		};

		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};
		// later scene changes must not rebuild the session or restart the loops
		let fresh = init_once(&state_init, || {
			let (w, h) = size_canvas(&canvas, &window, fullscreen, width, height);
			let mut session = EditorSession::new(config.clone());
			session.load_scene(scene.get_untracked());
			session.fit_to_scene(w, h);
			EditorCanvas {
				session,
				width: w,
				height: h,
			}
		});
		if !fresh {
			return;
		}

		if fullscreen {
			let state_resize = state_init.clone();
			follow_window_size(&resize_cb, &window, canvas, move |nw, nh| {
				if let Some(ref mut c) = *state_resize.borrow_mut() {
					c.width = nw;
					c.height = nh;
					c.session.mark_dirty();
				}
			});
		}

		// one paint per animation frame, only when something changed
		let state_anim = state_init.clone();
		run_frame_loop(&animate, move || {
			if let Some(ref mut c) = *state_anim.borrow_mut() {
				if c.session.take_dirty() {
					render::render(&ctx, &c.session, c.width, c.height);
				}
			}
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *state_md.borrow_mut() {
			c.session.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *state_mm.borrow_mut() {
			c.session.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *state_mu.borrow_mut() {
			c.session.pointer_up(x, y, &notifier);
			set_mode.set(c.session.mode());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *state_ml.borrow_mut() {
			c.session.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *state_wh.borrow_mut() {
			let step = c.session.config().zoom_step;
			let factor = if ev.delta_y() > 0.0 { 1.0 / step } else { step };
			c.session.zoom_at(factor, x, y);
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut c) = *state_kd.borrow_mut() {
			let step = c.session.config().zoom_step;
			match ev.key().as_str() {
				"Delete" | "Backspace" => c.session.delete_selected(&notifier),
				"Escape" => c.session.cancel(),
				"c" => c.session.connect(),
				"+" | "=" => c.session.zoom_by(step),
				"-" => c.session.zoom_by(1.0 / step),
				_ => return,
			}
			ev.prevent_default();
			set_mode.set(c.session.mode());
		}
	};

	let on_node_label = {
		let state = state.clone();
		move |ev: Event| {
			let label = event_target_value(&ev);
			set_node_label.set(label.clone());
			if let Some(ref mut c) = *state.borrow_mut() {
				let pending = PendingNode {
					label,
					..c.session.pending_node().clone()
				};
				c.session.set_pending_node(pending);
			}
		}
	};

	let on_edge_label = {
		let state = state.clone();
		move |ev: Event| {
			let label = event_target_value(&ev);
			set_edge_label.set(label.clone());
			if let Some(ref mut c) = *state.borrow_mut() {
				let directed = c.session.pending_edge().directed;
				c.session.set_pending_edge(PendingEdge { label, directed });
			}
		}
	};

	let rename = command(&state, set_mode, move |c| {
		c.session.rename_selected(&node_label.get_untracked(), &notifier)
	});

	let toggle_shape = command(&state, set_mode, |c| {
		let mut pending = c.session.pending_node().clone();
		pending.shape = match pending.shape {
			Shape::Circle { radius } => Shape::Rect {
				width: radius * 2.4,
				height: radius * 1.4,
			},
			Shape::Rect { width, .. } => Shape::Circle {
				radius: width / 2.4,
			},
		};
		c.session.set_pending_node(pending);
	});

	let toggle_directed = command(&state, set_mode, |c| {
		let mut pending = c.session.pending_edge().clone();
		pending.directed = !pending.directed;
		c.session.set_pending_edge(pending);
	});

	let do_export_json = command(&state, set_mode, move |c| match export_scene(c.session.scene()) {
		Ok(json) => {
			set_scene_json.set(json);
			notifier.notify_info("Scene exported");
		}
		Err(err) => notifier.notify_error(&err.to_string()),
	});

	let do_import_json = command(&state, set_mode, move |c| {
		match import_scene(&scene_json.get_untracked()) {
			Ok(scene) => {
				c.session.load_scene(scene);
				c.session.fit_to_scene(c.width, c.height);
				notifier.notify_info("Scene imported");
			}
			Err(err) => notifier.notify_error(&err.to_string()),
		}
	});

	let do_export_raster = command(&state, set_mode, move |c| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};
		match export_raster(&c.session, &ctx, &canvas, c.width, c.height) {
			Ok(image) => notifier.notify_info(&format!(
				"Captured {}x{} snapshot ({} bytes)",
				image.width,
				image.height,
				image.rgba.len()
			)),
			Err(err) => notifier.notify_error(&err.to_string()),
		}
	});

	view! {
		<div class="diagram-editor">
			<div class="diagram-toolbar">
				<button
					class:active=move || mode.get() == InteractionMode::Select
					on:click=command(&state, set_mode, |c| c.session.set_mode(InteractionMode::Select))
				>
					"Select"
				</button>
				<button
					class:active=move || mode.get() == InteractionMode::AddNode
					on:click=command(&state, set_mode, |c| c.session.set_mode(InteractionMode::AddNode))
				>
					"Add node"
				</button>
				<button
					class:active=move || {
						matches!(
							mode.get(),
							InteractionMode::AwaitingEdgeSource | InteractionMode::AwaitingEdgeTarget
						)
					}
					on:click=command(&state, set_mode, |c| c.session.connect())
				>
					"Connect"
				</button>
				<button
					class:active=move || mode.get() == InteractionMode::Delete
					on:click=command(&state, set_mode, |c| c.session.set_mode(InteractionMode::Delete))
				>
					"Delete"
				</button>
				<input
					type="text"
					placeholder="Node label"
					prop:value=move || node_label.get()
					on:input=on_node_label
				/>
				<button on:click=rename>"Rename"</button>
				<button on:click=toggle_shape>"Circle / Rect"</button>
				<input
					type="text"
					placeholder="Edge label"
					prop:value=move || edge_label.get()
					on:input=on_edge_label
				/>
				<button on:click=toggle_directed>"Directed"</button>
				<button on:click=command(&state, set_mode, |c| {
					let step = c.session.config().zoom_step;
					c.session.zoom_by(step)
				})>"+"</button>
				<button on:click=command(&state, set_mode, |c| {
					let step = c.session.config().zoom_step;
					c.session.zoom_by(1.0 / step)
				})>"-"</button>
				<button on:click=command(&state, set_mode, |c| c.session.fit_to_scene(c.width, c.height))>
					"Fit"
				</button>
				<button on:click=command(&state, set_mode, |c| c.session.reset())>"Reset"</button>
				<button on:click=do_export_json>"Export JSON"</button>
				<button on:click=do_import_json>"Import JSON"</button>
				<button on:click=do_export_raster>"Snapshot"</button>
				<span class="diagram-mode">{move || format!("{:?}", mode.get())}</span>
				<span class="diagram-status">{move || status.get()}</span>
			</div>
			<canvas
				node_ref=canvas_ref
				class="diagram-canvas"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; cursor: crosshair;"
			/>
			<textarea
				class="diagram-json"
				prop:value=move || scene_json.get()
				on:input=move |ev| set_scene_json.set(event_target_value(&ev))
			/>
		</div>
	}
}
