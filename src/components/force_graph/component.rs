use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use crate::components::canvas::{
	CallbackSlot, context_2d, follow_window_size, init_once, local_point, run_frame_loop,
	size_canvas,
};
use crate::components::diagram::{EditorConfig, Scene};

/// Physics step per animation frame, in seconds.
const TICK: f32 = 0.016;

type Shared = Rc<RefCell<Option<ForceGraphState>>>;

/// Read-only force-directed view of a scene. Drag the background to pan,
/// scroll to zoom, hover to highlight.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<Scene>,
	#[prop(optional)] config: Option<EditorConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared = Rc::new(RefCell::new(None));
	let animate: CallbackSlot = Rc::new(RefCell::new(None));
	let resize_cb: CallbackSlot = Rc::new(RefCell::new(None));
	let config = config.or_else(use_context::<EditorConfig>).unwrap_or_default();

	let state_init = state.clone();
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
		let fresh = init_once(&state_init, || {
			let (w, h) = size_canvas(&canvas, &window, fullscreen, width, height);
			ForceGraphState::new(&data.get_untracked(), config.clone(), w, h)
		});
		if !fresh {
			return;
		}

		if fullscreen {
			let state_resize = state_init.clone();
			follow_window_size(&resize_cb, &window, canvas, move |nw, nh| {
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
		}

		let state_anim = state_init.clone();
		run_frame_loop(&animate, move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(TICK);
				}
				render::render(s, &ctx);
			}
		});
	});

	// each handler gets its own handle on the state
	let with_state = |f: fn(&mut ForceGraphState, f64, f64)| {
		let state = state.clone();
		move |ev: MouseEvent| {
			let Some((x, y)) = local_point(canvas_ref, &ev) else {
				return;
			};
			if let Some(ref mut s) = *state.borrow_mut() {
				f(s, x, y);
			}
		}
	};

	let on_mousedown = with_state(|s, x, y| s.pan_start(x, y));
	let on_mousemove = with_state(|s, x, y| {
		if s.pan.active {
			s.pan_to(x, y);
		} else {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}
	});
	let on_mouseup = with_state(|s, _, _| s.pan_end());
	let on_mouseleave = with_state(|s, _, _| {
		s.pan_end();
		s.set_hover(None);
	});

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let step = s.config.zoom_step;
			let factor = if ev.delta_y() > 0.0 { 1.0 / step } else { step };
			s.transform.zoom_at(factor, x, y);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
