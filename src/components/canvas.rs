//! DOM plumbing shared by the canvas components.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

/// Holder for a JS callback that must outlive the effect that created it.
pub(crate) type CallbackSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

pub(crate) fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
pub(crate) fn local_point(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Fill `slot` with `init()` unless it already holds a value. Returns
/// whether this call did the filling.
pub(crate) fn init_once<T>(slot: &RefCell<Option<T>>, init: impl FnOnce() -> T) -> bool {
	if slot.borrow().is_some() {
		return false;
	}
	let value = init();
	*slot.borrow_mut() = Some(value);
	true
}

/// Size the backing store: the window when fullscreen, otherwise the
/// explicit size or the parent's client box.
pub(crate) fn size_canvas(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let (w, h) = if fullscreen {
		window_size(window).unwrap_or((800.0, 600.0))
	} else {
		let parent = canvas.parent_element();
		(
			width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map_or(800.0, |p| p.client_width() as f64)
			}),
			height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map_or(600.0, |p| p.client_height() as f64)
			}),
		)
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

/// Keep the canvas matched to the window and report each new size.
pub(crate) fn follow_window_size(
	slot: &CallbackSlot,
	window: &Window,
	canvas: HtmlCanvasElement,
	mut resized: impl FnMut(f64, f64) + 'static,
) {
	*slot.borrow_mut() = Some(Closure::new(move || {
		let Some((w, h)) = web_sys::window().as_ref().and_then(window_size) else {
			return;
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		resized(w, h);
	}));
	if let Some(ref cb) = *slot.borrow() {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
}

/// Run `frame` once per animation frame, for as long as `slot` is alive.
pub(crate) fn run_frame_loop(slot: &CallbackSlot, mut frame: impl FnMut() + 'static) {
	let inner = slot.clone();
	*slot.borrow_mut() = Some(Closure::new(move || {
		frame();
		if let (Some(cb), Some(win)) = (inner.borrow().as_ref(), web_sys::window()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let (Some(cb), Some(win)) = (slot.borrow().as_ref(), web_sys::window()) {
		let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn init_once_keeps_the_first_value() {
		let slot = RefCell::new(None);
		let mut runs = 0;
		assert!(init_once(&slot, || {
			runs += 1;
			"first"
		}));
		assert!(!init_once(&slot, || {
			runs += 1;
			"second"
		}));
		assert_eq!(runs, 1);
		assert_eq!(*slot.borrow(), Some("first"));
	}
}
