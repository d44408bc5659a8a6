//! The slice of the 2D canvas API the painters use, so they can draw onto a
//! real `<canvas>` or anything else that records strokes.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Immediate-mode 2D drawing target in screen pixels.
pub trait Surface {
	fn set_fill_style(&self, css: &str);
	fn set_stroke_style(&self, css: &str);
	fn set_line_width(&self, width: f64);
	/// Empty `pattern` means solid.
	fn set_line_dash(&self, pattern: &[f64]);
	fn set_font(&self, font: &str);
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn close_path(&self);
	fn arc(&self, x: f64, y: f64, radius: f64);
	fn rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn fill(&self);
	fn stroke(&self);
	fn fill_text(&self, text: &str, x: f64, y: f64);
	/// Rendered width of `text` in the current font.
	fn measure_text(&self, text: &str) -> f64;
}

impl Surface for CanvasRenderingContext2d {
	fn set_fill_style(&self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn set_stroke_style(&self, css: &str) {
		self.set_stroke_style_str(css);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_line_dash(&self, pattern: &[f64]) {
		let segments: js_sys::Array = pattern.iter().map(|&v| JsValue::from_f64(v)).collect();
		let _ = CanvasRenderingContext2d::set_line_dash(self, &segments);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn arc(&self, x: f64, y: f64, radius: f64) {
		let _ = CanvasRenderingContext2d::arc(self, x, y, radius, 0.0, 2.0 * std::f64::consts::PI);
	}

	fn rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::rect(self, x, y, w, h);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn measure_text(&self, text: &str) -> f64 {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| m.width())
			.unwrap_or(0.0)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::RefCell;

	use super::Surface;

	/// One recorded drawing call.
	#[derive(Clone, Debug, PartialEq)]
	pub(crate) enum Op {
		Fill(String),
		Stroke(String),
		LineWidth(f64),
		Dash(Vec<f64>),
		Font(String),
		FillRect(f64, f64, f64, f64),
		Begin,
		Move(f64, f64),
		Line(f64, f64),
		Close,
		Arc(f64, f64, f64),
		Rect(f64, f64, f64, f64),
		DoFill,
		DoStroke,
		Text(String, f64, f64),
	}

	/// Surface that records calls. Text is 7px per char.
	#[derive(Default)]
	pub(crate) struct Recording(pub RefCell<Vec<Op>>);

	impl Recording {
		pub(crate) fn ops(&self) -> Vec<Op> {
			self.0.borrow().clone()
		}

		pub(crate) fn texts(&self) -> Vec<String> {
			self.ops()
				.into_iter()
				.filter_map(|op| match op {
					Op::Text(t, _, _) => Some(t),
					_ => None,
				})
				.collect()
		}

		fn push(&self, op: Op) {
			self.0.borrow_mut().push(op);
		}
	}

	impl Surface for Recording {
		fn set_fill_style(&self, css: &str) {
			self.push(Op::Fill(css.into()));
		}
		fn set_stroke_style(&self, css: &str) {
			self.push(Op::Stroke(css.into()));
		}
		fn set_line_width(&self, width: f64) {
			self.push(Op::LineWidth(width));
		}
		fn set_line_dash(&self, pattern: &[f64]) {
			self.push(Op::Dash(pattern.to_vec()));
		}
		fn set_font(&self, font: &str) {
			self.push(Op::Font(font.into()));
		}
		fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
			self.push(Op::FillRect(x, y, w, h));
		}
		fn begin_path(&self) {
			self.push(Op::Begin);
		}
		fn move_to(&self, x: f64, y: f64) {
			self.push(Op::Move(x, y));
		}
		fn line_to(&self, x: f64, y: f64) {
			self.push(Op::Line(x, y));
		}
		fn close_path(&self) {
			self.push(Op::Close);
		}
		fn arc(&self, x: f64, y: f64, radius: f64) {
			self.push(Op::Arc(x, y, radius));
		}
		fn rect(&self, x: f64, y: f64, w: f64, h: f64) {
			self.push(Op::Rect(x, y, w, h));
		}
		fn fill(&self) {
			self.push(Op::DoFill);
		}
		fn stroke(&self) {
			self.push(Op::DoStroke);
		}
		fn fill_text(&self, text: &str, x: f64, y: f64) {
			self.push(Op::Text(text.into(), x, y));
		}
		fn measure_text(&self, text: &str) -> f64 {
			7.0 * text.chars().count() as f64
		}
	}
}
