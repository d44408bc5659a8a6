//! Zoom/pan transform between world space and screen space.

/// `screen = world * zoom + pan`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub zoom: f64,
	pub pan_x: f64,
	pub pan_y: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}

impl Viewport {
	/// Identity transform with the given zoom limits.
	pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
		let (min_zoom, max_zoom) = if min_zoom > 0.0 && min_zoom <= max_zoom {
			(min_zoom, max_zoom)
		} else {
			log::warn!("ignoring zoom limits [{min_zoom}, {max_zoom}]");
			let d = Self::default();
			(d.min_zoom, d.max_zoom)
		};
		Self {
			zoom: 1.0_f64.clamp(min_zoom, max_zoom),
			min_zoom,
			max_zoom,
			..Self::default()
		}
	}

	pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
	}

	/// Multiply the zoom, clamped to the limits. Returns whether it changed.
	pub fn zoom_by(&mut self, factor: f64) -> bool {
		if !factor.is_finite() || factor <= 0.0 {
			return false;
		}
		let k = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
		let changed = k != self.zoom;
		self.zoom = k;
		changed
	}

	/// Zoom keeping the world point under `(sx, sy)` in place.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) -> bool {
		let old = self.zoom;
		if !self.zoom_by(factor) {
			return false;
		}
		let ratio = self.zoom / old;
		self.pan_x = sx - (sx - self.pan_x) * ratio;
		self.pan_y = sy - (sy - self.pan_y) * ratio;
		true
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.pan_x += dx;
			self.pan_y += dy;
		}
	}

	pub fn reset(&mut self) {
		self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
		self.pan_x = 0.0;
		self.pan_y = 0.0;
	}

	/// World-space rectangle `(min_x, min_y, max_x, max_y)` covered by a
	/// `width` x `height` screen.
	pub fn visible_world_bounds(&self, width: f64, height: f64) -> (f64, f64, f64, f64) {
		let (x0, y0) = self.screen_to_world(0.0, 0.0);
		let (x1, y1) = self.screen_to_world(width, height);
		(x0, y0, x1, y1)
	}

	/// Center `bounds` on a `width` x `height` screen, zooming to fit with
	/// `padding` screen pixels on each side.
	pub fn fit_to(&mut self, bounds: (f64, f64, f64, f64), width: f64, height: f64, padding: f64) {
		let (min_x, min_y, max_x, max_y) = bounds;
		let (bw, bh) = (max_x - min_x, max_y - min_y);
		let (aw, ah) = (width - 2.0 * padding, height - 2.0 * padding);
		if bw <= 0.0 || bh <= 0.0 || aw <= 0.0 || ah <= 0.0 {
			return;
		}
		self.zoom = (aw / bw).min(ah / bh).clamp(self.min_zoom, self.max_zoom);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.pan_x = width / 2.0 - cx * self.zoom;
		self.pan_y = height / 2.0 - cy * self.zoom;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		let eps = 1e-9 * (1.0 + b.0.abs().max(b.1.abs()));
		(a.0 - b.0).abs() <= eps && (a.1 - b.1).abs() <= eps
	}

	#[test]
	fn screen_world_round_trip() {
		let points = [(0.0, 0.0), (12.5, -3.25), (-1e4, 7e3), (0.001, 999.9)];
		for zoom in [0.1, 0.37, 1.0, 2.5, 10.0] {
			for (pan_x, pan_y) in [(0.0, 0.0), (400.0, 300.0), (-123.4, 56.7)] {
				let v = Viewport {
					zoom,
					pan_x,
					pan_y,
					..Viewport::default()
				};
				for p in points {
					let (sx, sy) = v.world_to_screen(p.0, p.1);
					assert!(close(v.screen_to_world(sx, sy), p), "{p:?} at {v:?}");
				}
			}
		}
	}

	#[test]
	fn zoom_is_clamped() {
		let mut v = Viewport::with_limits(0.5, 2.0);
		v.zoom_by(10.0);
		assert_eq!(v.zoom, 2.0);
		assert!(!v.zoom_by(1.5));
		v.zoom_by(0.01);
		assert_eq!(v.zoom, 0.5);
	}

	#[test]
	fn bad_factors_are_ignored() {
		let mut v = Viewport::default();
		assert!(!v.zoom_by(0.0));
		assert!(!v.zoom_by(-2.0));
		assert!(!v.zoom_by(f64::NAN));
		assert_eq!(v.zoom, 1.0);
	}

	#[test]
	fn zoom_at_keeps_cursor_anchor() {
		let mut v = Viewport {
			pan_x: 40.0,
			pan_y: -20.0,
			..Viewport::default()
		};
		let before = v.screen_to_world(300.0, 200.0);
		assert!(v.zoom_at(1.1, 300.0, 200.0));
		assert!(close(v.screen_to_world(300.0, 200.0), before));
	}

	#[test]
	fn fit_centers_bounds() {
		let mut v = Viewport::default();
		v.fit_to((-100.0, -50.0, 100.0, 50.0), 800.0, 600.0, 0.0);
		assert_eq!(v.zoom, 4.0);
		assert!(close(v.world_to_screen(0.0, 0.0), (400.0, 300.0)));
	}

	#[test]
	fn invalid_limits_fall_back() {
		let v = Viewport::with_limits(3.0, 1.0);
		assert_eq!((v.min_zoom, v.max_zoom), (0.1, 10.0));
	}
}
