//! Editor tunables. Everything has a default; hosts may override any subset
//! from JSON.

use std::f64::consts::PI;

use serde::Deserialize;
use thiserror::Error;

use super::scene::{Rgb, Shape};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid editor config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("zoom limits must satisfy 0 < min <= max, got [{min}, {max}]")]
	ZoomLimits { min: f64, max: f64 },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Multiplier applied per wheel notch / zoom button press.
	pub zoom_step: f64,
	/// Edge grab distance in screen pixels.
	pub hit_tolerance_px: f64,
	/// Pointer travel (screen px) below which a press/release is a click.
	pub click_slop_px: f64,
	pub show_grid: bool,
	pub grid_spacing_px: f64,
	/// Labels are drawn once the entity is at least this big on screen.
	pub label_min_screen_px: f64,
	pub font_px: f64,
	pub arrow_length: f64,
	/// Half-angle between arrowhead wings, radians.
	pub arrow_wing_angle: f64,
	pub background: Rgb,
	pub grid_color: Rgb,
	pub edge_color: Rgb,
	pub node_stroke: Rgb,
	pub selection_color: Rgb,
	pub label_background: Rgb,
	pub label_color: Rgb,
	pub default_shape: Shape,
	pub default_color: Rgb,
	/// `log` level name for `init_logging`.
	pub log_level: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.1,
			max_zoom: 10.0,
			zoom_step: 1.1,
			hit_tolerance_px: 10.0,
			click_slop_px: 3.0,
			show_grid: true,
			grid_spacing_px: 20.0,
			label_min_screen_px: 8.0,
			font_px: 12.0,
			arrow_length: 10.0,
			arrow_wing_angle: PI / 7.0,
			background: Rgb(26, 26, 46),
			grid_color: Rgb(42, 42, 66),
			edge_color: Rgb(100, 180, 255),
			node_stroke: Rgb(230, 230, 240),
			selection_color: Rgb(255, 200, 0),
			label_background: Rgb(16, 16, 28),
			label_color: Rgb(255, 255, 255),
			default_shape: Shape::Circle { radius: 25.0 },
			default_color: Rgb(31, 119, 180),
			log_level: "debug".into(),
		}
	}
}

impl EditorConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		if !(config.min_zoom > 0.0 && config.min_zoom <= config.max_zoom) {
			return Err(ConfigError::ZoomLimits {
				min: config.min_zoom,
				max: config.max_zoom,
			});
		}
		Ok(config)
	}

	/// Config from an optional JSON source. A missing source gives the
	/// defaults; a bad one gives the defaults plus the reason it was rejected.
	pub fn from_source(source: Option<&str>) -> (Self, Option<ConfigError>) {
		match source.map(str::trim).filter(|s| !s.is_empty()) {
			None => (Self::default(), None),
			Some(json) => match Self::from_json(json) {
				Ok(config) => (config, None),
				Err(err) => (Self::default(), Some(err)),
			},
		}
	}

	pub fn log_level(&self) -> log::Level {
		self.log_level.parse().unwrap_or(log::Level::Debug)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let c = EditorConfig::from_json(r#"{ "hit_tolerance_px": 6.0, "show_grid": false }"#).unwrap();
		assert_eq!(c.hit_tolerance_px, 6.0);
		assert!(!c.show_grid);
		assert_eq!(c.max_zoom, EditorConfig::default().max_zoom);
	}

	#[test]
	fn shapes_and_colours_deserialize() {
		let c = EditorConfig::from_json(
			r#"{ "default_shape": { "kind": "rect", "width": 60, "height": 30 }, "edge_color": [1, 2, 3] }"#,
		)
		.unwrap();
		assert_eq!(c.default_shape, Shape::Rect { width: 60.0, height: 30.0 });
		assert_eq!(c.edge_color, Rgb(1, 2, 3));
	}

	#[test]
	fn rejects_inverted_zoom_limits() {
		let err = EditorConfig::from_json(r#"{ "min_zoom": 5, "max_zoom": 1 }"#).unwrap_err();
		assert!(matches!(err, ConfigError::ZoomLimits { .. }));
	}

	#[test]
	fn source_falls_back_to_defaults() {
		assert_eq!(EditorConfig::from_source(None).0, EditorConfig::default());
		assert!(EditorConfig::from_source(Some("  \n ")).1.is_none());

		let (c, err) = EditorConfig::from_source(Some(r#"{ "min_zoom": 0 }"#));
		assert_eq!(c, EditorConfig::default());
		assert!(matches!(err, Some(ConfigError::ZoomLimits { .. })));

		let (c, err) = EditorConfig::from_source(Some(r#"{ "log_level": "warn" }"#));
		assert!(err.is_none());
		assert_eq!(c.log_level(), log::Level::Warn);
	}

	#[test]
	fn unknown_log_level_falls_back() {
		let c = EditorConfig {
			log_level: "chatty".into(),
			..EditorConfig::default()
		};
		assert_eq!(c.log_level(), log::Level::Debug);
		assert_eq!(EditorConfig::default().log_level(), log::Level::Debug);
	}
}
