//! JSON scene dump/import and raster snapshots.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::render;
use super::scene::{Edge, Node, Scene, SceneError};
use super::session::EditorSession;
use super::surface::Surface;

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("malformed scene JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Scene(#[from] SceneError),

	#[error("snapshot failed: {0}")]
	Snapshot(String),
}

/// On-disk layout: `{ "nodes": [...], "edges": [...] }`.
#[derive(Serialize, Deserialize)]
struct SceneDocument {
	nodes: Vec<Node>,
	#[serde(default)]
	edges: Vec<Edge>,
}

pub fn export_scene(scene: &Scene) -> Result<String, ExportError> {
	let doc = SceneDocument {
		nodes: scene.nodes().cloned().collect(),
		edges: scene.edges().cloned().collect(),
	};
	Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse and fully revalidate. Any dangling reference rejects the whole file.
pub fn import_scene(json: &str) -> Result<Scene, ExportError> {
	let doc: SceneDocument = serde_json::from_str(json)?;
	Ok(Scene::from_parts(doc.nodes, doc.edges)?)
}

/// Uncompressed RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
	pub width: u32,
	pub height: u32,
	pub rgba: Vec<u8>,
}

/// Environment capability that reads back what was drawn.
pub trait SnapshotSource {
	fn capture_snapshot(&self) -> Result<RasterImage, ExportError>;
}

impl SnapshotSource for HtmlCanvasElement {
	fn capture_snapshot(&self) -> Result<RasterImage, ExportError> {
		let ctx: CanvasRenderingContext2d = self
			.get_context("2d")
			.map_err(|e| ExportError::Snapshot(format!("{e:?}")))?
			.ok_or_else(|| ExportError::Snapshot("no 2d context".into()))?
			.dyn_into()
			.map_err(|_| ExportError::Snapshot("context is not 2d".into()))?;
		let (width, height) = (self.width(), self.height());
		let data = ctx
			.get_image_data(0.0, 0.0, width as f64, height as f64)
			.map_err(|e| ExportError::Snapshot(format!("{e:?}")))?;
		Ok(RasterImage {
			width,
			height,
			rgba: data.data().0,
		})
	}
}

/// Paint the current frame onto `surface`, then snapshot it.
pub fn export_raster<S, C>(
	session: &EditorSession,
	surface: &S,
	source: &C,
	width: f64,
	height: f64,
) -> Result<RasterImage, ExportError>
where
	S: Surface + ?Sized,
	C: SnapshotSource + ?Sized,
{
	render::render(surface, session, width, height);
	let image = source.capture_snapshot()?;
	log::info!("exported {}x{} raster", image.width, image.height);
	Ok(image)
}
