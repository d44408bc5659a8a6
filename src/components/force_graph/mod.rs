//! Read-only force-directed view over a diagram scene.

mod component;
pub mod render;
pub mod state;

pub use component::ForceGraphCanvas;
pub use state::{CategoryPalette, ForceGraphState};
