//! Interactive node-link diagram editor.

mod component;
pub mod config;
pub mod export;
pub mod hit;
pub mod notify;
pub mod render;
pub mod scene;
pub mod session;
pub mod surface;
pub mod viewport;

pub use component::DiagramEditor;
pub use config::EditorConfig;
pub use scene::{Edge, EdgeId, NewNode, Node, NodeId, Rgb, Scene, SceneError, Shape};
pub use session::{EditorSession, InteractionMode, Selection};
