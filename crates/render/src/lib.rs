//! Renderer-agnostic layer: the scene description, the first-person camera
//! and the [`Renderer`] interface.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate them.
//! - Camera math is backend independent; the GPU backend only consumes matrices.

mod camera;
mod renderer;
mod scene;

pub use camera::FirstPersonCamera;
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Scene, SceneError};

pub fn crate_info() -> &'static str {
    "walksim-render v0.1.0"
}
