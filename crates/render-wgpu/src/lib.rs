//! wgpu render backend for the walking simulator.
//!
//! Draws the whole scene as one textured, lit mesh in a single render pass.
//!
//! # Invariants
//! - Renderer never mutates the scene or the camera.
//! - Shader, pipeline and texture creation errors are reported, never swallowed by the
//!   device's uncaptured-error handler.
//! - The depth texture always matches the surface size.

mod gpu;
mod shaders;
mod texture;

use walksim_assets::ShaderStage;

pub use gpu::WgpuRenderer;
pub use shaders::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};

/// Errors from building GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{stage} shader '{label}' failed to compile: {message}")]
    ShaderCompile {
        stage: ShaderStage,
        label: String,
        message: String,
    },
    #[error("texture upload failed: {0}")]
    TextureUpload(String),
    #[error("shader program failed to link: {0}")]
    PipelineLink(String),
    #[error("scene mesh is empty")]
    EmptyMesh,
}
