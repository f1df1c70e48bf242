//! CPU-side assets for the walking simulator.
//!
//! Everything here is plain data: meshes are vertex/index vectors, textures are
//! decoded RGBA pixels, shaders are WGSL text. GPU upload lives in the render
//! backend, which consumes these types and never touches file paths itself.

mod mesh;
mod shader;
mod texture;

use std::path::PathBuf;

pub use mesh::{Mesh, ObjSummary, Vertex};
pub use shader::{ShaderSource, ShaderStage};
pub use texture::{SourceFormat, TextureImage};

/// Errors from asset loading and generation.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("shader file not found: {path}")]
    ShaderNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported pixel format in {path}: {found} (expected RGB8 or RGBA8)")]
    UnsupportedPixelFormat { path: PathBuf, found: String },
    #[error("invalid sphere: radius {radius}, segments {segments}")]
    InvalidSphere { radius: f32, segments: u32 },
}

pub fn crate_info() -> &'static str {
    "walksim-assets v0.1.0"
}
