//! Shared configuration for the walking simulator.
//!
//! Every binary resolves one [`DemoConfig`] at startup and hands the relevant
//! sections to the asset loader, the camera and the renderer.

mod config;

pub use config::{
    AssetPaths, CameraConfig, ConfigError, DemoConfig, MovementMode, SceneConfig, SphereConfig,
    WindowConfig,
};

pub fn crate_info() -> &'static str {
    "walksim-common v0.1.0"
}
