use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading a demo configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level demo configuration.
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) yields the stock demo: a 600x600 window, a textured sphere plus the
/// bundled cube model, and a camera five units back from the origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Walking Simulator".into(),
            width: 600,
            height: 600,
        }
    }
}

/// File locations for everything the scene loads at startup.
///
/// Shader paths are optional; the renderer falls back to its built-in WGSL
/// when they are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub texture: PathBuf,
    pub model: Option<PathBuf>,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("assets/textures/boulder_base_color.png"),
            model: Some(PathBuf::from("assets/models/cube.obj")),
            vertex_shader: None,
            fragment_shader: None,
        }
    }
}

impl AssetPaths {
    /// Resolve relative paths against `base` (usually the config file's directory).
    pub fn resolved_against(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            texture: join(&self.texture),
            model: self.model.as_ref().map(join),
            vertex_shader: self.vertex_shader.as_ref().map(join),
            fragment_shader: self.fragment_shader.as_ref().map(join),
        }
    }
}

/// Procedural sphere added to the scene mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub segments: u32,
    pub color: [f32; 4],
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 8,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub sphere: Option<SphereConfig>,
    /// Translation applied to the OBJ model when it is merged into the scene.
    pub model_offset: Vec3,
    /// Rotation of the whole scene about +Y. Zero keeps it static.
    pub spin_degrees_per_second: f32,
    pub light_direction: Vec3,
    pub clear_color: [f64; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sphere: Some(SphereConfig::default()),
            model_offset: Vec3::new(3.0, 0.0, 0.0),
            spin_degrees_per_second: 0.0,
            light_direction: Vec3::ONE,
            clear_color: [0.0, 0.0, 0.2, 1.0],
        }
    }
}

/// How forward movement follows the view direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    /// Forward follows the full look vector, pitch included.
    #[default]
    Fly,
    /// Forward stays on the horizontal plane.
    Walk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    pub max_pitch_degrees: f32,
    pub mode: MovementMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            move_speed: 6.0,
            mouse_sensitivity: 0.005,
            max_pitch_degrees: 89.0,
            mode: MovementMode::Fly,
        }
    }
}

impl DemoConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load a configuration file. Relative asset paths are resolved against
    /// the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(dir) = path.parent() {
            config.assets = config.assets.resolved_against(dir);
        }
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise return the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
