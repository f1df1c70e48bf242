use glam::{Mat4, Vec3};
use walksim_assets::{AssetError, Mesh, ShaderSource, ShaderStage, TextureImage};
use walksim_common::DemoConfig;

/// Errors from assembling a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("scene has no geometry: enable the sphere or configure a model")]
    Empty,
}

/// Everything one frame needs, loaded from disk and ready for upload.
///
/// The whole scene is a single mesh drawn with one texture. Shader sources
/// are `None` when the renderer should use its built-in WGSL.
#[derive(Debug, Clone)]
pub struct Scene {
    pub mesh: Mesh,
    pub texture: TextureImage,
    pub vertex_shader: Option<ShaderSource>,
    pub fragment_shader: Option<ShaderSource>,
    pub model: Mat4,
    pub spin_radians_per_second: f32,
    pub light_direction: Vec3,
    pub clear_color: [f64; 4],
}

impl Scene {
    /// Load the texture, geometry and shaders named by `config`.
    ///
    /// A missing texture, model or shader is an error; the demo has nothing
    /// sensible to fall back to.
    pub fn load(config: &DemoConfig) -> Result<Self, SceneError> {
        let assets = &config.assets;
        let texture = TextureImage::load(&assets.texture)?;
        let mesh = Self::build_mesh(config)?;

        let vertex_shader = assets
            .vertex_shader
            .as_ref()
            .map(|p| ShaderSource::load(ShaderStage::Vertex, p))
            .transpose()?;
        let fragment_shader = assets
            .fragment_shader
            .as_ref()
            .map(|p| ShaderSource::load(ShaderStage::Fragment, p))
            .transpose()?;

        tracing::info!(
            "scene loaded: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            mesh,
            texture,
            vertex_shader,
            fragment_shader,
            model: Mat4::IDENTITY,
            spin_radians_per_second: config.scene.spin_degrees_per_second.to_radians(),
            light_direction: config.scene.light_direction,
            clear_color: config.scene.clear_color,
        })
    }

    /// Model matrix `seconds` after startup.
    pub fn model_at(&self, seconds: f32) -> Mat4 {
        self.model * Mat4::from_rotation_y(self.spin_radians_per_second * seconds)
    }

    /// Geometry only: the configured sphere followed by the offset OBJ model.
    pub fn build_mesh(config: &DemoConfig) -> Result<Mesh, SceneError> {
        let mut mesh = Mesh::new();
        if let Some(sphere) = &config.scene.sphere {
            mesh.add_sphere(sphere.radius, sphere.segments, sphere.color)?;
        }
        if let Some(model) = &config.assets.model {
            let first = mesh.vertices.len();
            mesh.load_obj(model)?;
            mesh.translate_from(first, config.scene.model_offset);
        }
        if mesh.is_empty() {
            return Err(SceneError::Empty);
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(dir: &Path) -> DemoConfig {
        let texture = dir.join("tex.png");
        image::RgbImage::new(2, 2).save(&texture).unwrap();
        let model = dir.join("tri.obj");
        std::fs::write(&model, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut config = DemoConfig::default();
        config.assets.texture = texture;
        config.assets.model = Some(model);
        config
    }

    #[test]
    fn load_combines_sphere_and_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let scene = Scene::load(&config).unwrap();
        let mut sphere_only = Mesh::new();
        sphere_only.add_sphere(1.0, 8, [1.0; 4]).unwrap();
        assert_eq!(
            scene.mesh.triangle_count(),
            sphere_only.triangle_count() + 1
        );
        assert!(scene.vertex_shader.is_none());
        assert_eq!(scene.model, Mat4::IDENTITY);
        assert_eq!(scene.light_direction, Vec3::ONE);
    }

    #[test]
    fn configured_shaders_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        let vs = dir.path().join("vs.wgsl");
        std::fs::write(&vs, "// vertex").unwrap();
        config.assets.vertex_shader = Some(vs);

        let scene = Scene::load(&config).unwrap();
        assert_eq!(scene.vertex_shader.unwrap().code, "// vertex");
        assert!(scene.fragment_shader.is_none());
    }

    #[test]
    fn missing_shader_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.assets.fragment_shader = Some(dir.path().join("nope.wgsl"));
        let err = Scene::load(&config).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Asset(AssetError::ShaderNotFound { .. })
        ));
    }

    #[test]
    fn missing_texture_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.assets.texture = dir.path().join("missing.png");
        assert!(matches!(
            Scene::load(&config),
            Err(SceneError::Asset(AssetError::Image { .. }))
        ));
    }

    #[test]
    fn empty_scene_is_rejected() {
        let mut config = DemoConfig::default();
        config.scene.sphere = None;
        config.assets.model = None;
        assert!(matches!(
            Scene::build_mesh(&config),
            Err(SceneError::Empty)
        ));
    }

    #[test]
    fn model_offset_moves_only_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.scene.sphere = None;
        config.scene.model_offset = Vec3::new(0.0, -2.0, 0.0);
        let mesh = Scene::build_mesh(&config).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn spin_rotates_model_over_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.scene.spin_degrees_per_second = 90.0;
        let scene = Scene::load(&config).unwrap();
        assert_eq!(scene.model_at(0.0), Mat4::IDENTITY);
        let turned = scene.model_at(1.0).transform_vector3(Vec3::X);
        assert!((turned - Vec3::NEG_Z).length() < 1e-5);
    }
}
