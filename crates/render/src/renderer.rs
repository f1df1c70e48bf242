use crate::camera::FirstPersonCamera;
use crate::scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and the camera and produces output. It never
/// mutates either.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &Scene, camera: &FirstPersonCamera) -> Self::Output;
}

/// Text renderer describing what a frame would draw.
///
/// Used by the CLI to inspect a scene without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &FirstPersonCamera) -> String {
        let mut out = String::new();
        let p = camera.position;
        let look = camera.look();
        let _ = writeln!(out, "=== Frame ===");
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) look=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} mode={:?}",
            p.x,
            p.y,
            p.z,
            look.x,
            look.y,
            look.z,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
            camera.mode
        );
        let _ = writeln!(
            out,
            "Mesh: {} vertices, {} triangles",
            scene.mesh.vertices.len(),
            scene.mesh.triangle_count()
        );
        if let Some((min, max)) = scene.mesh.bounds() {
            let _ = writeln!(
                out,
                "Bounds: ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
        }
        let _ = writeln!(
            out,
            "Texture: {}x{} {:?}",
            scene.texture.width, scene.texture.height, scene.texture.source_format
        );
        let shader_label = |s: &Option<walksim_assets::ShaderSource>| {
            s.as_ref()
                .map(|s| s.label.clone())
                .unwrap_or_else(|| "built-in".into())
        };
        let _ = writeln!(
            out,
            "Shaders: vertex={} fragment={}",
            shader_label(&scene.vertex_shader),
            shader_label(&scene.fragment_shader)
        );

        let mvp = camera.model_view_projection(scene.model);
        let _ = writeln!(out, "MVP:");
        for r in 0..4 {
            let row = mvp.row(r);
            let _ = writeln!(
                out,
                "  [{:8.3} {:8.3} {:8.3} {:8.3}]",
                row.x, row.y, row.z, row.w
            );
        }

        let clip = mvp * scene.model.w_axis;
        if clip.w > 0.0 {
            let ndc = clip.truncate() / clip.w;
            let _ = writeln!(
                out,
                "Model origin: ndc=({:.3}, {:.3}, {:.3})",
                ndc.x, ndc.y, ndc.z
            );
        } else {
            let _ = writeln!(out, "Model origin: behind camera");
        }

        out
    }
}
