use crate::AssetError;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};
use std::path::Path;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// Counts reported after an OBJ import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjSummary {
    pub models: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// Indexed triangle list. Shapes are appended, so one mesh can hold the
/// whole scene and be drawn with a single call.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Shift every vertex from `first_vertex` on by `offset`.
    pub fn translate_from(&mut self, first_vertex: usize, offset: Vec3) {
        for v in self.vertices.iter_mut().skip(first_vertex) {
            v.position = (Vec3::from(v.position) + offset).to_array();
        }
    }

    /// Append a UV sphere centred on the origin.
    ///
    /// `segments` is the number of stacks from pole to pole; twice as many
    /// slices go around the equator. The seam column is duplicated so UVs
    /// wrap cleanly.
    pub fn add_sphere(
        &mut self,
        radius: f32,
        segments: u32,
        color: [f32; 4],
    ) -> Result<(), AssetError> {
        if segments < 2 || radius.is_nan() || radius <= 0.0 {
            return Err(AssetError::InvalidSphere { radius, segments });
        }

        let stacks = segments;
        let slices = segments * 2;
        let base = self.vertices.len() as u32;

        for i in 0..=stacks {
            let v = i as f32 / stacks as f32;
            let theta = v * PI;
            for j in 0..=slices {
                let u = j as f32 / slices as f32;
                let phi = u * TAU;
                let normal = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                );
                self.vertices.push(Vertex {
                    position: (normal * radius).to_array(),
                    color,
                    uv: [u, v],
                    normal: normal.to_array(),
                });
            }
        }

        let row = slices + 1;
        for i in 0..stacks {
            for j in 0..slices {
                let a = base + i * row + j;
                let b = a + row;
                let c = b + 1;
                let d = a + 1;
                // Skip the triangle that collapses onto a pole.
                if i != 0 {
                    self.indices.extend_from_slice(&[a, d, c]);
                }
                if i != stacks - 1 {
                    self.indices.extend_from_slice(&[a, c, b]);
                }
            }
        }

        tracing::debug!(
            "added sphere: radius={radius}, segments={segments}, vertices={}",
            (stacks + 1) * row
        );
        Ok(())
    }

    /// Append every model of a Wavefront OBJ file.
    ///
    /// Faces are triangulated. Vertex colors are white, texture V is flipped
    /// to a top-left origin, and meshes without normals get smooth normals
    /// computed from their faces. Missing material libraries are ignored.
    pub fn load_obj(&mut self, path: impl AsRef<Path>) -> Result<ObjSummary, AssetError> {
        let path = path.as_ref();
        let (models, materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| AssetError::Obj {
                path: path.to_path_buf(),
                source,
            })?;
        if let Err(e) = materials {
            tracing::warn!("ignoring materials for {}: {e}", path.display());
        }

        let mut summary = ObjSummary {
            models: models.len(),
            ..ObjSummary::default()
        };

        for model in &models {
            let mesh = &model.mesh;
            let count = mesh.positions.len() / 3;
            let base = self.vertices.len() as u32;
            let has_uv = mesh.texcoords.len() >= count * 2;
            let has_normals = mesh.normals.len() >= count * 3;

            for i in 0..count {
                let uv = if has_uv {
                    [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                };
                let normal = if has_normals {
                    [mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2]]
                } else {
                    [0.0; 3]
                };
                self.vertices.push(Vertex {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    color: [1.0, 1.0, 1.0, 1.0],
                    uv,
                    normal,
                });
            }

            let start = self.indices.len();
            self.indices.extend(mesh.indices.iter().map(|i| base + i));
            if !has_normals {
                self.compute_smooth_normals(start);
            }

            tracing::debug!(
                "loaded OBJ model '{}': {count} vertices, {} triangles",
                model.name,
                mesh.indices.len() / 3
            );
            summary.vertices += count;
            summary.triangles += mesh.indices.len() / 3;
        }

        tracing::info!(
            "loaded {}: {} models, {} vertices, {} triangles",
            path.display(),
            summary.models,
            summary.vertices,
            summary.triangles
        );
        Ok(summary)
    }

    /// Area-weighted vertex normals for the triangles from `first_index` on.
    fn compute_smooth_normals(&mut self, first_index: usize) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices[first_index..].chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        for tri in self.indices[first_index..].chunks_exact(3) {
            for &i in tri {
                let i = i as usize;
                self.vertices[i].normal = sums[i].normalize_or_zero().to_array();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn write_obj(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.obj"), contents).unwrap();
        dir
    }

    #[test]
    fn sphere_vertex_and_index_counts() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(1.0, 8, WHITE).unwrap();
        // 9 rings of 17 vertices; 8 stacks x 16 slices quads minus pole halves.
        assert_eq!(mesh.vertices.len(), 9 * 17);
        assert_eq!(mesh.triangle_count(), 2 * 8 * 16 - 2 * 16);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(2.5, 6, WHITE).unwrap();
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.length() - 2.5).abs() < 1e-4);
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(p.normalize().dot(n) > 0.999);
        }
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(1.0, 8, WHITE).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let a = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from(mesh.vertices[tri[2] as usize].position);
            let normal = (b - a).cross(c - a);
            assert!(normal.length() > 1e-6, "degenerate triangle");
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle winds inward");
        }
    }

    #[test]
    fn sphere_uvs_in_unit_range() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(1.0, 4, WHITE).unwrap();
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
            assert_eq!(v.color, WHITE);
        }
    }

    #[test]
    fn invalid_sphere_rejected() {
        let mut mesh = Mesh::new();
        assert!(matches!(
            mesh.add_sphere(1.0, 1, WHITE),
            Err(AssetError::InvalidSphere { .. })
        ));
        assert!(matches!(
            mesh.add_sphere(0.0, 8, WHITE),
            Err(AssetError::InvalidSphere { .. })
        ));
        assert!(mesh.is_empty());
    }

    #[test]
    fn load_obj_with_uvs_and_normals() {
        let dir = write_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n",
        );
        let mut mesh = Mesh::new();
        let summary = mesh.load_obj(dir.path().join("model.obj")).unwrap();

        assert_eq!(summary.models, 1);
        assert_eq!(summary.vertices, 3);
        assert_eq!(summary.triangles, 1);
        assert_eq!(mesh.indices.len(), 3);
        // V is flipped to a top-left origin.
        let first = mesh.vertices[mesh.indices[0] as usize];
        assert_eq!(first.uv, [0.0, 1.0]);
        assert_eq!(first.normal, [0.0, 0.0, 1.0]);
        assert_eq!(first.color, WHITE);
    }

    #[test]
    fn load_obj_quad_is_triangulated_with_computed_normals() {
        let dir = write_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let mut mesh = Mesh::new();
        let summary = mesh.load_obj(dir.path().join("model.obj")).unwrap();

        assert_eq!(summary.triangles, 2);
        for v in &mesh.vertices {
            assert_eq!(v.uv, [0.0, 0.0]);
            assert!((Vec3::from(v.normal) - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn load_obj_appends_after_existing_geometry() {
        let dir = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut mesh = Mesh::new();
        mesh.add_sphere(1.0, 4, WHITE).unwrap();
        let before = mesh.vertices.len() as u32;
        mesh.load_obj(dir.path().join("model.obj")).unwrap();

        let tail = &mesh.indices[mesh.indices.len() - 3..];
        assert!(tail.iter().all(|&i| i >= before));
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn load_obj_tolerates_missing_material_library() {
        let dir = write_obj("mtllib missing.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut mesh = Mesh::new();
        assert!(mesh.load_obj(dir.path().join("model.obj")).is_ok());
    }

    #[test]
    fn load_obj_missing_file() {
        let mut mesh = Mesh::new();
        let err = mesh.load_obj("/no/such/model.obj").unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }));
    }

    #[test]
    fn translate_from_leaves_earlier_vertices() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(1.0, 2, WHITE).unwrap();
        let split = mesh.vertices.len();
        mesh.add_sphere(1.0, 2, WHITE).unwrap();
        mesh.translate_from(split, Vec3::new(0.0, 10.0, 0.0));

        assert!(mesh.vertices[..split].iter().all(|v| v.position[1] <= 1.0));
        assert!(mesh.vertices[split..].iter().all(|v| v.position[1] >= 9.0));
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
        mesh.add_sphere(2.0, 4, WHITE).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!((min.y + 2.0).abs() < 1e-5);
        assert!((max.y - 2.0).abs() < 1e-5);
    }
}
