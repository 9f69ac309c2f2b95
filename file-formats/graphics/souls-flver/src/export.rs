//! Flattened per-mesh geometry for handing to a renderer or scene host

use glam::{Vec2, Vec3};

use crate::model::Flver;
use crate::triangulate::PRIMITIVE_RESTART;

/// What to take from each mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostMeshOptions {
    /// Texture coordinate set to export
    pub uv_channel: usize,
    /// Face set to triangulate
    pub face_set: usize,
    /// Keep triangles with repeated indices
    pub include_degenerate_faces: bool,
}

/// Geometry of one mesh in a host-friendly shape
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct HostMesh {
    /// Material name, or a generated name when the mesh has no material
    pub name: String,
    /// One position per vertex
    pub positions: Vec<Vec3>,
    /// One texture coordinate per vertex; zero where the vertex has none
    pub uvs: Vec<Vec2>,
    /// Triangles as vertex index triples
    pub triangles: Vec<[u32; 3]>,
}

impl Flver {
    /// Flatten every mesh into positions, texture coordinates and triangles.
    ///
    /// Primitive restarts are honoured only when the mesh has fewer vertices
    /// than [`PRIMITIVE_RESTART`], since otherwise the sentinel is a valid
    /// index. Triangles referring to missing vertices are dropped.
    pub fn host_meshes(&self, options: &HostMeshOptions) -> Vec<HostMesh> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(index, mesh)| {
                let name = mesh
                    .material(&self.materials)
                    .map_or_else(|| format!("mesh_{index}"), |m| m.name.clone());

                let positions: Vec<Vec3> = mesh.vertices.iter().map(|v| v.position).collect();
                let uvs = mesh
                    .vertices
                    .iter()
                    .map(|v| v.uvs.get(options.uv_channel).map_or(Vec2::ZERO, |uv| uv.truncate()))
                    .collect();

                let vertex_count = positions.len();
                let allow_restarts = vertex_count < PRIMITIVE_RESTART as usize;
                let indices = mesh
                    .face_sets
                    .get(options.face_set)
                    .map(|f| f.triangulate(allow_restarts, options.include_degenerate_faces))
                    .unwrap_or_default();

                let mut dropped = 0;
                let triangles = indices
                    .chunks_exact(3)
                    .filter_map(|t| {
                        let triangle = [t[0], t[1], t[2]];
                        if triangle.iter().all(|&i| (i as usize) < vertex_count) {
                            Some(triangle)
                        } else {
                            dropped += 1;
                            None
                        }
                    })
                    .collect();
                if dropped > 0 {
                    log::warn!("Mesh {index} ({name}): dropped {dropped} triangles with out-of-range indices");
                }

                HostMesh {
                    name,
                    positions,
                    uvs,
                    triangles,
                }
            })
            .collect()
    }
}
