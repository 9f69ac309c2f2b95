//! Meshes and the distribution of face sets and vertex buffers to them

use std::collections::HashSet;

use glam::Vec3;
use souls_data::BinaryCursor;

use crate::error::{FlverError, Result, to_usize};
use crate::face_set::FaceSet;
use crate::header::{FlverHeader, VERSION_EXTENSION};
use crate::layout::{BufferLayout, LayoutSemantic};
use crate::material::Material;
use crate::pool::ClaimPool;
use crate::vertex::Vertex;
use crate::vertex_buffer::VertexBuffer;

/// Bounds stored alongside a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct MeshBoundingBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
    /// Unknown third vector of newer versions
    pub unk: Option<Vec3>,
}

impl MeshBoundingBox {
    fn read(cursor: &mut BinaryCursor<'_>, version: i32) -> Result<Self> {
        let min = cursor.read_vec3()?;
        let max = cursor.read_vec3()?;
        let unk = if version >= VERSION_EXTENSION {
            Some(cursor.read_vec3()?)
        } else {
            None
        };
        Ok(Self { min, max, unk })
    }
}

/// Room to reserve in each vertex for repeated attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexCapacity {
    /// Texture coordinate sets
    pub uvs: usize,
    /// Tangents
    pub tangents: usize,
    /// Colours
    pub colors: usize,
}

impl VertexCapacity {
    /// Count the repeated semantics over every layout of the model
    pub fn of(layouts: &[BufferLayout]) -> Self {
        layouts.iter().fold(Self::default(), |acc, layout| Self {
            uvs: acc.uvs + layout.count(LayoutSemantic::Uv),
            tangents: acc.tangents + layout.count(LayoutSemantic::Tangent),
            colors: acc.colors + layout.count(LayoutSemantic::VertexColor),
        })
    }
}

/// A piece of geometry drawn with one material
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Mesh {
    /// Whether the mesh is skinned; 0 or 1
    pub dynamic: u8,
    /// Index into [`crate::Flver::materials`]
    pub material_index: i32,
    /// Bone used by vertices without skinning
    pub default_bone_index: i32,
    /// Model bones referenced by vertex bone indices
    pub bone_indices: Vec<i32>,
    /// Optional bounds
    pub bounding_box: Option<MeshBoundingBox>,
    /// Index lists, one per detail level
    pub face_sets: Vec<FaceSet>,
    /// Vertex attribute streams
    pub vertex_buffers: Vec<VertexBuffer>,
    /// Decoded vertices
    pub vertices: Vec<Vertex>,
}

/// A mesh as read from its record, before its face sets and buffers are attached
#[derive(Debug)]
pub(crate) struct MeshRecord {
    pub(crate) mesh: Mesh,
    pub(crate) face_set_indices: Vec<i32>,
    pub(crate) vertex_buffer_indices: Vec<i32>,
}

impl Mesh {
    /// Size of one record
    pub const SIZE: usize = 0x30;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, header: &FlverHeader) -> Result<MeshRecord> {
        let dynamic = cursor.assert_u8(&[0, 1])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        let material_index = cursor.read_i32()?;
        cursor.assert_i32(&[0])?;
        cursor.assert_i32(&[0])?;
        let default_bone_index = cursor.read_i32()?;
        let bone_count = to_usize(cursor.read_i32()?, "mesh bone count")?;
        let bounding_box_offset = to_usize(cursor.read_i32()?, "bounding box offset")?;
        let bone_offset = to_usize(cursor.read_i32()?, "mesh bone offset")?;
        let face_set_count = to_usize(cursor.read_i32()?, "mesh face set count")?;
        let face_set_offset = to_usize(cursor.read_i32()?, "mesh face set offset")?;
        let vertex_buffer_count = to_usize(cursor.read_i32()?, "mesh vertex buffer count")?;
        let vertex_buffer_offset = to_usize(cursor.read_i32()?, "mesh vertex buffer offset")?;

        let bounding_box = if bounding_box_offset == 0 {
            None
        } else {
            Some(cursor.at(bounding_box_offset, |c| MeshBoundingBox::read(c, header.version))?)
        };

        let bone_indices = cursor.get_i32s(bone_offset, bone_count)?;
        let face_set_indices = cursor.get_i32s(face_set_offset, face_set_count)?;
        let vertex_buffer_indices = cursor.get_i32s(vertex_buffer_offset, vertex_buffer_count)?;

        Ok(MeshRecord {
            mesh: Self {
                dynamic,
                material_index,
                default_bone_index,
                bone_indices,
                bounding_box,
                ..Self::default()
            },
            face_set_indices,
            vertex_buffer_indices,
        })
    }

    pub(crate) fn take_face_sets(&mut self, indices: &[i32], pool: &mut ClaimPool<FaceSet>) -> Result<()> {
        self.face_sets = pool.claim_all(indices)?;
        Ok(())
    }

    /// Claim this mesh's vertex buffers and check that they fit together
    pub(crate) fn take_vertex_buffers(
        &mut self,
        indices: &[i32],
        pool: &mut ClaimPool<VertexBuffer>,
        layouts: &[BufferLayout],
    ) -> Result<()> {
        self.vertex_buffers = pool.claim_all(indices)?;

        let mut seen = HashSet::new();
        for (i, buffer) in self.vertex_buffers.iter().enumerate() {
            let layout = layouts.get(buffer.layout_index).ok_or(FlverError::MissingReference {
                kind: "buffer layout",
                index: i64::try_from(buffer.layout_index).unwrap_or(i64::MAX),
            })?;
            for member in layout {
                if !member.semantic.is_repeatable() && !seen.insert(member.semantic) {
                    return Err(FlverError::structural(format!(
                        "{} appears in more than one vertex buffer member",
                        member.semantic
                    )));
                }
            }

            if usize::try_from(buffer.position()).ok() != Some(i) {
                return Err(FlverError::structural(format!(
                    "Vertex buffer {i} has buffer index {:#x}",
                    buffer.buffer_index
                )));
            }
        }
        Ok(())
    }

    /// Allocate the vertex array once and let every buffer decode into it
    pub(crate) fn read_vertices(
        &mut self,
        cursor: &mut BinaryCursor<'_>,
        header: &FlverHeader,
        layouts: &[BufferLayout],
        capacity: VertexCapacity,
    ) -> Result<()> {
        let Some(first) = self.vertex_buffers.first() else {
            self.vertices = Vec::new();
            return Ok(());
        };
        let vertex_count = first.vertex_count;

        let mut resolved = Vec::with_capacity(self.vertex_buffers.len());
        for (i, buffer) in self.vertex_buffers.iter().enumerate() {
            let layout = buffer.layout(i, layouts)?;
            if buffer.vertex_count != vertex_count {
                log::warn!(
                    "Vertex buffer {i} holds {} vertices, the mesh has {vertex_count}",
                    buffer.vertex_count
                );
            }
            if layout.size() == 0 && vertex_count > 0 {
                return Err(FlverError::structural(format!(
                    "Vertex buffer {i} declares {vertex_count} vertices with an empty layout"
                )));
            }
            let start = header.data_offset.saturating_add(buffer.buffer_offset);
            let needed = vertex_count.saturating_mul(layout.size());
            let available = cursor.len().saturating_sub(start);
            if needed > available {
                return Err(souls_data::Error::UnexpectedEof {
                    offset: start,
                    requested: needed,
                    available,
                }
                .into());
            }
            resolved.push((buffer, layout));
        }

        let mut vertices: Vec<Vertex> = (0..vertex_count)
            .map(|_| Vertex::with_capacity(capacity.uvs, capacity.tangents, capacity.colors))
            .collect();
        let uv_scale = header.uv_scale();
        for (buffer, layout) in resolved {
            buffer.read_into(cursor, header.data_offset, layout, uv_scale, &mut vertices)?;
        }
        self.vertices = vertices;
        Ok(())
    }

    /// The mesh's material
    pub fn material<'m>(&self, materials: &'m [Material]) -> Option<&'m Material> {
        usize::try_from(self.material_index)
            .ok()
            .and_then(|i| materials.get(i))
    }

    /// The full-detail face set, falling back to the first one
    pub fn main_face_set(&self) -> Option<&FaceSet> {
        self.face_sets
            .iter()
            .find(|f| f.is_main())
            .or_else(|| self.face_sets.first())
    }
}
