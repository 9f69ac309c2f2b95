//! Whole-model reading

use souls_data::{BinaryCursor, Endian};

use crate::bone::{Bone, siblings};
use crate::dummy::Dummy;
use crate::error::{Phase, PhaseExt, Result};
use crate::extension::ExtensionRecord;
use crate::face_set::FaceSet;
use crate::gx_list::GxList;
use crate::header::{FLVER_MAGIC, FlverHeader, VERSION_EXTENSION};
use crate::layout::BufferLayout;
use crate::material::{GxListCache, Material};
use crate::mesh::{Mesh, MeshRecord, VertexCapacity};
use crate::pool::ClaimPool;
use crate::texture::Texture;
use crate::vertex_buffer::VertexBuffer;

/// A decoded FLVER2 model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Flver {
    /// Model-wide settings
    pub header: FlverHeader,
    /// Marker points
    pub dummies: Vec<Dummy>,
    /// Materials, each owning its textures
    pub materials: Vec<Material>,
    /// Deduplicated GX lists referenced by materials
    pub gx_lists: Vec<GxList>,
    /// Skeleton as a flat arena
    pub bones: Vec<Bone>,
    /// Meshes, each owning its face sets, vertex buffers and vertices
    pub meshes: Vec<Mesh>,
    /// Layouts shared by the vertex buffers
    pub buffer_layouts: Vec<BufferLayout>,
    /// Trailing record of the newest version
    pub extension: Option<ExtensionRecord>,
}

impl Flver {
    /// Whether `data` looks like a FLVER2 file
    pub fn is(data: &[u8]) -> bool {
        if data.len() < 0xC || !data.starts_with(FLVER_MAGIC.as_bytes()) {
            return false;
        }
        let endian = Endian::from_big_endian_flag(&data[6..8] == b"B\0");
        let mut cursor = BinaryCursor::with_endian(data, endian);
        cursor.get_i32(8).is_ok_and(|version| version >= 0x20000)
    }

    /// Decode a whole model.
    ///
    /// Records are read in file order, then textures, face sets and vertex
    /// buffers are handed to their owners. Every table entry must be claimed
    /// by exactly one owner.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        let (header, counts) = FlverHeader::read(&mut cursor).phase(Phase::Header)?;
        let encoding = header.encoding();

        let dummies = (0..counts.dummies)
            .map(|_| Dummy::read(&mut cursor, header.version))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::Dummies)?;

        let mut gx_cache = GxListCache::default();
        let (mut materials, texture_ranges): (Vec<_>, Vec<_>) = (0..counts.materials)
            .map(|_| Material::read(&mut cursor, &header, &mut gx_cache))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::Materials)?
            .into_iter()
            .unzip();

        let bones = (0..counts.bones)
            .map(|_| Bone::read(&mut cursor, encoding))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::Bones)?;

        let mesh_records = (0..counts.meshes)
            .map(|_| Mesh::read(&mut cursor, &header))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::Meshes)?;

        let face_sets = (0..counts.face_sets)
            .map(|_| FaceSet::read(&mut cursor, &header))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::FaceSets)?;

        let vertex_buffers = (0..counts.vertex_buffers)
            .map(|_| VertexBuffer::read(&mut cursor))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::VertexBuffers)?;

        let buffer_layouts = (0..counts.buffer_layouts)
            .map(|_| BufferLayout::read(&mut cursor))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::BufferLayouts)?;

        let textures = (0..counts.textures)
            .map(|_| Texture::read(&mut cursor, encoding))
            .collect::<Result<Vec<_>>>()
            .phase(Phase::Textures)?;

        let extension = if header.version >= VERSION_EXTENSION {
            Some(ExtensionRecord::read(&mut cursor).phase(Phase::Extension)?)
        } else {
            None
        };

        let mut texture_pool = ClaimPool::new("textures", textures);
        for (material, range) in materials.iter_mut().zip(texture_ranges) {
            material.textures = texture_pool.claim_range(range).phase(Phase::Distribution)?;
        }
        texture_pool.finish().phase(Phase::Distribution)?;

        let capacity = VertexCapacity::of(&buffer_layouts);
        let mut face_set_pool = ClaimPool::new("face sets", face_sets);
        let mut vertex_buffer_pool = ClaimPool::new("vertex buffers", vertex_buffers);
        let mut meshes = Vec::with_capacity(mesh_records.len());
        for record in mesh_records {
            let MeshRecord {
                mut mesh,
                face_set_indices,
                vertex_buffer_indices,
            } = record;
            mesh.take_face_sets(&face_set_indices, &mut face_set_pool)
                .phase(Phase::Distribution)?;
            mesh.take_vertex_buffers(&vertex_buffer_indices, &mut vertex_buffer_pool, &buffer_layouts)
                .phase(Phase::Distribution)?;
            mesh.read_vertices(&mut cursor, &header, &buffer_layouts, capacity)
                .phase(Phase::Vertices)?;
            meshes.push(mesh);
        }
        face_set_pool.finish().phase(Phase::Distribution)?;
        vertex_buffer_pool.finish().phase(Phase::Distribution)?;

        log::debug!(
            "Read FLVER with {} meshes, {} vertices, {} GX lists",
            meshes.len(),
            meshes.iter().map(|m| m.vertices.len()).sum::<usize>(),
            gx_cache.lists.len()
        );

        Ok(Self {
            header,
            dummies,
            materials,
            gx_lists: gx_cache.lists,
            bones,
            meshes,
            buffer_layouts,
            extension,
        })
    }

    /// Indices of bones without a parent
    pub fn root_bones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.is_root())
            .map(|(i, _)| i)
    }

    /// Indices of the direct children of `bone`, following the sibling links
    pub fn bone_children(&self, bone: usize) -> impl Iterator<Item = usize> + '_ {
        let first = self.bones.get(bone).and_then(Bone::child);
        siblings(&self.bones, first)
    }

    /// Total vertex count over all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }
}
