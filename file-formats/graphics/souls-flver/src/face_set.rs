//! Face sets: index lists of a mesh, one per level of detail

use souls_data::BinaryCursor;

use crate::error::{FlverError, Result, to_usize};
use crate::header::FlverHeader;
use crate::triangulate::strip_to_list;

bitflags::bitflags! {
    /// Purpose of a face set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
    pub struct FaceSetFlags: u32 {
        /// First reduced level of detail
        const LOD_LEVEL1 = 0x0100_0000;
        /// Second reduced level of detail
        const LOD_LEVEL2 = 0x0200_0000;
        /// Indices are packed by the PS3 EDGE tools
        const EDGE_COMPRESSED = 0x4000_0000;
        /// Used while motion blur is active
        const MOTION_BLUR = 0x8000_0000;
    }
}

/// Indices making up the triangles of one mesh variant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct FaceSet {
    /// Purpose flags
    pub flags: FaceSetFlags,
    /// Indices form a triangle strip rather than a list
    pub triangle_strip: bool,
    /// Back faces are culled
    pub cull_backfaces: bool,
    /// Unknown
    pub unk06: i16,
    /// Vertex indices
    pub indices: Vec<u32>,
}

impl FaceSet {
    /// Size of one record in files older than 0x20006
    pub const SIZE_V20005: usize = 0x10;

    /// Size of one record
    pub const SIZE: usize = 0x20;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, header: &FlverHeader) -> Result<Self> {
        let flags = FaceSetFlags::from_bits_retain(cursor.read_u32()?);
        let triangle_strip = cursor.read_bool()?;
        let cull_backfaces = cursor.read_bool()?;
        let unk06 = cursor.read_i16()?;
        let index_count = to_usize(cursor.read_i32()?, "face index count")?;
        let indices_offset = to_usize(cursor.read_i32()?, "face index offset")?;

        let mut index_size = 0;
        if header.version > 0x20005 {
            let _indices_length = cursor.read_i32()?;
            cursor.assert_i32(&[0])?;
            index_size = cursor.assert_i32(&[0, 16, 32])?;
            cursor.assert_i32(&[0])?;
        }
        if index_size == 0 {
            index_size = i32::from(header.vertex_index_size);
        }

        let offset = header.data_offset.saturating_add(indices_offset);
        let indices = match index_size {
            16 => cursor
                .get_u16s(offset, index_count)?
                .into_iter()
                .map(u32::from)
                .collect(),
            32 => cursor.get_u32s(offset, index_count)?,
            8 => return Err(FlverError::unsupported("8-bit edge-compressed face indices")),
            other => {
                return Err(FlverError::unsupported(format!("{other}-bit face indices")));
            }
        };

        log::trace!(
            "Face set {flags:?}: {index_count} {index_size}-bit indices, strip {triangle_strip}"
        );

        Ok(Self {
            flags,
            triangle_strip,
            cull_backfaces,
            unk06,
            indices,
        })
    }

    /// Indices as a triangle list.
    ///
    /// Strips are expanded with [`strip_to_list`]; lists are returned unchanged.
    pub fn triangulate(&self, allow_primitive_restarts: bool, include_degenerate_faces: bool) -> Vec<u32> {
        if self.triangle_strip {
            strip_to_list(&self.indices, allow_primitive_restarts, include_degenerate_faces)
        } else {
            self.indices.clone()
        }
    }

    /// Whether this is the full-detail variant
    pub fn is_main(&self) -> bool {
        !self.flags.intersects(FaceSetFlags::LOD_LEVEL1 | FaceSetFlags::LOD_LEVEL2 | FaceSetFlags::MOTION_BLUR)
    }
}
