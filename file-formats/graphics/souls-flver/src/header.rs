//! FLVER file header

use glam::Vec3;
use souls_data::{BinaryCursor, Endian, TextEncoding};

use crate::error::{Result, to_usize};

/// Magic at the start of every FLVER file
pub const FLVER_MAGIC: &str = "FLVER\0";

/// Size of the fixed header
pub const HEADER_SIZE: usize = 0x80;

/// Versions this reader accepts
pub const SUPPORTED_VERSIONS: &[i32] = &[
    0x20005, 0x20007, 0x20009, 0x2000B, 0x2000C, 0x2000D, 0x2000E, 0x2000F, 0x20010, 0x20013,
    0x20014, 0x20016, 0x2001A,
];

/// Version known for storing dummy colours as BGRA
pub const VERSION_BGRA_DUMMIES: i32 = 0x20010;

/// First version with face set index sizes and four-character GX ids
pub const VERSION_GX_TAGS: i32 = 0x20010;

/// First version using the finer UV fixed-point scale
pub const VERSION_FINE_UVS: i32 = 0x2000F;

/// First version with the trailing extension record and a third mesh bounding vector
pub const VERSION_EXTENSION: i32 = 0x2001A;

/// Model-wide settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct FlverHeader {
    /// Big-endian file
    pub big_endian: bool,
    /// Format version, one of [`SUPPORTED_VERSIONS`]
    pub version: i32,
    /// Start of the index and vertex data region
    pub data_offset: usize,
    /// Length of the data region
    pub data_length: i32,
    /// Minimum corner of the model bounds
    pub bounding_box_min: Vec3,
    /// Maximum corner of the model bounds
    pub bounding_box_max: Vec3,
    /// Triangles excluding degenerate ones
    pub true_face_count: i32,
    /// All triangles
    pub total_face_count: i32,
    /// Default face index width in bits; 0 means per face set
    pub vertex_index_size: u8,
    /// Strings are UTF-16 instead of Shift-JIS
    pub unicode: bool,
    /// Unknown
    pub unk4a: bool,
    /// Unknown
    pub unk4c: i32,
    /// Unknown
    pub unk5c: u8,
    /// Unknown
    pub unk5d: u8,
    /// Unknown
    pub unk68: i32,
}

/// Record counts declared by the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counts {
    pub(crate) dummies: usize,
    pub(crate) materials: usize,
    pub(crate) bones: usize,
    pub(crate) meshes: usize,
    pub(crate) vertex_buffers: usize,
    pub(crate) face_sets: usize,
    pub(crate) buffer_layouts: usize,
    pub(crate) textures: usize,
}

impl FlverHeader {
    /// Read the header and switch `cursor` to the file's byte order
    pub(crate) fn read(cursor: &mut BinaryCursor<'_>) -> Result<(Self, Counts)> {
        cursor.set_endian(Endian::Little);
        cursor.assert_ascii(&[FLVER_MAGIC])?;
        let big_endian = cursor.assert_ascii(&["L\0", "B\0"])? == "B\0";
        cursor.set_endian(Endian::from_big_endian_flag(big_endian));

        let version = cursor.assert_i32(SUPPORTED_VERSIONS)?;
        let data_offset = to_usize(cursor.read_i32()?, "data offset")?;
        let data_length = cursor.read_i32()?;

        let mut counts = Counts {
            dummies: to_usize(cursor.read_i32()?, "dummy count")?,
            materials: to_usize(cursor.read_i32()?, "material count")?,
            bones: to_usize(cursor.read_i32()?, "bone count")?,
            meshes: to_usize(cursor.read_i32()?, "mesh count")?,
            vertex_buffers: to_usize(cursor.read_i32()?, "vertex buffer count")?,
            ..Counts::default()
        };

        let bounding_box_min = cursor.read_vec3()?;
        let bounding_box_max = cursor.read_vec3()?;
        let true_face_count = cursor.read_i32()?;
        let total_face_count = cursor.read_i32()?;

        let vertex_index_size = cursor.assert_u8(&[0, 8, 16, 32])?;
        let unicode = cursor.read_bool()?;
        let unk4a = cursor.read_bool()?;
        cursor.assert_u8(&[0])?;
        let unk4c = cursor.read_i32()?;

        counts.face_sets = to_usize(cursor.read_i32()?, "face set count")?;
        counts.buffer_layouts = to_usize(cursor.read_i32()?, "buffer layout count")?;
        counts.textures = to_usize(cursor.read_i32()?, "texture count")?;

        let unk5c = cursor.read_u8()?;
        let unk5d = cursor.read_u8()?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_i32(&[0])?;
        cursor.assert_i32(&[0])?;
        let unk68 = cursor.assert_i32(&[0, 1, 2, 3, 4])?;
        for _ in 0..5 {
            cursor.assert_i32(&[0])?;
        }

        log::debug!(
            "FLVER {version:#x} ({}), {} meshes, {} bones, {} materials",
            if big_endian { "big-endian" } else { "little-endian" },
            counts.meshes,
            counts.bones,
            counts.materials
        );

        Ok((
            Self {
                big_endian,
                version,
                data_offset,
                data_length,
                bounding_box_min,
                bounding_box_max,
                true_face_count,
                total_face_count,
                vertex_index_size,
                unicode,
                unk4a,
                unk4c,
                unk5c,
                unk5d,
                unk68,
            },
            counts,
        ))
    }

    /// Divisor for fixed-point texture coordinates
    pub fn uv_scale(&self) -> f32 {
        if self.version >= VERSION_FINE_UVS {
            2048.0
        } else {
            1024.0
        }
    }

    /// Encoding of every string in the file
    pub fn encoding(&self) -> TextEncoding {
        TextEncoding::from_unicode_flag(self.unicode)
    }
}
