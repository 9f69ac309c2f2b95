//! Texture references of materials

use glam::Vec2;
use souls_data::{BinaryCursor, TextEncoding};

use crate::error::Result;

/// A texture slot of a material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Texture {
    /// Shader slot the texture binds to, such as `g_DiffuseTexture`
    pub texture_type: String,
    /// Source path of the texture
    pub path: String,
    /// UV scale applied by the shader
    pub scale: Vec2,
    /// Unknown; 0, 1 or 2
    pub unk10: u8,
    /// Unknown
    pub unk11: bool,
    /// Unknown
    pub unk14: f32,
    /// Unknown
    pub unk18: f32,
    /// Unknown
    pub unk1c: f32,
}

impl Texture {
    /// Size of one record
    pub const SIZE: usize = 0x20;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, encoding: TextEncoding) -> Result<Self> {
        let path_offset = cursor.read_u32()? as usize;
        let type_offset = cursor.read_u32()? as usize;
        let scale = cursor.read_vec2()?;
        let unk10 = cursor.assert_u8(&[0, 1, 2])?;
        let unk11 = cursor.read_bool()?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        let unk14 = cursor.read_f32()?;
        let unk18 = cursor.read_f32()?;
        let unk1c = cursor.read_f32()?;

        let texture_type = cursor.get_string(type_offset, encoding)?;
        let path = cursor.get_string(path_offset, encoding)?;

        Ok(Self {
            texture_type,
            path,
            scale,
            unk10,
            unk11,
            unk14,
            unk18,
            unk1c,
        })
    }

    /// File name of the texture without directories or extension
    pub fn file_stem(&self) -> &str {
        let name = self.path.rsplit(['\\', '/']).next().unwrap_or(&self.path);
        name.split_once('.').map_or(name, |(stem, _)| stem)
    }
}
