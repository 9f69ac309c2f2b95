//! Materials: shader reference, texture slots and GX parameters

use std::collections::HashMap;
use std::ops::Range;

use souls_data::BinaryCursor;

use crate::error::{FlverError, Result};
use crate::gx_list::GxList;
use crate::header::FlverHeader;
use crate::texture::Texture;

/// A material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Material {
    /// Material name
    pub name: String,
    /// Path of the material definition (`.mtd` or `.matxml`)
    pub mtd: String,
    /// Unknown flags
    pub flags: i32,
    /// Texture slots, taken from the file's texture table
    pub textures: Vec<Texture>,
    /// Index into [`crate::Flver::gx_lists`]
    pub gx_index: Option<usize>,
    /// Unknown
    pub unk18: i32,
}

/// GX lists already read, keyed by file offset
#[derive(Debug, Default)]
pub(crate) struct GxListCache {
    indices: HashMap<u32, usize>,
    pub(crate) lists: Vec<GxList>,
}

impl Material {
    /// Size of one record
    pub const SIZE: usize = 0x20;

    /// Read a material record. Returns the material without textures and the
    /// range of the texture table it owns.
    pub(crate) fn read(
        cursor: &mut BinaryCursor<'_>,
        header: &FlverHeader,
        gx_cache: &mut GxListCache,
    ) -> Result<(Self, Range<usize>)> {
        let name_offset = cursor.read_u32()? as usize;
        let mtd_offset = cursor.read_u32()? as usize;
        let texture_count = cursor.read_i32()?;
        let texture_index = cursor.read_i32()?;
        let flags = cursor.read_i32()?;
        let gx_offset = cursor.read_u32()?;
        let unk18 = cursor.read_i32()?;
        cursor.assert_i32(&[0])?;

        let encoding = header.encoding();
        let name = cursor.get_string(name_offset, encoding)?;
        let mtd = cursor.get_string(mtd_offset, encoding)?;

        let gx_index = if gx_offset == 0 {
            None
        } else if let Some(&index) = gx_cache.indices.get(&gx_offset) {
            Some(index)
        } else {
            let list = cursor.at(gx_offset as usize, |c| GxList::read(c, header.version))?;
            let index = gx_cache.lists.len();
            gx_cache.indices.insert(gx_offset, index);
            gx_cache.lists.push(list);
            Some(index)
        };

        let textures = texture_range(texture_index, texture_count)?;
        log::trace!("Material {name:?} ({mtd}), textures {textures:?}, gx {gx_index:?}");

        Ok((
            Self {
                name,
                mtd,
                flags,
                textures: Vec::new(),
                gx_index,
                unk18,
            },
            textures,
        ))
    }

    /// Find a texture slot by its shader type
    pub fn texture(&self, texture_type: &str) -> Option<&Texture> {
        self.textures.iter().find(|t| t.texture_type == texture_type)
    }
}

fn texture_range(index: i32, count: i32) -> Result<Range<usize>> {
    let start = usize::try_from(index);
    let len = usize::try_from(count);
    match (start, len) {
        (Ok(start), Ok(len)) => Ok(start..start.saturating_add(len)),
        _ => Err(FlverError::structural(format!(
            "Invalid texture range: {count} textures from {index}"
        ))),
    }
}
