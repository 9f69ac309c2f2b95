//! Graphics parameter lists attached to materials

use souls_data::BinaryCursor;

use crate::error::{FlverError, Result};
use crate::header::VERSION_GX_TAGS;

/// Length of the item header that the stored length includes
const ITEM_HEADER_SIZE: i32 = 0xC;

/// Terminator id written when a list has none of its own
pub const DEFAULT_TERMINATOR_ID: i32 = i32::MAX;

/// One opaque block of shader parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct GxItem {
    /// Four-character tag, or a decimal number in older versions
    pub id: String,
    /// Unknown; usually 100
    pub unk04: i32,
    /// Parameter bytes
    pub data: Vec<u8>,
}

impl GxItem {
    fn read(cursor: &mut BinaryCursor<'_>, version: i32) -> Result<Self> {
        let id = if version < VERSION_GX_TAGS {
            cursor.read_i32()?.to_string()
        } else {
            cursor.read_fixed_str(4)?
        };
        let unk04 = cursor.read_i32()?;
        let data_len = payload_len(cursor.read_i32()?)?;
        let data = cursor.read_bytes(data_len)?.to_vec();
        Ok(Self { id, unk04, data })
    }
}

/// A list of GX items, shared by every material pointing at the same offset
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct GxList {
    /// Items in stored order
    pub items: Vec<GxItem>,
    /// Id of the terminating item
    pub terminator_id: i32,
    /// Zero padding carried by the terminating item
    pub terminator_length: usize,
}

impl GxList {
    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, version: i32) -> Result<Self> {
        if version < VERSION_GX_TAGS {
            return Ok(Self {
                items: vec![GxItem::read(cursor, version)?],
                terminator_id: DEFAULT_TERMINATOR_ID,
                terminator_length: 0,
            });
        }

        let mut items = Vec::new();
        let mut id = cursor.peek_i32()?;
        while id != i32::MAX && id != -1 {
            items.push(GxItem::read(cursor, version)?);
            id = cursor.peek_i32()?;
        }

        let terminator_id = cursor.assert_i32(&[id])?;
        cursor.assert_i32(&[100])?;
        let terminator_length = payload_len(cursor.read_i32()?)?;
        cursor.assert_pattern(terminator_length, 0)?;

        Ok(Self {
            items,
            terminator_id,
            terminator_length,
        })
    }

    /// Find an item by id
    pub fn item(&self, id: &str) -> Option<&GxItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

fn payload_len(length: i32) -> Result<usize> {
    usize::try_from(length.saturating_sub(ITEM_HEADER_SIZE))
        .map_err(|_| FlverError::structural(format!("GX item length {length:#x} is below its header size")))
}
