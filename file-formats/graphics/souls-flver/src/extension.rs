//! Trailing record of version 0x2001A files

use souls_data::BinaryCursor;

use crate::error::Result;

/// Entry of the extension record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct ExtensionMember {
    /// Unknown
    pub unk00: [i16; 4],
    /// Index of the entry
    pub index: i32,
}

impl ExtensionMember {
    /// Size of one entry
    pub const SIZE: usize = 0x10;

    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let mut unk00 = [0; 4];
        for value in &mut unk00 {
            *value = cursor.read_i16()?;
        }
        let index = cursor.read_i32()?;
        cursor.assert_i32(&[0])?;
        Ok(Self { unk00, index })
    }
}

/// Two lists of unknown purpose following the texture table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct ExtensionRecord {
    /// First list
    pub members1: Vec<ExtensionMember>,
    /// Second list
    pub members2: Vec<ExtensionMember>,
}

impl ExtensionRecord {
    /// Size of the record header
    pub const SIZE: usize = 0x20;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let count1 = usize::from(cursor.read_u16()?);
        let count2 = usize::from(cursor.read_u16()?);
        let offset1 = cursor.read_u32()? as usize;
        let offset2 = cursor.read_u32()? as usize;
        for _ in 0..5 {
            cursor.assert_i32(&[0])?;
        }

        let members1 = cursor.at(offset1, |c| read_members(c, count1))?;
        let members2 = cursor.at(offset2, |c| read_members(c, count2))?;
        Ok(Self { members1, members2 })
    }
}

fn read_members(cursor: &mut BinaryCursor<'_>, count: usize) -> Result<Vec<ExtensionMember>> {
    (0..count).map(|_| ExtensionMember::read(cursor)).collect()
}
