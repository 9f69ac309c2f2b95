//! Vertex buffer layouts

use std::fmt;

use souls_data::BinaryCursor;

use crate::error::{FlverError, Result, to_usize};

/// Storage type of a layout member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
#[repr(u32)]
pub enum LayoutType {
    /// Two floats
    Float2 = 0x01,
    /// Three floats
    Float3 = 0x02,
    /// Four floats
    Float4 = 0x03,
    /// Four bytes
    Byte4A = 0x10,
    /// Four bytes
    Byte4B = 0x11,
    /// Two shorts
    Short2ToFloat2 = 0x12,
    /// Four bytes
    Byte4C = 0x13,
    /// Two shorts
    Uv = 0x15,
    /// Four shorts
    UvPair = 0x16,
    /// Four unsigned shorts
    ShortBoneIndices = 0x18,
    /// Four shorts
    Short4ToFloat4A = 0x1A,
    /// Four shorts
    Short4ToFloat4B = 0x2E,
    /// Four bytes
    Byte4E = 0x2F,
    /// Packed by the PS3 EDGE tools
    EdgeCompressed = 0xF0,
}

impl LayoutType {
    /// Convert from the stored code
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0x01 => Self::Float2,
            0x02 => Self::Float3,
            0x03 => Self::Float4,
            0x10 => Self::Byte4A,
            0x11 => Self::Byte4B,
            0x12 => Self::Short2ToFloat2,
            0x13 => Self::Byte4C,
            0x15 => Self::Uv,
            0x16 => Self::UvPair,
            0x18 => Self::ShortBoneIndices,
            0x1A => Self::Short4ToFloat4A,
            0x2E => Self::Short4ToFloat4B,
            0x2F => Self::Byte4E,
            0xF0 => Self::EdgeCompressed,
            _ => return None,
        })
    }

    /// Bytes one value of this type occupies in a vertex
    pub const fn size(self) -> usize {
        match self {
            Self::EdgeCompressed => 1,
            Self::Byte4A
            | Self::Byte4B
            | Self::Byte4C
            | Self::Byte4E
            | Self::Short2ToFloat2
            | Self::Uv => 4,
            Self::Float2
            | Self::UvPair
            | Self::ShortBoneIndices
            | Self::Short4ToFloat4A
            | Self::Short4ToFloat4B => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }
}

/// Meaning of a layout member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
#[repr(u32)]
pub enum LayoutSemantic {
    /// Vertex position
    Position = 0,
    /// Skinning weights
    BoneWeights = 1,
    /// Skinning bone indices
    BoneIndices = 2,
    /// Normal vector
    Normal = 3,
    /// Texture coordinates
    Uv = 5,
    /// Tangent vector
    Tangent = 6,
    /// Bitangent vector
    Bitangent = 7,
    /// Vertex colour
    VertexColor = 10,
}

impl LayoutSemantic {
    /// Convert from the stored code
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Position,
            1 => Self::BoneWeights,
            2 => Self::BoneIndices,
            3 => Self::Normal,
            5 => Self::Uv,
            6 => Self::Tangent,
            7 => Self::Bitangent,
            10 => Self::VertexColor,
            _ => return None,
        })
    }

    /// Whether a vertex may carry several values of this semantic.
    ///
    /// Bone weights, bone indices and the bitangent must appear at most once
    /// across all buffers of a mesh.
    pub const fn is_repeatable(self) -> bool {
        !matches!(self, Self::BoneWeights | Self::BoneIndices | Self::Bitangent)
    }
}

impl fmt::Display for LayoutSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One attribute of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct LayoutMember {
    /// Unknown; buffer slot in some games
    pub unk00: i32,
    /// Storage type
    pub member_type: LayoutType,
    /// Meaning
    pub semantic: LayoutSemantic,
    /// Which of several same-semantic members this is
    pub index: i32,
    /// Byte offset within the vertex
    pub struct_offset: usize,
}

impl LayoutMember {
    /// Size of one record
    pub const SIZE: usize = 0x14;

    fn read(cursor: &mut BinaryCursor<'_>, struct_offset: usize) -> Result<Self> {
        let unk00 = cursor.read_i32()?;
        let expected_offset = i32::try_from(struct_offset).unwrap_or(i32::MAX);
        cursor.assert_i32(&[expected_offset])?;
        let raw_type = cursor.read_u32()?;
        let raw_semantic = cursor.read_u32()?;
        let index = cursor.read_i32()?;

        let member_type = LayoutType::from_raw(raw_type)
            .ok_or_else(|| FlverError::unsupported(format!("layout type {raw_type:#x}")))?;
        let semantic = LayoutSemantic::from_raw(raw_semantic)
            .ok_or_else(|| FlverError::unsupported(format!("layout semantic {raw_semantic:#x}")))?;

        Ok(Self {
            unk00,
            member_type,
            semantic,
            index,
            struct_offset,
        })
    }

    /// Bytes the member occupies
    pub const fn size(&self) -> usize {
        self.member_type.size()
    }
}

/// Ordered attributes making up one vertex of a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct BufferLayout {
    /// Members in vertex order
    pub members: Vec<LayoutMember>,
}

impl BufferLayout {
    /// Size of one record
    pub const SIZE: usize = 0x10;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let member_count = to_usize(cursor.read_i32()?, "layout member count")?;
        cursor.assert_i32(&[0])?;
        cursor.assert_i32(&[0])?;
        let member_offset = to_usize(cursor.read_i32()?, "layout member offset")?;

        let members = cursor.at(member_offset, |c| {
            let mut members = Vec::with_capacity(member_count.min(c.remaining() / LayoutMember::SIZE));
            let mut struct_offset = 0;
            for _ in 0..member_count {
                let member = LayoutMember::read(c, struct_offset)?;
                struct_offset += member.size();
                members.push(member);
            }
            Ok::<_, FlverError>(members)
        })?;

        Ok(Self { members })
    }

    /// Stride of a vertex with this layout
    pub fn size(&self) -> usize {
        self.members.iter().map(LayoutMember::size).sum()
    }

    /// Number of members with `semantic`
    pub fn count(&self, semantic: LayoutSemantic) -> usize {
        self.members.iter().filter(|m| m.semantic == semantic).count()
    }

    /// Iterate over the members
    pub fn iter(&self) -> std::slice::Iter<'_, LayoutMember> {
        self.members.iter()
    }
}

impl<'a> IntoIterator for &'a BufferLayout {
    type Item = &'a LayoutMember;
    type IntoIter = std::slice::Iter<'a, LayoutMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
