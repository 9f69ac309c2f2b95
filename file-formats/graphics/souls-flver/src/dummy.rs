//! Dummy polygons: marker points used for effects and attachments

use glam::Vec3;
use souls_data::BinaryCursor;

use crate::bone::{NO_RELATION, relation};
use crate::error::Result;
use crate::header::VERSION_BGRA_DUMMIES;

/// 8-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Color8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

/// A marker point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Dummy {
    /// Location relative to the parent bone
    pub position: Vec3,
    /// Debug colour
    pub color: Color8,
    /// Facing direction
    pub forward: Vec3,
    /// Id that game parameters refer to
    pub reference_id: i16,
    /// Bone the position is relative to, or [`NO_RELATION`]
    pub parent_bone_index: i16,
    /// Up direction
    pub upward: Vec3,
    /// Bone the dummy follows, or [`NO_RELATION`]
    pub attach_bone_index: i16,
    /// Unknown
    pub flag1: bool,
    /// Whether `upward` is meaningful
    pub use_upward_vector: bool,
    /// Unknown
    pub unk30: i32,
    /// Unknown
    pub unk34: i32,
}

impl Dummy {
    /// Size of one record
    pub const SIZE: usize = 0x40;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, version: i32) -> Result<Self> {
        let position = cursor.read_vec3()?;
        let [x, y, z, w] = [
            cursor.read_u8()?,
            cursor.read_u8()?,
            cursor.read_u8()?,
            cursor.read_u8()?,
        ];
        let color = if version == VERSION_BGRA_DUMMIES {
            Color8 { b: x, g: y, r: z, a: w }
        } else {
            Color8 { a: x, r: y, g: z, b: w }
        };
        let forward = cursor.read_vec3()?;
        let reference_id = cursor.read_i16()?;
        let parent_bone_index = cursor.read_i16()?;
        let upward = cursor.read_vec3()?;
        let attach_bone_index = cursor.read_i16()?;
        let flag1 = cursor.read_bool()?;
        let use_upward_vector = cursor.read_bool()?;
        let unk30 = cursor.read_i32()?;
        let unk34 = cursor.read_i32()?;
        cursor.assert_i32(&[0])?;
        cursor.assert_i32(&[0])?;

        Ok(Self {
            position,
            color,
            forward,
            reference_id,
            parent_bone_index,
            upward,
            attach_bone_index,
            flag1,
            use_upward_vector,
            unk30,
            unk34,
        })
    }

    /// Parent bone, when there is one
    pub fn parent_bone(&self) -> Option<usize> {
        relation(self.parent_bone_index)
    }

    /// Attachment bone, when there is one
    pub fn attach_bone(&self) -> Option<usize> {
        relation(self.attach_bone_index)
    }

    /// Whether the dummy hangs off no bone at all
    pub fn is_unparented(&self) -> bool {
        self.parent_bone_index == NO_RELATION && self.attach_bone_index == NO_RELATION
    }
}
