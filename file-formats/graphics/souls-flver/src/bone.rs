//! Skeleton bones, stored as a flat arena linked by indices

use glam::Vec3;
use souls_data::{BinaryCursor, TextEncoding};

use crate::error::Result;

/// Index value meaning "no bone"
pub const NO_RELATION: i16 = -1;

/// Resolve a stored bone link
pub(crate) fn relation(index: i16) -> Option<usize> {
    usize::try_from(index).ok()
}

/// One bone of the skeleton
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Bone {
    /// Bone name
    pub name: String,
    /// Translation relative to the parent
    pub translation: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Scale
    pub scale: Vec3,
    /// Parent bone, or [`NO_RELATION`]
    pub parent_index: i16,
    /// First child bone, or [`NO_RELATION`]
    pub child_index: i16,
    /// Next bone with the same parent, or [`NO_RELATION`]
    pub next_sibling_index: i16,
    /// Previous bone with the same parent, or [`NO_RELATION`]
    pub prev_sibling_index: i16,
    /// Minimum corner of the bone bounds
    pub bounding_box_min: Vec3,
    /// Maximum corner of the bone bounds
    pub bounding_box_max: Vec3,
    /// Unknown
    pub unk3c: i32,
}

impl Bone {
    /// Size of one record
    pub const SIZE: usize = 0x80;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>, encoding: TextEncoding) -> Result<Self> {
        let translation = cursor.read_vec3()?;
        let name_offset = cursor.read_u32()? as usize;
        let rotation = cursor.read_vec3()?;
        let parent_index = cursor.read_i16()?;
        let child_index = cursor.read_i16()?;
        let scale = cursor.read_vec3()?;
        let next_sibling_index = cursor.read_i16()?;
        let prev_sibling_index = cursor.read_i16()?;
        let bounding_box_min = cursor.read_vec3()?;
        let unk3c = cursor.read_i32()?;
        let bounding_box_max = cursor.read_vec3()?;
        cursor.assert_pattern(0x34, 0)?;

        let name = cursor.get_string(name_offset, encoding)?;
        log::trace!("Bone {name:?}: parent {parent_index}, child {child_index}");

        Ok(Self {
            name,
            translation,
            rotation,
            scale,
            parent_index,
            child_index,
            next_sibling_index,
            prev_sibling_index,
            bounding_box_min,
            bounding_box_max,
            unk3c,
        })
    }

    /// Parent bone
    pub fn parent(&self) -> Option<usize> {
        relation(self.parent_index)
    }

    /// First child
    pub fn child(&self) -> Option<usize> {
        relation(self.child_index)
    }

    /// Next sibling
    pub fn next_sibling(&self) -> Option<usize> {
        relation(self.next_sibling_index)
    }

    /// Previous sibling
    pub fn prev_sibling(&self) -> Option<usize> {
        relation(self.prev_sibling_index)
    }

    /// Whether the bone has no parent
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

/// Walk a chain of siblings starting at `first`.
///
/// The walk stops at the first link that leaves the arena and never visits
/// more entries than the arena holds, so malformed cycles terminate.
pub(crate) fn siblings(bones: &[Bone], first: Option<usize>) -> impl Iterator<Item = usize> + '_ {
    std::iter::successors(first.filter(|&i| i < bones.len()), move |&i| {
        bones[i].next_sibling().filter(|&next| next < bones.len())
    })
    .take(bones.len())
}
