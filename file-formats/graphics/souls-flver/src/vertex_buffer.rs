//! Vertex buffer records

use souls_data::BinaryCursor;

use crate::error::{FlverError, Result, to_usize};
use crate::layout::BufferLayout;
use crate::vertex::Vertex;

/// Bits of the buffer index that carry flags rather than the position
pub const BUFFER_INDEX_FLAGS: i32 = 0x6000_0000;

/// Location and layout of one stream of vertex attributes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct VertexBuffer {
    /// Position among the mesh's buffers, possibly with flag bits set
    pub buffer_index: i32,
    /// Index into [`crate::Flver::buffer_layouts`]
    pub layout_index: usize,
    /// Stride of one vertex
    pub vertex_size: usize,
    /// Number of vertices stored
    pub vertex_count: usize,
    /// Byte length of the buffer
    pub buffer_length: i32,
    /// Offset of the vertex data from the model's data region
    pub buffer_offset: usize,
}

impl VertexBuffer {
    /// Size of one record
    pub const SIZE: usize = 0x20;

    pub(crate) fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let buffer_index = cursor.read_i32()?;
        let layout_index = to_usize(cursor.read_i32()?, "layout index")?;
        let vertex_size = to_usize(cursor.read_i32()?, "vertex size")?;
        let vertex_count = to_usize(cursor.read_i32()?, "vertex count")?;
        cursor.assert_i32(&[0])?;
        cursor.assert_i32(&[0])?;
        let buffer_length = cursor.read_i32()?;
        let buffer_offset = to_usize(cursor.read_i32()?, "buffer offset")?;

        Ok(Self {
            buffer_index,
            layout_index,
            vertex_size,
            vertex_count,
            buffer_length,
            buffer_offset,
        })
    }

    /// Buffer position with the flag bits cleared
    pub fn position(&self) -> i32 {
        self.buffer_index & !BUFFER_INDEX_FLAGS
    }

    /// Resolve this buffer's layout and check it against the stored stride
    pub(crate) fn layout<'l>(&self, buffer: usize, layouts: &'l [BufferLayout]) -> Result<&'l BufferLayout> {
        let layout = layouts.get(self.layout_index).ok_or(FlverError::MissingReference {
            kind: "buffer layout",
            index: i64::try_from(self.layout_index).unwrap_or(i64::MAX),
        })?;
        let layout_size = layout.size();
        if self.vertex_size != layout_size {
            return Err(FlverError::StrideMismatch {
                buffer,
                stride: self.vertex_size,
                layout_size,
            });
        }
        Ok(layout)
    }

    /// Decode every vertex of this buffer into `vertices`
    pub(crate) fn read_into(
        &self,
        cursor: &mut BinaryCursor<'_>,
        data_offset: usize,
        layout: &BufferLayout,
        uv_scale: f32,
        vertices: &mut [Vertex],
    ) -> Result<()> {
        cursor.at(data_offset.saturating_add(self.buffer_offset), |c| {
            vertices
                .iter_mut()
                .try_for_each(|vertex| vertex.read(c, layout, uv_scale))
        })
    }
}
