//! Decoding of individual vertices from their buffer layout

use glam::{Vec3, Vec4};
use souls_data::BinaryCursor;

use crate::error::{FlverError, Result};
use crate::layout::{BufferLayout, LayoutMember, LayoutSemantic as S, LayoutType as T};

/// Floating-point vertex colour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct VertexColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

/// A decoded vertex
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Vertex {
    /// Position
    pub position: Vec3,
    /// Skinning weights
    pub bone_weights: [f32; 4],
    /// Skinning bone indices, relative to the mesh's bone list
    pub bone_indices: [u16; 4],
    /// Normal
    pub normal: Vec3,
    /// Integer stored next to a quantized normal
    pub normal_w: i32,
    /// Texture coordinates; z is usually 0
    pub uvs: Vec<Vec3>,
    /// Tangents
    pub tangents: Vec<Vec4>,
    /// Bitangent
    pub bitangent: Vec4,
    /// Colours
    pub colors: Vec<VertexColor>,
}

fn byte_norm(value: u8) -> f32 {
    (f32::from(value) - 127.0) / 127.0
}

fn sbyte_norm(value: i8) -> f32 {
    f32::from(value) / 127.0
}

fn short_norm(value: i16) -> f32 {
    f32::from(value) / 32767.0
}

fn ushort_norm(value: u16) -> f32 {
    (f32::from(value) - 32767.0) / 32767.0
}

fn read_byte_norm_xyz(cursor: &mut BinaryCursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        byte_norm(cursor.read_u8()?),
        byte_norm(cursor.read_u8()?),
        byte_norm(cursor.read_u8()?),
    ))
}

fn read_byte_norm_xyzw(cursor: &mut BinaryCursor<'_>) -> Result<Vec4> {
    Ok(read_byte_norm_xyz(cursor)?.extend(byte_norm(cursor.read_u8()?)))
}

fn read_sbyte_norm_zyx(cursor: &mut BinaryCursor<'_>) -> Result<Vec3> {
    let z = sbyte_norm(cursor.read_i8()?);
    let y = sbyte_norm(cursor.read_i8()?);
    let x = sbyte_norm(cursor.read_i8()?);
    Ok(Vec3::new(x, y, z))
}

fn read_short_norm_xyz(cursor: &mut BinaryCursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        short_norm(cursor.read_i16()?),
        short_norm(cursor.read_i16()?),
        short_norm(cursor.read_i16()?),
    ))
}

fn read_short_norm_xyzw(cursor: &mut BinaryCursor<'_>) -> Result<Vec4> {
    Ok(read_short_norm_xyz(cursor)?.extend(short_norm(cursor.read_i16()?)))
}

fn read_ushort_norm_xyz(cursor: &mut BinaryCursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        ushort_norm(cursor.read_u16()?),
        ushort_norm(cursor.read_u16()?),
        ushort_norm(cursor.read_u16()?),
    ))
}

fn read_uv_short2(cursor: &mut BinaryCursor<'_>, uv_scale: f32) -> Result<Vec3> {
    let u = f32::from(cursor.read_i16()?);
    let v = f32::from(cursor.read_i16()?);
    Ok(Vec3::new(u, v, 0.0) / uv_scale)
}

impl Vertex {
    /// Empty vertex with room for the given numbers of repeated attributes
    pub fn with_capacity(uvs: usize, tangents: usize, colors: usize) -> Self {
        Self {
            uvs: Vec::with_capacity(uvs),
            tangents: Vec::with_capacity(tangents),
            colors: Vec::with_capacity(colors),
            ..Self::default()
        }
    }

    /// Decode the members of `layout` from `cursor` into this vertex.
    ///
    /// Several buffers may contribute to the same vertex; repeated attributes
    /// are appended.
    pub fn read(&mut self, cursor: &mut BinaryCursor<'_>, layout: &BufferLayout, uv_scale: f32) -> Result<()> {
        for member in layout {
            self.read_member(cursor, member, uv_scale)?;
        }
        Ok(())
    }

    fn read_member(&mut self, cursor: &mut BinaryCursor<'_>, member: &LayoutMember, uv_scale: f32) -> Result<()> {
        match (member.semantic, member.member_type) {
            (S::Position, T::Float3) => self.position = cursor.read_vec3()?,
            (S::Position, T::Float4) => {
                self.position = cursor.read_vec3()?;
                cursor.assert_f32(&[0.0])?;
            }

            (S::BoneWeights, T::Byte4A) => {
                for weight in &mut self.bone_weights {
                    *weight = sbyte_norm(cursor.read_i8()?);
                }
            }
            (S::BoneWeights, T::Byte4C) => {
                for weight in &mut self.bone_weights {
                    *weight = f32::from(cursor.read_u8()?) / 255.0;
                }
            }
            (S::BoneWeights, T::UvPair | T::Short4ToFloat4A) => {
                for weight in &mut self.bone_weights {
                    *weight = short_norm(cursor.read_i16()?);
                }
            }

            (S::BoneIndices, T::Byte4B | T::Byte4E) => {
                for index in &mut self.bone_indices {
                    *index = u16::from(cursor.read_u8()?);
                }
            }
            (S::BoneIndices, T::ShortBoneIndices) => {
                for index in &mut self.bone_indices {
                    *index = cursor.read_u16()?;
                }
            }

            (S::Normal, T::Float3) => self.normal = cursor.read_vec3()?,
            (S::Normal, T::Float4) => {
                self.normal = cursor.read_vec3()?;
                let offset = cursor.position();
                let w = cursor.read_f32()?;
                if w.fract() != 0.0 || !w.is_finite() {
                    return Err(FlverError::structural(format!(
                        "Float4 normal w at {offset:#x} is not a whole number: {w}"
                    )));
                }
                self.normal_w = w as i32;
            }
            (S::Normal, T::Byte4A | T::Byte4B | T::Byte4C | T::Byte4E) => {
                self.normal = read_byte_norm_xyz(cursor)?;
                self.normal_w = i32::from(cursor.read_u8()?);
            }
            (S::Normal, T::Short2ToFloat2) => {
                self.normal_w = i32::from(cursor.read_u8()?);
                self.normal = read_sbyte_norm_zyx(cursor)?;
            }
            (S::Normal, T::Short4ToFloat4A) => {
                self.normal = read_short_norm_xyz(cursor)?;
                self.normal_w = i32::from(cursor.read_i16()?);
            }
            (S::Normal, T::Short4ToFloat4B) => {
                self.normal = read_ushort_norm_xyz(cursor)?;
                self.normal_w = i32::from(cursor.read_i16()?);
            }

            (S::Uv, T::Float2) => self.uvs.push(cursor.read_vec2()?.extend(0.0)),
            (S::Uv, T::Float3) => self.uvs.push(cursor.read_vec3()?),
            (S::Uv, T::Float4) => {
                self.uvs.push(cursor.read_vec2()?.extend(0.0));
                self.uvs.push(cursor.read_vec2()?.extend(0.0));
            }
            (S::Uv, T::Byte4A | T::Byte4B | T::Byte4C | T::Short2ToFloat2 | T::Uv) => {
                self.uvs.push(read_uv_short2(cursor, uv_scale)?);
            }
            (S::Uv, T::UvPair) => {
                self.uvs.push(read_uv_short2(cursor, uv_scale)?);
                self.uvs.push(read_uv_short2(cursor, uv_scale)?);
            }
            (S::Uv, T::Short4ToFloat4B) => {
                let u = f32::from(cursor.read_i16()?);
                let v = f32::from(cursor.read_i16()?);
                let w = f32::from(cursor.read_i16()?);
                cursor.assert_i16(&[0])?;
                self.uvs.push(Vec3::new(u, v, w) / uv_scale);
            }

            (S::Tangent, T::Float4) => self.tangents.push(cursor.read_vec4()?),
            (S::Tangent, T::Byte4A | T::Byte4B | T::Byte4C | T::Byte4E) => {
                self.tangents.push(read_byte_norm_xyzw(cursor)?);
            }
            (S::Tangent, T::Short4ToFloat4A) => self.tangents.push(read_short_norm_xyzw(cursor)?),

            (S::Bitangent, T::Byte4A | T::Byte4B | T::Byte4C | T::Byte4E) => {
                self.bitangent = read_byte_norm_xyzw(cursor)?;
            }

            (S::VertexColor, T::Float4) => {
                let [r, g, b, a] = cursor.read_vec4()?.to_array();
                self.colors.push(VertexColor { r, g, b, a });
            }
            (S::VertexColor, T::Byte4A | T::Byte4C) => {
                let mut channels = [0.0; 4];
                for channel in &mut channels {
                    *channel = f32::from(cursor.read_u8()?) / 255.0;
                }
                let [r, g, b, a] = channels;
                self.colors.push(VertexColor { r, g, b, a });
            }

            (semantic, member_type) => {
                return Err(FlverError::unsupported(format!(
                    "{member_type:?} {semantic} vertex members"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn layout(members: &[(S, T)]) -> BufferLayout {
        let mut struct_offset = 0;
        let members = members
            .iter()
            .map(|&(semantic, member_type)| {
                let member = LayoutMember {
                    unk00: 0,
                    member_type,
                    semantic,
                    index: 0,
                    struct_offset,
                };
                struct_offset += member_type.size();
                member
            })
            .collect();
        BufferLayout { members }
    }

    fn decode(members: &[(S, T)], bytes: &[u8], uv_scale: f32) -> Result<Vertex> {
        let layout = layout(members);
        let mut cursor = BinaryCursor::new(bytes);
        let mut vertex = Vertex::with_capacity(2, 1, 1);
        vertex.read(&mut cursor, &layout, uv_scale)?;
        assert_eq!(cursor.position(), layout.size());
        Ok(vertex)
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_float_position_and_normal() {
        let bytes = floats(&[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.0, 5.0]);
        let vertex = decode(&[(S::Position, T::Float4), (S::Normal, T::Float4)], &bytes, 1024.0).unwrap();
        assert_eq!(vertex.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(vertex.normal, Vec3::Y);
        assert_eq!(vertex.normal_w, 5);
    }

    #[test]
    fn test_position_w_must_be_zero() {
        let bytes = floats(&[1.0, 2.0, 3.0, 1.0]);
        assert!(matches!(
            decode(&[(S::Position, T::Float4)], &bytes, 1024.0),
            Err(FlverError::Data(_))
        ));
    }

    #[test]
    fn test_fractional_normal_w() {
        let bytes = floats(&[0.0, 0.0, 1.0, 0.5]);
        assert!(matches!(
            decode(&[(S::Normal, T::Float4)], &bytes, 1024.0),
            Err(FlverError::Structural(_))
        ));
    }

    #[test_case(1024.0, 1.0; "before 0x2000F")]
    #[test_case(2048.0, 0.5; "from 0x2000F")]
    fn test_fixed_point_uv(scale: f32, expected: f32) {
        let vertex = decode(&[(S::Uv, T::Uv)], &[0x00, 0x04, 0x00, 0xFC], scale).unwrap();
        assert_eq!(vertex.uvs, vec![Vec3::new(expected, -expected, 0.0)]);
    }

    #[test]
    fn test_uv_pair_and_float4_push_two() {
        let mut bytes = Vec::new();
        for value in [1024i16, 0, 0, 2048] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let vertex = decode(&[(S::Uv, T::UvPair)], &bytes, 1024.0).unwrap();
        assert_eq!(vertex.uvs, vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]);

        let bytes = floats(&[0.25, 0.5, 0.75, 1.0]);
        let vertex = decode(&[(S::Uv, T::Float4)], &bytes, 1024.0).unwrap();
        assert_eq!(vertex.uvs, vec![Vec3::new(0.25, 0.5, 0.0), Vec3::new(0.75, 1.0, 0.0)]);
    }

    #[test]
    fn test_short4_uv_requires_zero_padding() {
        let mut bytes = Vec::new();
        for value in [2048i16, 1024, 0, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let vertex = decode(&[(S::Uv, T::Short4ToFloat4B)], &bytes, 2048.0).unwrap();
        assert_eq!(vertex.uvs, vec![Vec3::new(1.0, 0.5, 0.0)]);

        bytes[6] = 1;
        assert!(decode(&[(S::Uv, T::Short4ToFloat4B)], &bytes, 2048.0).is_err());
    }

    #[test]
    fn test_byte_normals() {
        let vertex = decode(&[(S::Normal, T::Byte4C)], &[254, 127, 0, 3], 1024.0).unwrap();
        assert_eq!(vertex.normal, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(vertex.normal_w, 3);

        // w first, then signed z, y, x
        let vertex = decode(&[(S::Normal, T::Short2ToFloat2)], &[7, 127, 0, 0x81], 1024.0).unwrap();
        assert_eq!(vertex.normal_w, 7);
        assert_eq!(vertex.normal, Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn test_short_normals() {
        let mut bytes = Vec::new();
        for value in [32767i16, 0, -32767, 2] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let vertex = decode(&[(S::Normal, T::Short4ToFloat4A)], &bytes, 1024.0).unwrap();
        assert_eq!(vertex.normal, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(vertex.normal_w, 2);

        let mut bytes = Vec::new();
        for value in [65534u16, 32767, 0, 1] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let vertex = decode(&[(S::Normal, T::Short4ToFloat4B)], &bytes, 1024.0).unwrap();
        assert_eq!(vertex.normal, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(vertex.normal_w, 1);
    }

    #[test]
    fn test_skinning() {
        let mut bytes = vec![127, 0, 0x81, 0];
        bytes.extend_from_slice(&[1, 0, 2, 0, 3, 0, 0xFF, 0xFF]);
        let vertex = decode(
            &[(S::BoneWeights, T::Byte4A), (S::BoneIndices, T::ShortBoneIndices)],
            &bytes,
            1024.0,
        )
        .unwrap();
        assert_eq!(vertex.bone_weights, [1.0, 0.0, -1.0, 0.0]);
        assert_eq!(vertex.bone_indices, [1, 2, 3, 0xFFFF]);

        let vertex = decode(
            &[(S::BoneWeights, T::Byte4C), (S::BoneIndices, T::Byte4E)],
            &[255, 0, 0, 0, 4, 5, 6, 7],
            1024.0,
        )
        .unwrap();
        assert_eq!(vertex.bone_weights, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(vertex.bone_indices, [4, 5, 6, 7]);
    }

    #[test]
    fn test_skinning_slots_are_distinct() {
        let vertex = decode(
            &[(S::BoneWeights, T::Byte4A), (S::BoneIndices, T::Byte4B)],
            &[10, 20, 30, 40, 1, 2, 3, 4],
            1024.0,
        )
        .unwrap();
        assert_eq!(vertex.bone_weights[2], 30.0 / 127.0);
        assert_eq!(vertex.bone_weights[3], 40.0 / 127.0);
        assert_eq!(vertex.bone_indices[2], 3);
        assert_eq!(vertex.bone_indices[3], 4);
    }

    #[test]
    fn test_tangents_bitangent_and_colors() {
        let mut bytes = vec![254, 127, 127, 0];
        bytes.extend_from_slice(&[127, 254, 127, 254]);
        bytes.extend_from_slice(&[255, 0, 0, 255]);
        let vertex = decode(
            &[
                (S::Tangent, T::Byte4B),
                (S::Bitangent, T::Byte4C),
                (S::VertexColor, T::Byte4A),
            ],
            &bytes,
            1024.0,
        )
        .unwrap();
        assert_eq!(vertex.tangents, vec![Vec4::new(1.0, 0.0, 0.0, -1.0)]);
        assert_eq!(vertex.bitangent, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(
            vertex.colors,
            vec![VertexColor {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            }]
        );
    }

    #[test]
    fn test_float_color() {
        let bytes = floats(&[0.1, 0.2, 0.3, 0.4]);
        let vertex = decode(&[(S::VertexColor, T::Float4)], &bytes, 1024.0).unwrap();
        assert_eq!(
            vertex.colors[0],
            VertexColor {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 0.4
            }
        );
    }

    #[test_case(S::Position, T::EdgeCompressed)]
    #[test_case(S::Position, T::Byte4A)]
    #[test_case(S::Bitangent, T::Float4)]
    #[test_case(S::VertexColor, T::Byte4B)]
    #[test_case(S::BoneIndices, T::Float4)]
    fn test_unsupported_pairs(semantic: S, member_type: T) {
        let bytes = vec![0; member_type.size()];
        assert!(matches!(
            decode(&[(semantic, member_type)], &bytes, 1024.0),
            Err(FlverError::Unsupported(_))
        ));
    }

    #[test]
    fn test_truncated_vertex() {
        assert!(matches!(
            decode(&[(S::Position, T::Float3)], &[0; 8], 1024.0),
            Err(FlverError::Data(souls_data::Error::UnexpectedEof { .. }))
        ));
    }
}
