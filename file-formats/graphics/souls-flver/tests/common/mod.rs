//! Hand-built FLVER2 files for integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

/// Layout type codes
pub mod ty {
    pub const FLOAT2: u32 = 0x01;
    pub const FLOAT3: u32 = 0x02;
    pub const FLOAT4: u32 = 0x03;
    pub const BYTE4A: u32 = 0x10;
    pub const BYTE4B: u32 = 0x11;
    pub const BYTE4C: u32 = 0x13;
    pub const UV: u32 = 0x15;
    pub const SHORT_BONE_INDICES: u32 = 0x18;
    pub const EDGE_COMPRESSED: u32 = 0xF0;
}

/// Layout semantic codes
pub mod sem {
    pub const POSITION: u32 = 0;
    pub const BONE_WEIGHTS: u32 = 1;
    pub const BONE_INDICES: u32 = 2;
    pub const NORMAL: u32 = 3;
    pub const UV: u32 = 5;
    pub const TANGENT: u32 = 6;
    pub const VERTEX_COLOR: u32 = 10;
}

fn type_size(code: u32) -> i32 {
    match code {
        ty::EDGE_COMPRESSED => 1,
        ty::FLOAT2 | ty::SHORT_BONE_INDICES => 8,
        ty::FLOAT3 => 12,
        ty::FLOAT4 => 16,
        _ => 4,
    }
}

/// Endian-aware byte sink
#[derive(Debug, Clone, Default)]
pub struct Out {
    pub buf: Vec<u8>,
    pub big: bool,
}

impl Out {
    pub fn new(big: bool) -> Self {
        Self { buf: Vec::new(), big }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn i16(&mut self, v: i16) {
        if self.big {
            self.buf.write_i16::<BigEndian>(v).unwrap();
        } else {
            self.buf.write_i16::<LittleEndian>(v).unwrap();
        }
    }

    pub fn u16(&mut self, v: u16) {
        if self.big {
            self.buf.write_u16::<BigEndian>(v).unwrap();
        } else {
            self.buf.write_u16::<LittleEndian>(v).unwrap();
        }
    }

    pub fn i32(&mut self, v: i32) {
        if self.big {
            self.buf.write_i32::<BigEndian>(v).unwrap();
        } else {
            self.buf.write_i32::<LittleEndian>(v).unwrap();
        }
    }

    pub fn u32(&mut self, v: u32) {
        if self.big {
            self.buf.write_u32::<BigEndian>(v).unwrap();
        } else {
            self.buf.write_u32::<LittleEndian>(v).unwrap();
        }
    }

    pub fn f32(&mut self, v: f32) {
        if self.big {
            self.buf.write_f32::<BigEndian>(v).unwrap();
        } else {
            self.buf.write_f32::<LittleEndian>(v).unwrap();
        }
    }

    pub fn vec3(&mut self, v: [f32; 3]) {
        for c in v {
            self.f32(c);
        }
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    pub fn string(&mut self, s: &str, unicode: bool) {
        if unicode {
            for unit in s.encode_utf16() {
                self.u16(unit);
            }
            self.u16(0);
        } else {
            self.bytes(s.as_bytes());
            self.u8(0);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialSpec {
    pub name: String,
    pub mtd: String,
    pub texture_index: i32,
    pub texture_count: i32,
    pub gx_list: Option<usize>,
}

impl MaterialSpec {
    pub fn new(name: &str, texture_index: i32, texture_count: i32) -> Self {
        Self {
            name: name.to_string(),
            mtd: format!("N:\\mtd\\{name}.mtd"),
            texture_index,
            texture_count,
            gx_list: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoneSpec {
    pub name: String,
    pub parent: i16,
    pub child: i16,
    pub next: i16,
    pub prev: i16,
}

impl BoneSpec {
    pub fn new(name: &str, parent: i16, child: i16, next: i16, prev: i16) -> Self {
        Self {
            name: name.to_string(),
            parent,
            child,
            next,
            prev,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshSpec {
    pub material: i32,
    pub bone_indices: Vec<i32>,
    pub face_sets: Vec<i32>,
    pub vertex_buffers: Vec<i32>,
    pub bounding_box: Option<[f32; 6]>,
}

#[derive(Debug, Clone, Default)]
pub struct FaceSetSpec {
    pub flags: u32,
    pub strip: bool,
    /// 0 defers to the header's index size
    pub index_size: i32,
    pub indices: Vec<u32>,
}

impl FaceSetSpec {
    pub fn list(indices: &[u32]) -> Self {
        Self {
            index_size: 16,
            indices: indices.to_vec(),
            ..Self::default()
        }
    }

    pub fn strip(indices: &[u32]) -> Self {
        Self {
            strip: true,
            ..Self::list(indices)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BufferSpec {
    pub buffer_index: i32,
    pub layout: i32,
    /// Defaults to the layout's size
    pub vertex_size: Option<i32>,
    pub vertex_count: i32,
    pub data: Vec<u8>,
}

impl BufferSpec {
    pub fn new(buffer_index: i32, layout: i32, vertex_count: i32, data: Vec<u8>) -> Self {
        Self {
            buffer_index,
            layout,
            vertex_size: None,
            vertex_count,
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureSpec {
    pub path: String,
    pub kind: String,
}

impl TextureSpec {
    pub fn new(kind: &str, path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlverBuilder {
    pub big_endian: bool,
    pub version: i32,
    pub unicode: bool,
    pub index_size: u8,
    pub dummies: usize,
    pub materials: Vec<MaterialSpec>,
    /// Each list is a set of (tag, payload) items
    pub gx_lists: Vec<Vec<([u8; 4], Vec<u8>)>>,
    pub bones: Vec<BoneSpec>,
    pub meshes: Vec<MeshSpec>,
    pub face_sets: Vec<FaceSetSpec>,
    pub vertex_buffers: Vec<BufferSpec>,
    /// Each layout is a list of (type, semantic)
    pub layouts: Vec<Vec<(u32, u32)>>,
    pub textures: Vec<TextureSpec>,
    pub extension_members: usize,
}

impl Default for FlverBuilder {
    fn default() -> Self {
        Self {
            big_endian: false,
            version: 0x20014,
            unicode: true,
            index_size: 16,
            dummies: 0,
            materials: Vec::new(),
            gx_lists: Vec::new(),
            bones: Vec::new(),
            meshes: Vec::new(),
            face_sets: Vec::new(),
            vertex_buffers: Vec::new(),
            layouts: Vec::new(),
            textures: Vec::new(),
            extension_members: 0,
        }
    }
}

/// Little-endian bytes of `values`
pub fn f32s(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

impl FlverBuilder {
    /// One material with one texture and one mesh: a quad of four
    /// `Float3` positions and `Uv` coordinates drawn as a triangle list.
    pub fn quad() -> Self {
        let mut data = Vec::new();
        for (i, (x, y)) in [(0.0f32, 0.0f32), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)].into_iter().enumerate() {
            data.extend(f32s(&[x, y, 0.0]));
            let u = (i as i16) * 512;
            data.extend_from_slice(&u.to_le_bytes());
            data.extend_from_slice(&1024i16.to_le_bytes());
        }
        Self {
            materials: vec![MaterialSpec::new("body", 0, 1)],
            textures: vec![TextureSpec::new("g_DiffuseTexture", "c2000_a.tif")],
            meshes: vec![MeshSpec {
                material: 0,
                face_sets: vec![0],
                vertex_buffers: vec![0],
                ..MeshSpec::default()
            }],
            face_sets: vec![FaceSetSpec::list(&[0, 1, 2, 0, 2, 3])],
            layouts: vec![vec![(ty::FLOAT3, sem::POSITION), (ty::UV, sem::UV)]],
            vertex_buffers: vec![BufferSpec::new(0, 0, 4, data)],
            ..Self::default()
        }
    }

    fn face_set_size(&self) -> usize {
        if self.version > 0x20005 { 0x20 } else { 0x10 }
    }

    fn tables_len(&self) -> usize {
        let extension = if self.version >= 0x2001A { 0x20 } else { 0 };
        0x80 + 0x40 * self.dummies
            + 0x20 * self.materials.len()
            + 0x80 * self.bones.len()
            + 0x30 * self.meshes.len()
            + self.face_set_size() * self.face_sets.len()
            + 0x20 * self.vertex_buffers.len()
            + 0x10 * self.layouts.len()
            + 0x20 * self.textures.len()
            + extension
    }

    pub fn build(&self) -> Vec<u8> {
        let big = self.big_endian;
        let aux_base = self.tables_len();
        let mut aux = Out::new(big);
        let mut data = Out::new(big);
        let mut tables = Out::new(big);

        macro_rules! aux_at {
            () => {
                (aux_base + aux.len()) as u32
            };
        }

        for i in 0..self.dummies {
            tables.vec3([i as f32, 0.0, 0.0]);
            tables.bytes(&[1, 2, 3, 4]);
            tables.vec3([0.0, 0.0, 1.0]);
            tables.i16(100 + i as i16);
            tables.i16(-1);
            tables.vec3([0.0, 1.0, 0.0]);
            tables.i16(-1);
            tables.u8(0);
            tables.u8(1);
            tables.i32(0);
            tables.i32(0);
            tables.i32(0);
            tables.i32(0);
        }

        let mut gx_offsets: HashMap<usize, u32> = HashMap::new();
        for material in &self.materials {
            let name_at = aux_at!();
            aux.string(&material.name, self.unicode);
            let mtd_at = aux_at!();
            aux.string(&material.mtd, self.unicode);
            let gx_at = match material.gx_list {
                None => 0,
                Some(index) => *gx_offsets.entry(index).or_insert_with(|| {
                    let at = (aux_base + aux.len()) as u32;
                    self.write_gx_list(&mut aux, &self.gx_lists[index]);
                    at
                }),
            };
            tables.u32(name_at);
            tables.u32(mtd_at);
            tables.i32(material.texture_count);
            tables.i32(material.texture_index);
            tables.i32(0);
            tables.u32(gx_at);
            tables.i32(0);
            tables.i32(0);
        }

        for bone in &self.bones {
            let name_at = aux_at!();
            aux.string(&bone.name, self.unicode);
            tables.vec3([0.0, 1.0, 0.0]);
            tables.u32(name_at);
            tables.vec3([0.0; 3]);
            tables.i16(bone.parent);
            tables.i16(bone.child);
            tables.vec3([1.0; 3]);
            tables.i16(bone.next);
            tables.i16(bone.prev);
            tables.vec3([-1.0; 3]);
            tables.i32(0);
            tables.vec3([1.0; 3]);
            tables.bytes(&[0; 0x34]);
        }

        for mesh in &self.meshes {
            let bbox_at = match mesh.bounding_box {
                None => 0,
                Some(values) => {
                    let at = aux_at!();
                    for v in values {
                        aux.f32(v);
                    }
                    if self.version >= 0x2001A {
                        aux.vec3([7.0, 8.0, 9.0]);
                    }
                    at
                }
            };
            let bones_at = aux_at!();
            mesh.bone_indices.iter().for_each(|&v| aux.i32(v));
            let face_sets_at = aux_at!();
            mesh.face_sets.iter().for_each(|&v| aux.i32(v));
            let buffers_at = aux_at!();
            mesh.vertex_buffers.iter().for_each(|&v| aux.i32(v));

            tables.bytes(&[1, 0, 0, 0]);
            tables.i32(mesh.material);
            tables.i32(0);
            tables.i32(0);
            tables.i32(-1);
            tables.i32(mesh.bone_indices.len() as i32);
            tables.u32(bbox_at);
            tables.u32(bones_at);
            tables.i32(mesh.face_sets.len() as i32);
            tables.u32(face_sets_at);
            tables.i32(mesh.vertex_buffers.len() as i32);
            tables.u32(buffers_at);
        }

        for face_set in &self.face_sets {
            let width = if face_set.index_size == 0 || self.version <= 0x20005 {
                i32::from(self.index_size)
            } else {
                face_set.index_size
            };
            let at = data.len() as i32;
            for &index in &face_set.indices {
                if width == 32 {
                    data.u32(index);
                } else {
                    data.u16(index as u16);
                }
            }
            tables.u32(face_set.flags);
            tables.u8(u8::from(face_set.strip));
            tables.u8(1);
            tables.i16(0);
            tables.i32(face_set.indices.len() as i32);
            tables.i32(at);
            if self.version > 0x20005 {
                tables.i32(face_set.indices.len() as i32 * width / 8);
                tables.i32(0);
                tables.i32(face_set.index_size);
                tables.i32(0);
            }
        }

        for buffer in &self.vertex_buffers {
            let layout_size = self
                .layouts
                .get(buffer.layout as usize)
                .map_or(0, |l| l.iter().map(|&(t, _)| type_size(t)).sum());
            let at = data.len() as i32;
            data.bytes(&buffer.data);
            tables.i32(buffer.buffer_index);
            tables.i32(buffer.layout);
            tables.i32(buffer.vertex_size.unwrap_or(layout_size));
            tables.i32(buffer.vertex_count);
            tables.i32(0);
            tables.i32(0);
            tables.i32(buffer.data.len() as i32);
            tables.i32(at);
        }

        for layout in &self.layouts {
            let members_at = aux_at!();
            let mut struct_offset = 0;
            for &(member_type, semantic) in layout {
                aux.i32(0);
                aux.i32(struct_offset);
                aux.u32(member_type);
                aux.u32(semantic);
                aux.i32(0);
                struct_offset += type_size(member_type);
            }
            tables.i32(layout.len() as i32);
            tables.i32(0);
            tables.i32(0);
            tables.u32(members_at);
        }

        for texture in &self.textures {
            let path_at = aux_at!();
            aux.string(&texture.path, self.unicode);
            let kind_at = aux_at!();
            aux.string(&texture.kind, self.unicode);
            tables.u32(path_at);
            tables.u32(kind_at);
            tables.f32(1.0);
            tables.f32(1.0);
            tables.bytes(&[1, 0, 0, 0]);
            tables.f32(0.0);
            tables.f32(0.0);
            tables.f32(0.0);
        }

        if self.version >= 0x2001A {
            let mut offsets = [0u32; 2];
            for offset in &mut offsets {
                *offset = aux_at!();
                for i in 0..self.extension_members {
                    for v in [1i16, 2, 3, 4] {
                        aux.i16(v);
                    }
                    aux.i32(i as i32);
                    aux.i32(0);
                }
            }
            tables.i16(self.extension_members as i16);
            tables.i16(self.extension_members as i16);
            tables.u32(offsets[0]);
            tables.u32(offsets[1]);
            for _ in 0..5 {
                tables.i32(0);
            }
        }

        let data_offset = aux_base + aux.len();
        let mut out = Out::new(big);
        out.bytes(b"FLVER\0");
        out.bytes(if big { b"B\0" } else { b"L\0" });
        out.i32(self.version);
        out.i32(data_offset as i32);
        out.i32(data.len() as i32);
        out.i32(self.dummies as i32);
        out.i32(self.materials.len() as i32);
        out.i32(self.bones.len() as i32);
        out.i32(self.meshes.len() as i32);
        out.i32(self.vertex_buffers.len() as i32);
        out.vec3([-1.0; 3]);
        out.vec3([1.0; 3]);
        out.i32(2);
        out.i32(2);
        out.u8(self.index_size);
        out.u8(u8::from(self.unicode));
        out.u8(0);
        out.u8(0);
        out.i32(0);
        out.i32(self.face_sets.len() as i32);
        out.i32(self.layouts.len() as i32);
        out.i32(self.textures.len() as i32);
        out.bytes(&[0, 0, 0, 0]);
        for _ in 0..8 {
            out.i32(0);
        }
        assert_eq!(out.len(), 0x80);

        out.bytes(&tables.buf);
        assert_eq!(out.len(), aux_base);
        out.bytes(&aux.buf);
        out.bytes(&data.buf);
        out.buf
    }

    fn write_gx_list(&self, aux: &mut Out, items: &[([u8; 4], Vec<u8>)]) {
        if self.version < 0x20010 {
            let (tag, payload) = &items[0];
            aux.i32(i32::from_le_bytes(*tag));
            aux.i32(100);
            aux.i32(0xC + payload.len() as i32);
            aux.bytes(payload);
            return;
        }
        for (tag, payload) in items {
            aux.bytes(tag);
            aux.i32(100);
            aux.i32(0xC + payload.len() as i32);
            aux.bytes(payload);
        }
        aux.i32(i32::MAX);
        aux.i32(100);
        aux.i32(0xC + 4);
        aux.i32(0);
    }
}
