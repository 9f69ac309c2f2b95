//! Fixture files shared by the CLI and loader tests

#![allow(dead_code)]

#[path = "../../../file-formats/archives/souls-bnd/tests/common/mod.rs"]
pub mod bnd;
#[path = "../../../file-formats/graphics/souls-flver/tests/common/mod.rs"]
pub mod flver;

use bnd::{Bnd4Builder, TestFile};
use flver::{BoneSpec, FlverBuilder};
use souls_dcx::DfltVariant;
use souls_dcx::test_utils::dcx_dflt;

pub const MODEL_NAME: &str = "N:\\FDP\\data\\Model\\chr\\c2000\\c2000.flver";
pub const TEXTURES_NAME: &str = "N:\\FDP\\data\\Model\\chr\\c2000\\c2000.tpf";

/// 0x80-byte DXT1 DDS header followed by `pixels` bytes of data
pub fn dds(width: u32, height: u32, pixels: usize) -> Vec<u8> {
    let mut out = b"DDS ".to_vec();
    for value in [0x7Cu32, 0x1007, height, width, 0, 0, 1] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[0u8; 44]);
    out.extend_from_slice(&32u32.to_le_bytes());
    out.extend_from_slice(&4u32.to_le_bytes());
    out.extend_from_slice(b"DXT1");
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&0x1000u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);
    out.resize(out.len() + pixels, 0x5A);
    out
}

/// PC texture container with UTF-16 names
pub fn tpf(textures: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let entries_end = 0x10 + 0x14 * textures.len();

    let mut names = Vec::new();
    let mut name_offsets = Vec::new();
    for (name, _) in textures {
        name_offsets.push(entries_end + names.len());
        for unit in name.encode_utf16().chain([0]) {
            names.extend_from_slice(&unit.to_le_bytes());
        }
    }

    let data_start = entries_end + names.len();
    let data_len: usize = textures.iter().map(|(_, bytes)| bytes.len()).sum();

    let mut out = b"TPF\0".to_vec();
    out.extend_from_slice(&(data_len as i32).to_le_bytes());
    out.extend_from_slice(&(textures.len() as i32).to_le_bytes());
    out.extend_from_slice(&[0, 3, 1, 0]);

    let mut offset = data_start;
    for (i, (_, bytes)) in textures.iter().enumerate() {
        out.extend_from_slice(&(offset as i32).to_le_bytes());
        out.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
        out.extend_from_slice(&[0, 0, 1, 0]);
        out.extend_from_slice(&(name_offsets[i] as i32).to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        offset += bytes.len();
    }
    out.extend_from_slice(&names);
    for (_, bytes) in textures {
        out.extend_from_slice(bytes);
    }
    out
}

/// The quad model with a two-bone skeleton
pub fn model() -> Vec<u8> {
    let mut builder = FlverBuilder::quad();
    builder.bones = vec![
        BoneSpec::new("Master", -1, 1, -1, -1),
        BoneSpec::new("Pelvis", 0, -1, -1, -1),
    ];
    builder.build()
}

/// A compressed character archive holding one model and one texture container
pub fn character() -> Vec<u8> {
    let archive = Bnd4Builder::default()
        .file(TestFile::new(200, MODEL_NAME, &model()).compressed())
        .file(TestFile::new(100, TEXTURES_NAME, &tpf(&[("c2000_a", dds(64, 64, 32))])))
        .build();
    dcx_dflt(&archive, DfltVariant::Dflt10000_24_9)
}
