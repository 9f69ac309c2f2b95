//! Integration tests for BND4 reading against hand-built archives

mod common;

use common::{Bnd4Builder, TestFile};
use pretty_assertions::assert_eq;
use souls_bnd::{Bnd4, Error, FileFlags, Format, NO_ID};
use souls_dcx::{CompressionType, DfltVariant, NoCodec};
use test_log::test;

#[test]
fn test_empty_archive() {
    let data = Bnd4Builder::default().build();
    assert!(Bnd4::is(&data));
    let archive = Bnd4::read(&data, &NoCodec).unwrap();
    assert!(archive.is_empty());
    assert_eq!(archive.header.file_count, 0);
    assert_eq!(archive.header.version, "16D14J5");
}

#[test]
fn test_unicode_names_and_ids() {
    let data = Bnd4Builder::default()
        .file(TestFile::new(200, r"N:\FDP\data\chr\c0000\c0000.flver", b"FLVER\0L\0"))
        .file(TestFile::new(300, r"N:\FDP\data\chr\c0000\c0000.tpf", b"TPF\0"))
        .build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();

    assert_eq!(archive.len(), 2);
    assert!(archive.header.unicode);
    assert_eq!(
        archive.header.format,
        Format::IDS | Format::NAMES1 | Format::NAMES2 | Format::COMPRESSION
    );

    let flver = &archive.files[0];
    assert_eq!(flver.id, 200);
    assert_eq!(flver.file_name(), Some("c0000.flver"));
    assert_eq!(flver.data, b"FLVER\0L\0");
    assert_eq!(flver.flags, FileFlags::FLAG1);
    assert_eq!(flver.compression, None);

    assert_eq!(archive.file_by_name("c0000.tpf").unwrap().id, 300);
    assert_eq!(archive.file_by_id(200).unwrap().data.len(), 8);
    assert!(archive.file_by_name("missing.tpf").is_none());
}

#[test]
fn test_big_endian_shift_jis_long_offsets() {
    let builder = Bnd4Builder {
        big_endian: true,
        bit_big_endian: true,
        unicode: false,
        format: Format::BIG_ENDIAN | Format::IDS | Format::NAMES1 | Format::LONG_OFFSETS,
        ..Bnd4Builder::default()
    };
    let data = builder
        .file(TestFile::new(1, "a.bin", &[1, 2, 3]))
        .file(TestFile::new(2, "b.bin", &[4, 5, 6, 7]))
        .build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();

    assert!(archive.header.big_endian);
    assert_eq!(archive.files[0].name.as_deref(), Some("a.bin"));
    assert_eq!(archive.files[1].id, 2);
    assert_eq!(archive.files[1].data, vec![4, 5, 6, 7]);
}

#[test]
fn test_compressed_entry_is_unwrapped() {
    let payload: Vec<u8> = (0..2000u32).map(|i| (i % 13) as u8).collect();
    let data = Bnd4Builder::default()
        .file(TestFile::new(0, "packed.bin", &payload).compressed())
        .file(TestFile::new(1, "plain.bin", b"plain"))
        .build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();

    let packed = &archive.files[0];
    assert!(packed.flags.is_compressed());
    assert_eq!(
        packed.compression,
        Some(CompressionType::DcxDflt(DfltVariant::Dflt11000_44_9))
    );
    assert_eq!(packed.data, payload);
    assert_eq!(archive.files[1].data, b"plain");
}

#[test]
fn test_names1_only_reads_trailing_id() {
    let builder = Bnd4Builder {
        format: Format::NAMES1,
        ..Bnd4Builder::default()
    };
    let data = builder.file(TestFile::new(77, "only.bin", b"x")).build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();
    assert_eq!(archive.files[0].id, 77);
    assert_eq!(archive.files[0].data, b"x");
}

#[test]
fn test_no_ids_uses_sentinel() {
    let builder = Bnd4Builder {
        format: Format::NAMES1 | Format::NAMES2,
        ..Bnd4Builder::default()
    };
    let data = builder.file(TestFile::new(5, "noid.bin", b"y")).build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();
    assert_eq!(archive.files[0].id, NO_ID);
}

#[test]
fn test_hash_table_is_validated() {
    let builder = Bnd4Builder {
        extended: 4,
        ..Bnd4Builder::default()
    };
    let data = builder.file(TestFile::new(0, "h.bin", b"hash")).build();
    let archive = Bnd4::read(&data, &NoCodec).unwrap();
    assert!(archive.header.hash_table_offset.is_some());
    assert_eq!(archive.files[0].data, b"hash");

    let offset = archive.header.hash_table_offset.unwrap() as usize;
    let mut broken = data.clone();
    broken[offset + 12] = 0x20;
    assert!(matches!(
        Bnd4::read(&broken, &NoCodec),
        Err(Error::Data(souls_data::Error::FormatMismatch { .. }))
    ));
}

#[test]
fn test_header_size_mismatch_is_fatal() {
    let mut data = Bnd4Builder::default().build();
    data[0x20..0x28].copy_from_slice(&0x30i64.to_le_bytes());
    let err = Bnd4::read(&data, &NoCodec).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(
        err,
        Error::HeaderSizeMismatch {
            expected: 0x24,
            actual: 0x30,
            ..
        }
    ));
}

#[test]
fn test_corrupt_record_padding() {
    let mut data = Bnd4Builder::default()
        .file(TestFile::new(0, "a", b"a"))
        .build();
    data[0x41] = 1;
    let err = Bnd4::read(&data, &NoCodec).unwrap_err();
    match err {
        Error::Data(souls_data::Error::FormatMismatch { offset, .. }) => assert_eq!(offset, 0x41),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_corrupt_compressed_entry_reports_index() {
    let mut data = Bnd4Builder::default()
        .file(TestFile::new(0, "ok.bin", b"fine"))
        .file(TestFile::new(1, "bad.bin", &[7u8; 64]).compressed())
        .build();
    let dcx = data
        .windows(4)
        .position(|w| w == b"DCX\0")
        .expect("compressed entry present");
    // Break the constant 0x18 that follows the container version
    data[dcx + 8] = 0x99;
    let err = Bnd4::read(&data, &NoCodec).unwrap_err();
    assert!(matches!(
        err,
        Error::Decompress {
            index: 1,
            source: souls_dcx::Error::Data(_)
        }
    ));
}

#[test]
fn test_truncated_archive() {
    let data = Bnd4Builder::default()
        .file(TestFile::new(0, "a", b"abc"))
        .build();
    assert!(Bnd4::read(&data[..0x50], &NoCodec).is_err());
    assert!(!Bnd4::is(b"BND"));
    assert!(!Bnd4::is(b"BND3...."));
}
