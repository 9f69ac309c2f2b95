//! Fixture writers for tests in this and downstream crates.
//!
//! These produce containers that [`decompress`](crate::decompress) accepts,
//! using the `flate2` encoders for the deflate payloads.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::{DeflateEncoder, ZlibEncoder};

use crate::kind::DfltVariant;

/// Chunk size used by `DCX` EDGE containers
pub const EDGE_CHUNK_SIZE: usize = 0x10000;

/// Encode `data` as a zlib stream (`78 9C` header)
pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("Compression failed");
    encoder.finish().expect("Compression failed")
}

/// Encode `data` as a raw deflate stream
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("Compression failed");
    encoder.finish().expect("Compression failed")
}

fn put_i32(out: &mut Vec<u8>, value: i32) {
    out.write_i32::<BigEndian>(value).expect("Vec write failed");
}

fn len_i32(len: usize) -> i32 {
    i32::try_from(len).expect("fixture too large")
}

/// Wrap `data` in a `DCX` deflate container of the given variant
pub fn dcx_dflt(data: &[u8], variant: DfltVariant) -> Vec<u8> {
    let (unk04, unk10, unk30, unk38) = variant.signature();
    let stream = zlib(data);
    let mut out = b"DCX\0".to_vec();
    for value in [unk04, 0x18, 0x24, unk10, variant.unk14()] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCS\0");
    put_i32(&mut out, len_i32(data.len()));
    put_i32(&mut out, len_i32(stream.len()));
    out.extend_from_slice(b"DCP\0DFLT");
    put_i32(&mut out, 0x20);
    out.extend_from_slice(&[unk30, 0, 0, 0]);
    put_i32(&mut out, 0);
    out.extend_from_slice(&[unk38, 0, 0, 0]);
    put_i32(&mut out, 0);
    put_i32(&mut out, 0x0001_0100);
    out.extend_from_slice(b"DCA\0");
    put_i32(&mut out, 8);
    out.extend_from_slice(&stream);
    out
}

/// Wrap `data` in a `DCP` deflate container
pub fn dcp_dflt(data: &[u8]) -> Vec<u8> {
    let stream = zlib(data);
    let mut out = b"DCP\0DFLT".to_vec();
    for value in [0x20, 0x0900_0000, 0, 0, 0, 0x0001_0100] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCS\0");
    put_i32(&mut out, len_i32(data.len()));
    put_i32(&mut out, len_i32(stream.len()));
    out.extend_from_slice(b"DCA\0");
    put_i32(&mut out, 8);
    out.extend_from_slice(&stream);
    out
}

/// Deflate `data` in chunks; returns the concatenated blocks and the
/// `(offset, size)` of each.
fn edge_blocks(data: &[u8], chunk_size: usize) -> (Vec<u8>, Vec<(usize, usize)>) {
    let mut blocks = Vec::new();
    let mut table = Vec::new();
    for chunk in data.chunks(chunk_size) {
        let block = deflate(chunk);
        table.push((blocks.len(), block.len()));
        blocks.extend_from_slice(&block);
    }
    (blocks, table)
}

fn put_edge_table(out: &mut Vec<u8>, table: &[(usize, usize)]) {
    for &(offset, size) in table {
        put_i32(out, 0);
        put_i32(out, len_i32(offset));
        put_i32(out, len_i32(size));
        put_i32(out, 1);
    }
}

/// Wrap `data` in a `DCP` EDGE container split into `chunk_size` blocks
pub fn dcp_edge(data: &[u8], chunk_size: usize) -> Vec<u8> {
    let (blocks, table) = edge_blocks(data, chunk_size);
    let egdt_size = 0x20 + 0x10 * len_i32(table.len());
    let mut out = b"DCP\0EDGE".to_vec();
    for value in [0x20, 0x0900_0000, 0x10000, 0, 0, 0x0010_0100] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCS\0");
    put_i32(&mut out, len_i32(data.len()));
    put_i32(&mut out, len_i32(blocks.len()));
    put_i32(&mut out, 0);
    out.extend_from_slice(&blocks);
    out.extend_from_slice(b"DCA\0");
    put_i32(&mut out, 8 + egdt_size);
    out.extend_from_slice(b"EgdT");
    for value in [0x0001_0000, 0x20, 0x10, 0x10000, egdt_size] {
        put_i32(&mut out, value);
    }
    put_i32(&mut out, len_i32(table.len()));
    put_i32(&mut out, 0x0010_0000);
    put_edge_table(&mut out, &table);
    out
}

/// Wrap `data` in a `DCX` EDGE container with 64 KiB blocks
pub fn dcx_edge(data: &[u8]) -> Vec<u8> {
    let (blocks, table) = edge_blocks(data, EDGE_CHUNK_SIZE);
    let count = len_i32(table.len());
    let egdt_size = 0x24 + 0x10 * count;
    let last_block = match data.len() % EDGE_CHUNK_SIZE {
        0 => EDGE_CHUNK_SIZE,
        rest => rest,
    };
    let mut out = b"DCX\0".to_vec();
    for value in [0x10000, 0x18, 0x24, 0x24, 0x50 + 0x10 * count] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCS\0");
    put_i32(&mut out, len_i32(data.len()));
    put_i32(&mut out, len_i32(blocks.len()));
    out.extend_from_slice(b"DCP\0EDGE");
    for value in [0x20, 0x0900_0000, 0x10000, 0, 0, 0x0010_0100] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCA\0");
    put_i32(&mut out, 8 + egdt_size);
    out.extend_from_slice(b"EgdT");
    for value in [0x0001_0100, 0x24, 0x10, 0x10000, len_i32(last_block), egdt_size, count] {
        put_i32(&mut out, value);
    }
    put_i32(&mut out, 0x0010_0000);
    put_edge_table(&mut out, &table);
    out.extend_from_slice(&blocks);
    out
}

/// Wrap an opaque payload in a `DCX` Kraken container
pub fn dcx_krak(payload: &[u8], uncompressed_len: usize) -> Vec<u8> {
    let mut out = b"DCX\0".to_vec();
    for value in [0x11000, 0x18, 0x24, 0x44, 0x4C] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCS\0");
    put_i32(&mut out, len_i32(uncompressed_len));
    put_i32(&mut out, len_i32(payload.len()));
    out.extend_from_slice(b"DCP\0KRAK");
    for value in [0x20, 0x0600_0000, 0, 0, 0, 0x0001_0100] {
        put_i32(&mut out, value);
    }
    out.extend_from_slice(b"DCA\0");
    put_i32(&mut out, 8);
    out.extend_from_slice(payload);
    out
}
