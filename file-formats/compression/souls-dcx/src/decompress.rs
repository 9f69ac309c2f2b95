//! Container unwrapping for every supported variant

use std::io::Read;

use flate2::read::DeflateDecoder;
use souls_data::{BinaryCursor, Endian};

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::kind::{self, CompressionType, DfltVariant, ZLIB_LEVELS};

/// Upper bound on speculative output preallocation
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Output of [`decompress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    /// Variant the input was wrapped in
    pub kind: CompressionType,
    /// Uncompressed payload
    pub data: Vec<u8>,
}

/// One block of an EDGE chunk table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeChunk {
    offset: usize,
    size: usize,
    compressed: bool,
}

/// Strip the compression wrapper from `data`.
///
/// `codec` is consulted only for `DcxKrak` containers; pass
/// [`NoCodec`](crate::NoCodec) when none is available.
pub fn decompress(data: &[u8], codec: &dyn Codec) -> Result<Decompressed> {
    let kind = kind::detect(data).ok_or_else(|| kind::unrecognised(data))?;
    log::debug!("Decompressing {} byte {} container", data.len(), kind);

    let mut cursor = BinaryCursor::with_endian(data, Endian::Big);
    let data = match kind {
        CompressionType::Zlib => read_zlib(&mut cursor, data.len(), None)?,
        CompressionType::DcpDflt => read_dcp_dflt(&mut cursor)?,
        CompressionType::DcpEdge => read_dcp_edge(&mut cursor)?,
        CompressionType::DcxEdge => read_dcx_edge(&mut cursor)?,
        CompressionType::DcxDflt(variant) => read_dcx_dflt(&mut cursor, variant)?,
        CompressionType::DcxKrak => read_dcx_krak(&mut cursor, codec)?,
    };

    log::trace!("{} container produced {} bytes", kind, data.len());
    Ok(Decompressed { kind, data })
}

pub(crate) fn to_size(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::structural(format!("negative {what}: {value}")))
}

/// Read the `DCS` block: declared uncompressed and compressed sizes.
fn read_sizes(cursor: &mut BinaryCursor<'_>) -> Result<(usize, usize)> {
    cursor.assert_ascii(&["DCS\0"])?;
    let uncompressed = to_size(cursor.read_i32()?, "uncompressed size")?;
    let compressed = to_size(cursor.read_i32()?, "compressed size")?;
    Ok((uncompressed, compressed))
}

fn read_zlib(
    cursor: &mut BinaryCursor<'_>,
    compressed_len: usize,
    expected: Option<usize>,
) -> Result<Vec<u8>> {
    cursor.assert_u8(&[0x78])?;
    cursor.assert_u8(&ZLIB_LEVELS)?;
    let body_len = compressed_len
        .checked_sub(2)
        .ok_or_else(|| Error::structural("zlib stream shorter than its header"))?;
    let body = cursor.read_bytes(body_len)?;
    inflate(body, expected)
}

/// Inflate a raw deflate stream, checking the output length when one is declared.
fn inflate(body: &[u8], expected: Option<usize>) -> Result<Vec<u8>> {
    let capacity = expected.unwrap_or(body.len() * 2).min(MAX_PREALLOC);
    let mut output = Vec::with_capacity(capacity);
    DeflateDecoder::new(body)
        .read_to_end(&mut output)
        .map_err(|e| {
            log::debug!("Deflate failed after {} bytes: {e}", output.len());
            Error::Inflate(e)
        })?;
    if let Some(expected) = expected
        && output.len() != expected
    {
        return Err(Error::SizeMismatch {
            expected,
            actual: output.len(),
        });
    }
    Ok(output)
}

fn read_dcp_dflt(cursor: &mut BinaryCursor<'_>) -> Result<Vec<u8>> {
    cursor.assert_ascii(&["DCP\0"])?;
    cursor.assert_ascii(&["DFLT"])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_i32(&[0x0900_0000])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0x0001_0100])?;
    let (uncompressed, compressed) = read_sizes(cursor)?;
    cursor.assert_ascii(&["DCA\0"])?;
    cursor.assert_i32(&[8])?;
    read_zlib(cursor, compressed, Some(uncompressed))
}

fn read_dcp_edge(cursor: &mut BinaryCursor<'_>) -> Result<Vec<u8>> {
    cursor.assert_ascii(&["DCP\0"])?;
    cursor.assert_ascii(&["EDGE"])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_i32(&[0x0900_0000])?;
    cursor.assert_i32(&[0x10000])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0x0010_0100])?;
    let (uncompressed, compressed) = read_sizes(cursor)?;
    cursor.assert_i32(&[0])?;
    let data_start = cursor.position();
    cursor.skip(compressed)?;

    cursor.assert_ascii(&["DCA\0"])?;
    let _dca_size = cursor.read_i32()?;
    cursor.assert_ascii(&["EgdT"])?;
    cursor.assert_i32(&[0x0001_0000])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_i32(&[0x10])?;
    cursor.assert_i32(&[0x10000])?;
    let egdt_size = cursor.read_i32()?;
    let chunk_count = to_size(cursor.read_i32()?, "chunk count")?;
    cursor.assert_i32(&[0x0010_0000])?;

    if i64::from(egdt_size) != 0x20 + 0x10 * chunk_count as i64 {
        return Err(Error::structural(format!(
            "EgdT size {egdt_size:#x} does not match {chunk_count} chunks"
        )));
    }

    let chunks = read_edge_chunks(cursor, chunk_count)?;
    inflate_edge_chunks(cursor, data_start, &chunks, uncompressed)
}

fn read_dcx_edge(cursor: &mut BinaryCursor<'_>) -> Result<Vec<u8>> {
    cursor.assert_ascii(&["DCX\0"])?;
    cursor.assert_i32(&[0x10000])?;
    cursor.assert_i32(&[0x18])?;
    cursor.assert_i32(&[0x24])?;
    cursor.assert_i32(&[0x24])?;
    let unk1 = cursor.read_i32()?;
    let (uncompressed, _compressed) = read_sizes(cursor)?;
    cursor.assert_ascii(&["DCP\0"])?;
    cursor.assert_ascii(&["EDGE"])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_i32(&[0x0900_0000])?;
    cursor.assert_i32(&[0x10000])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0x0010_0100])?;

    let dca_start = cursor.position();
    cursor.assert_ascii(&["DCA\0"])?;
    let dca_size = to_size(cursor.read_i32()?, "DCA size")?;
    cursor.assert_ascii(&["EgdT"])?;
    cursor.assert_i32(&[0x0001_0100])?;
    cursor.assert_i32(&[0x24])?;
    cursor.assert_i32(&[0x10])?;
    cursor.assert_i32(&[0x10000])?;
    // Size of the last block; some writers store a full block instead
    let last_block = (uncompressed % 0x10000) as i32;
    cursor.assert_i32(&[last_block, 0x10000])?;
    let egdt_size = cursor.read_i32()?;
    let chunk_count = to_size(cursor.read_i32()?, "chunk count")?;
    cursor.assert_i32(&[0x0010_0000])?;

    let table = 0x10 * chunk_count as i64;
    if i64::from(unk1) != 0x50 + table {
        return Err(Error::structural(format!(
            "DCX header size {unk1:#x} does not match {chunk_count} chunks"
        )));
    }
    if i64::from(egdt_size) != 0x24 + table {
        return Err(Error::structural(format!(
            "EgdT size {egdt_size:#x} does not match {chunk_count} chunks"
        )));
    }

    let chunks = read_edge_chunks(cursor, chunk_count)?;
    inflate_edge_chunks(cursor, dca_start + dca_size, &chunks, uncompressed)
}

fn read_dcx_dflt(cursor: &mut BinaryCursor<'_>, variant: DfltVariant) -> Result<Vec<u8>> {
    let (unk04, unk10, unk30, unk38) = variant.signature();
    cursor.assert_ascii(&["DCX\0"])?;
    cursor.assert_i32(&[unk04])?;
    cursor.assert_i32(&[0x18])?;
    cursor.assert_i32(&[0x24])?;
    cursor.assert_i32(&[unk10])?;
    cursor.assert_i32(&[variant.unk14()])?;
    let (uncompressed, compressed) = read_sizes(cursor)?;
    cursor.assert_ascii(&["DCP\0"])?;
    cursor.assert_ascii(&["DFLT"])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_u8(&[unk30])?;
    cursor.assert_pattern(3, 0)?;
    cursor.assert_i32(&[0])?;
    cursor.assert_u8(&[unk38])?;
    cursor.assert_pattern(3, 0)?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0x0001_0100])?;
    cursor.assert_ascii(&["DCA\0"])?;
    let _header_len = cursor.read_i32()?;
    read_zlib(cursor, compressed, Some(uncompressed))
}

fn read_dcx_krak(cursor: &mut BinaryCursor<'_>, codec: &dyn Codec) -> Result<Vec<u8>> {
    cursor.assert_ascii(&["DCX\0"])?;
    cursor.assert_i32(&[0x11000])?;
    cursor.assert_i32(&[0x18])?;
    cursor.assert_i32(&[0x24])?;
    cursor.assert_i32(&[0x44])?;
    cursor.assert_i32(&[0x4C])?;
    let (uncompressed, compressed) = read_sizes(cursor)?;
    cursor.assert_ascii(&["DCP\0"])?;
    cursor.assert_ascii(&["KRAK"])?;
    cursor.assert_i32(&[0x20])?;
    cursor.assert_i32(&[0x0600_0000])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0])?;
    cursor.assert_i32(&[0x0001_0100])?;
    cursor.assert_ascii(&["DCA\0"])?;
    cursor.assert_i32(&[8])?;
    let payload = cursor.read_bytes(compressed)?;

    let output = codec
        .decompress(payload, uncompressed)
        .map_err(|source| Error::Codec {
            codec: codec.name().to_string(),
            source,
        })?;
    if output.len() != uncompressed {
        return Err(Error::Codec {
            codec: codec.name().to_string(),
            source: format!(
                "returned {} bytes, container declares {uncompressed}",
                output.len()
            )
            .into(),
        });
    }
    Ok(output)
}

fn read_edge_chunks(cursor: &mut BinaryCursor<'_>, count: usize) -> Result<Vec<EdgeChunk>> {
    let mut chunks = Vec::with_capacity(count.min(cursor.remaining() / 0x10));
    for _ in 0..count {
        cursor.assert_i32(&[0])?;
        let offset = to_size(cursor.read_i32()?, "chunk offset")?;
        let size = to_size(cursor.read_i32()?, "chunk size")?;
        let compressed = cursor.assert_i32(&[0, 1])? == 1;
        chunks.push(EdgeChunk {
            offset,
            size,
            compressed,
        });
    }
    Ok(chunks)
}

fn inflate_edge_chunks(
    cursor: &mut BinaryCursor<'_>,
    base: usize,
    chunks: &[EdgeChunk],
    uncompressed: usize,
) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(uncompressed.min(MAX_PREALLOC));
    for (index, chunk) in chunks.iter().enumerate() {
        let bytes = cursor.get_bytes(base + chunk.offset, chunk.size)?;
        log::trace!(
            "EDGE chunk {index}: {} bytes at {:#x}, compressed: {}",
            chunk.size,
            base + chunk.offset,
            chunk.compressed
        );
        if chunk.compressed {
            output.extend_from_slice(&inflate(bytes, None)?);
        } else {
            output.extend_from_slice(bytes);
        }
    }
    if output.len() != uncompressed {
        return Err(Error::SizeMismatch {
            expected: uncompressed,
            actual: output.len(),
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NoCodec;
    use flate2::Compression;
    use flate2::write::DeflateEncoder;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).expect("Compression failed");
        encoder.finish().expect("Compression failed")
    }

    #[test]
    fn test_inflate_checks_declared_size() {
        let body = deflate(b"hello world");
        assert_eq!(inflate(&body, Some(11)).unwrap(), b"hello world");
        assert!(matches!(
            inflate(&body, Some(12)),
            Err(Error::SizeMismatch {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn test_inflate_rejects_garbage() {
        assert!(matches!(
            inflate(&[0xFF, 0xFF, 0xFF, 0xFF], None),
            Err(Error::Inflate(_))
        ));
    }

    #[test]
    fn test_zlib_header_is_asserted() {
        let data = [0x78, 0x00, 0x03, 0x00];
        let mut cursor = BinaryCursor::with_endian(&data, Endian::Big);
        assert!(matches!(
            read_zlib(&mut cursor, 4, None),
            Err(Error::Data(souls_data::Error::FormatMismatch { offset: 1, .. }))
        ));
    }

    #[test]
    fn test_uncompressed_data_is_rejected() {
        assert!(matches!(
            decompress(b"FLVER\0L\0", &NoCodec),
            Err(Error::NotCompressed(_))
        ));
    }

    #[test]
    fn test_negative_size_is_structural() {
        assert!(matches!(to_size(-1, "chunk size"), Err(Error::Structural(_))));
        assert_eq!(to_size(0x10, "chunk size").unwrap(), 0x10);
    }
}
