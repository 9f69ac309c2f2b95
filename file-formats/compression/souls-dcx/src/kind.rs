//! Compression variant detection

use std::fmt;

use souls_data::{BinaryCursor, Endian};

/// Second byte of a zlib stream header accepted after `0x78`
pub const ZLIB_LEVELS: [u8; 4] = [0x01, 0x5E, 0x9C, 0xDA];

/// `DCX` deflate variants, keyed by the header tuple
/// (`unk04`, `unk10`, `unk30`, `unk38`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DfltVariant {
    /// `(0x10000, 0x24, 9, 0)`
    Dflt10000_24_9,
    /// `(0x10000, 0x44, 9, 0)`
    Dflt10000_44_9,
    /// `(0x11000, 0x44, 8, 0)`
    Dflt11000_44_8,
    /// `(0x11000, 0x44, 9, 0)`
    Dflt11000_44_9,
    /// `(0x11000, 0x44, 9, 15)`
    Dflt11000_44_9_15,
}

impl DfltVariant {
    /// All variants in detection order
    pub const ALL: [Self; 5] = [
        Self::Dflt10000_24_9,
        Self::Dflt10000_44_9,
        Self::Dflt11000_44_8,
        Self::Dflt11000_44_9,
        Self::Dflt11000_44_9_15,
    ];

    /// Header tuple `(unk04, unk10, unk30, unk38)` identifying the variant
    pub fn signature(self) -> (i32, i32, u8, u8) {
        match self {
            Self::Dflt10000_24_9 => (0x10000, 0x24, 9, 0),
            Self::Dflt10000_44_9 => (0x10000, 0x44, 9, 0),
            Self::Dflt11000_44_8 => (0x11000, 0x44, 8, 0),
            Self::Dflt11000_44_9 => (0x11000, 0x44, 9, 0),
            Self::Dflt11000_44_9_15 => (0x11000, 0x44, 9, 15),
        }
    }

    /// Value of the `unk14` header field
    pub fn unk14(self) -> i32 {
        match self {
            Self::Dflt10000_24_9 => 0x2C,
            _ => 0x4C,
        }
    }

    /// Look a variant up by its header tuple
    pub fn from_signature(signature: (i32, i32, u8, u8)) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.signature() == signature)
    }
}

/// Kind of compressed container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
    /// Bare zlib stream
    Zlib,
    /// `DCP` with a single deflate stream
    DcpDflt,
    /// `DCP` with chunked EDGE deflate
    DcpEdge,
    /// `DCX` with chunked EDGE deflate
    DcxEdge,
    /// `DCX` with a single deflate stream
    DcxDflt(DfltVariant),
    /// `DCX` with an externally decoded Kraken payload
    DcxKrak,
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zlib => write!(f, "Zlib"),
            Self::DcpDflt => write!(f, "DCP_DFLT"),
            Self::DcpEdge => write!(f, "DCP_EDGE"),
            Self::DcxEdge => write!(f, "DCX_EDGE"),
            Self::DcxKrak => write!(f, "DCX_KRAK"),
            Self::DcxDflt(variant) => {
                let (unk04, unk10, unk30, unk38) = variant.signature();
                write!(f, "DCX_DFLT_{:X}_{:X}_{}", unk04, unk10, unk30)?;
                if unk38 != 0 {
                    write!(f, "_{unk38}")?;
                }
                Ok(())
            }
        }
    }
}

/// Sizes recorded in a container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Detected variant
    pub kind: CompressionType,
    /// Declared payload size, or the whole buffer for bare zlib
    pub compressed_len: usize,
    /// Declared output size; bare zlib does not record one
    pub uncompressed_len: Option<usize>,
}

/// Whether the buffer starts with a `DCX` or `DCP` magic
pub fn has_container_magic(data: &[u8]) -> bool {
    data.starts_with(b"DCX\0") || data.starts_with(b"DCP\0")
}

/// Identify the compression variant of a buffer.
///
/// Returns `None` for uncompressed data and for containers whose variant
/// fields match no known layout.
pub fn detect(data: &[u8]) -> Option<CompressionType> {
    let mut cursor = BinaryCursor::with_endian(data, Endian::Big);
    if data.starts_with(b"DCP\0") {
        return match cursor.get_bytes(4, 4).ok()? {
            b"DFLT" => Some(CompressionType::DcpDflt),
            b"EDGE" => Some(CompressionType::DcpEdge),
            _ => None,
        };
    }
    if data.starts_with(b"DCX\0") {
        return match cursor.get_bytes(0x28, 4).ok()? {
            b"EDGE" => Some(CompressionType::DcxEdge),
            b"KRAK" => Some(CompressionType::DcxKrak),
            b"DFLT" => {
                let signature = (
                    cursor.get_i32(0x4).ok()?,
                    cursor.get_i32(0x10).ok()?,
                    *data.get(0x30)?,
                    *data.get(0x38)?,
                );
                DfltVariant::from_signature(signature).map(CompressionType::DcxDflt)
            }
            _ => None,
        };
    }
    match data {
        [0x78, level, ..] if ZLIB_LEVELS.contains(level) => Some(CompressionType::Zlib),
        _ => None,
    }
}

/// Whether the buffer holds a recognised compressed container
pub fn is_compressed(data: &[u8]) -> bool {
    detect(data).is_some()
}

/// Read the declared sizes without decompressing.
pub fn inspect(data: &[u8]) -> crate::Result<StreamInfo> {
    let kind = detect(data).ok_or_else(|| unrecognised(data))?;
    let mut cursor = BinaryCursor::with_endian(data, Endian::Big);
    let sizes_at = match kind {
        CompressionType::Zlib => {
            return Ok(StreamInfo {
                kind,
                compressed_len: data.len(),
                uncompressed_len: None,
            });
        }
        CompressionType::DcpDflt | CompressionType::DcpEdge => 0x24,
        _ => 0x1C,
    };
    let uncompressed = cursor.get_i32(sizes_at)?;
    let compressed = cursor.get_i32(sizes_at + 4)?;
    Ok(StreamInfo {
        kind,
        compressed_len: crate::decompress::to_size(compressed, "compressed size")?,
        uncompressed_len: Some(crate::decompress::to_size(uncompressed, "uncompressed size")?),
    })
}

pub(crate) fn unrecognised(data: &[u8]) -> crate::Error {
    if has_container_magic(data) {
        let tag_at = if data.starts_with(b"DCP\0") { 4 } else { 0x28 };
        let tag = data.get(tag_at..tag_at + 4).unwrap_or_default();
        crate::Error::unsupported(format!(
            "{} container with format tag {:?}",
            String::from_utf8_lossy(&data[..3]),
            String::from_utf8_lossy(tag)
        ))
    } else {
        crate::Error::NotCompressed(data.iter().take(4).copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn dcx_dflt_header(unk04: i32, unk10: i32, unk30: u8, unk38: u8) -> Vec<u8> {
        let mut data = vec![0u8; 0x40];
        data[..4].copy_from_slice(b"DCX\0");
        data[4..8].copy_from_slice(&unk04.to_be_bytes());
        data[0x10..0x14].copy_from_slice(&unk10.to_be_bytes());
        data[0x28..0x2C].copy_from_slice(b"DFLT");
        data[0x30] = unk30;
        data[0x38] = unk38;
        data
    }

    #[test_case(0x10000, 0x24, 9, 0, DfltVariant::Dflt10000_24_9)]
    #[test_case(0x10000, 0x44, 9, 0, DfltVariant::Dflt10000_44_9)]
    #[test_case(0x11000, 0x44, 8, 0, DfltVariant::Dflt11000_44_8)]
    #[test_case(0x11000, 0x44, 9, 0, DfltVariant::Dflt11000_44_9)]
    #[test_case(0x11000, 0x44, 9, 15, DfltVariant::Dflt11000_44_9_15)]
    fn test_detect_dflt_variants(unk04: i32, unk10: i32, unk30: u8, unk38: u8, expected: DfltVariant) {
        let data = dcx_dflt_header(unk04, unk10, unk30, unk38);
        assert_eq!(detect(&data), Some(CompressionType::DcxDflt(expected)));
    }

    #[test]
    fn test_unknown_dflt_tuple_is_not_detected() {
        let data = dcx_dflt_header(0x10000, 0x24, 8, 0);
        assert_eq!(detect(&data), None);
        assert!(matches!(
            unrecognised(&data),
            crate::Error::UnsupportedVariant(_)
        ));
    }

    #[test_case(&[0x78, 0x01] ; "no compression")]
    #[test_case(&[0x78, 0x5E] ; "fast")]
    #[test_case(&[0x78, 0x9C] ; "default")]
    #[test_case(&[0x78, 0xDA] ; "best")]
    fn test_detect_zlib(header: &[u8]) {
        assert_eq!(detect(header), Some(CompressionType::Zlib));
    }

    #[test]
    fn test_detect_rejects_other_data() {
        assert_eq!(detect(&[0x78, 0x00]), None);
        assert_eq!(detect(b"BND4"), None);
        assert_eq!(detect(b"DCX"), None);
        assert_eq!(detect(&[]), None);
        assert!(matches!(
            unrecognised(b"BND4"),
            crate::Error::NotCompressed(bytes) if bytes == b"BND4"
        ));
    }

    #[test]
    fn test_detect_dcp_and_dcx_tags() {
        let mut dcp = b"DCP\0EDGE".to_vec();
        assert_eq!(detect(&dcp), Some(CompressionType::DcpEdge));
        dcp[4..8].copy_from_slice(b"DFLT");
        assert_eq!(detect(&dcp), Some(CompressionType::DcpDflt));

        let mut dcx = vec![0u8; 0x2C];
        dcx[..4].copy_from_slice(b"DCX\0");
        dcx[0x28..].copy_from_slice(b"KRAK");
        assert_eq!(detect(&dcx), Some(CompressionType::DcxKrak));
        dcx[0x28..].copy_from_slice(b"EDGE");
        assert_eq!(detect(&dcx), Some(CompressionType::DcxEdge));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            CompressionType::DcxDflt(DfltVariant::Dflt11000_44_9_15).to_string(),
            "DCX_DFLT_11000_44_9_15"
        );
        assert_eq!(
            CompressionType::DcxDflt(DfltVariant::Dflt10000_24_9).to_string(),
            "DCX_DFLT_10000_24_9"
        );
        assert_eq!(CompressionType::DcxKrak.to_string(), "DCX_KRAK");
    }
}
