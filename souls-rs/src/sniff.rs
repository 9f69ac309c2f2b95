//! Identify a buffer by its leading bytes

use std::fmt;

use souls_bnd::Bnd4;
use souls_dcx::CompressionType;
use souls_flver::Flver;
use souls_tpf::{DdsHeader, Tpf};

/// What a buffer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A compressed container
    Dcx(CompressionType),
    /// A BND4 archive
    Bnd4,
    /// A FLVER2 model
    Flver,
    /// A TPF texture container
    Tpf,
    /// A standalone DDS texture
    Dds,
    /// Anything else
    Unknown,
}

impl FileKind {
    /// Usual file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dcx(_) => "dcx",
            Self::Bnd4 => "bnd",
            Self::Flver => "flver",
            Self::Tpf => "tpf",
            Self::Dds => "dds",
            Self::Unknown => "bin",
        }
    }

    /// Whether the buffer must be unwrapped or expanded before it can be decoded
    pub fn is_container(self) -> bool {
        matches!(self, Self::Dcx(_) | Self::Bnd4)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dcx(kind) => write!(f, "Compressed ({kind})"),
            Self::Bnd4 => write!(f, "BND4 archive"),
            Self::Flver => write!(f, "FLVER model"),
            Self::Tpf => write!(f, "TPF textures"),
            Self::Dds => write!(f, "DDS texture"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Identify `data` without decoding it.
///
/// Explicit magics are checked before compression, since a bare zlib stream
/// is only recognisable by two loose header bytes.
pub fn sniff(data: &[u8]) -> FileKind {
    if Bnd4::is(data) {
        FileKind::Bnd4
    } else if Flver::is(data) {
        FileKind::Flver
    } else if Tpf::is(data) {
        FileKind::Tpf
    } else if DdsHeader::is(data) {
        FileKind::Dds
    } else if let Some(kind) = souls_dcx::detect(data) {
        FileKind::Dcx(kind)
    } else {
        FileKind::Unknown
    }
}
