//! Error types for compressed container decoding

use std::io;

use thiserror::Error;

/// Boxed error returned by an external [`Codec`](crate::Codec)
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while unwrapping a compressed container
#[derive(Error, Debug)]
pub enum Error {
    /// A header field did not match the layout of the detected variant
    #[error(transparent)]
    Data(#[from] souls_data::Error),

    /// The buffer carries no known compression header
    #[error("Not a compressed stream: leading bytes {0:02X?}")]
    NotCompressed(Vec<u8>),

    /// The container magic is known but its variant is not
    #[error("Unsupported compression variant: {0}")]
    UnsupportedVariant(String),

    /// The deflate payload is corrupt
    #[error("Deflate stream is corrupt: {0}")]
    Inflate(#[source] io::Error),

    /// Decompressed output disagrees with the declared size
    #[error("Decompressed size mismatch: header declares {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Size recorded in the container header
        expected: usize,
        /// Size actually produced
        actual: usize,
    },

    /// Container fields are individually valid but inconsistent with each other
    #[error("Invalid container structure: {0}")]
    Structural(String),

    /// The external codec failed or produced the wrong amount of data
    #[error("{codec} codec failed: {source}")]
    Codec {
        /// Name reported by the codec
        codec: String,
        /// Underlying failure
        #[source]
        source: CodecError,
    },
}

impl Error {
    /// Create a structural error
    pub fn structural<S: Into<String>>(msg: S) -> Self {
        Self::Structural(msg.into())
    }

    /// Create an unsupported-variant error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::UnsupportedVariant(msg.into())
    }

    /// Whether the error points at damaged input rather than a missing feature
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Data(_) | Self::Inflate(_) | Self::SizeMismatch { .. } | Self::Structural(_)
        )
    }
}

/// Result type for container decoding
pub type Result<T> = std::result::Result<T, Error>;
