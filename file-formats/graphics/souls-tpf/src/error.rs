use thiserror::Error;

use souls_dcx::CompressionType;

/// Errors raised while reading a texture container
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or truncated data
    #[error(transparent)]
    Data(#[from] souls_data::Error),

    /// A compressed texture payload could not be unwrapped
    #[error("Failed to decompress texture {index}: {source}")]
    Decompress {
        /// Position of the texture in the container
        index: usize,
        /// Underlying container error
        #[source]
        source: souls_dcx::Error,
    },

    /// A compressed texture used a container other than `DCP_EDGE`
    #[error("Texture {index} compression is expected to be DCP_EDGE, but it was {kind}")]
    UnexpectedCompression {
        /// Position of the texture in the container
        index: usize,
        /// Container found
        kind: CompressionType,
    },

    /// The float parameter block has an impossible length
    #[error("Unexpected float struct length: {0}")]
    FloatStructLength(i32),

    /// A count or size field is negative
    #[error("Invalid {field}: {value}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Raw value
        value: i32,
    },
}

/// Result type for texture container reading
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn to_usize(value: i32, field: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::InvalidField { field, value })
}
