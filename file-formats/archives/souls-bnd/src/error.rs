use thiserror::Error;

use crate::format::Format;

/// Errors raised while reading a binder
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or truncated header data
    #[error(transparent)]
    Data(#[from] souls_data::Error),

    /// A compressed entry could not be unwrapped
    #[error("Failed to decompress entry {index}: {source}")]
    Decompress {
        /// Position of the entry in the archive
        index: usize,
        /// Underlying container error
        #[source]
        source: souls_dcx::Error,
    },

    /// The declared file header size disagrees with the format flags
    #[error(
        "File header size for format {format:?} is expected to be {expected:#x}, but was {actual:#x}"
    )]
    HeaderSizeMismatch {
        /// Format flags of the archive
        format: Format,
        /// Size implied by the format
        expected: u64,
        /// Size recorded in the header
        actual: i64,
    },

    /// A count, size or offset field is negative
    #[error("Invalid {field}: {value}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Raw value
        value: i64,
    },
}

impl Error {
    /// Whether the failure is a broken archive layout rather than a bad entry payload
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::HeaderSizeMismatch { .. } | Self::InvalidField { .. }
        )
    }
}

/// Result type for binder reading
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn to_usize(value: i64, field: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::InvalidField { field, value })
}
