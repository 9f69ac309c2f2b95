use thiserror::Error;

/// Errors raised while reading primitive values from a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read ran past the end of the buffer
    #[error(
        "Unexpected end of data at offset {offset:#x}: requested {requested} bytes, {available} available"
    )]
    UnexpectedEof {
        /// Position of the failed read
        offset: usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// A field did not hold one of the values the format allows
    #[error("Read {kind}: {actual} | Expected: {expected} | Offset: {offset:#x}")]
    FormatMismatch {
        /// Name of the value type that was read
        kind: &'static str,
        /// The value found in the buffer
        actual: String,
        /// The accepted values
        expected: String,
        /// Position the value was read from
        offset: usize,
    },

    /// `step_out` was called without a matching `step_in`
    #[error("Cannot step out: position stack is empty")]
    StepUnderflow,

    /// A seek target lies outside the buffer
    #[error("Seek to {offset:#x} is outside a buffer of {len} bytes")]
    SeekOutOfBounds {
        /// Requested absolute offset
        offset: usize,
        /// Buffer length
        len: usize,
    },
}

impl Error {
    /// Build a [`Error::FormatMismatch`] from any displayable values.
    pub fn mismatch(
        kind: &'static str,
        actual: impl Into<String>,
        expected: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::FormatMismatch {
            kind,
            actual: actual.into(),
            expected: expected.into(),
            offset,
        }
    }

    /// Byte offset the error points at, when it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { offset, .. }
            | Self::FormatMismatch { offset, .. }
            | Self::SeekOutOfBounds { offset, .. } => Some(*offset),
            Self::StepUnderflow => None,
        }
    }

    /// Whether the input simply ended early, as opposed to holding wrong values
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. } | Self::SeekOutOfBounds { .. })
    }
}

/// Result type for cursor operations
pub type Result<T> = std::result::Result<T, Error>;
