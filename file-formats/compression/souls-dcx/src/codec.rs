//! Seam for the external high-ratio codec used by `DcxKrak` containers.

use crate::error::CodecError;

/// Block decompressor supplied by the caller.
///
/// Implementations receive the compressed payload and the exact size the
/// container header declares. Returning fewer or more bytes is treated as
/// a codec failure.
pub trait Codec {
    /// Short name used in error messages
    fn name(&self) -> &str;

    /// Decompress `compressed` into exactly `uncompressed_len` bytes
    fn decompress(
        &self,
        compressed: &[u8],
        uncompressed_len: usize,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Codec used when no external library is available. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCodec;

impl Codec for NoCodec {
    fn name(&self) -> &str {
        "Kraken"
    }

    fn decompress(&self, compressed: &[u8], _uncompressed_len: usize) -> Result<Vec<u8>, CodecError> {
        Err(format!(
            "no decompressor is registered for {} bytes of Kraken data",
            compressed.len()
        )
        .into())
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decompress(
        &self,
        compressed: &[u8],
        uncompressed_len: usize,
    ) -> Result<Vec<u8>, CodecError> {
        (**self).decompress(compressed, uncompressed_len)
    }
}
