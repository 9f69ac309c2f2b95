//! # souls_dcx - DCX and DCP container decompression
//!
//! FromSoftware titles wrap most files in one of a handful of compression
//! containers. The outer magic is `DCX\0` or `DCP\0`, followed by a format tag
//! (`DFLT`, `EDGE` or `KRAK`) and a fixed set of big-endian header fields.
//! Bare zlib streams are accepted as well.
//!
//! | Variant | Payload |
//! |---------|---------|
//! | `Zlib` | a single zlib stream |
//! | `DcpDflt` / `DcxDflt` | one zlib stream after the header |
//! | `DcpEdge` / `DcxEdge` | a table of independently deflated chunks |
//! | `DcxKrak` | a Kraken block, handed to an external [`Codec`] |
//!
//! ## Examples
//!
//! ```no_run
//! use souls_dcx::{decompress, NoCodec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = std::fs::read("c0000.chrbnd.dcx")?;
//! let unpacked = decompress(&raw, &NoCodec)?;
//! println!("{} -> {} bytes", unpacked.kind, unpacked.data.len());
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod codec;
pub mod decompress;
pub mod error;
pub mod kind;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


pub use codec::{Codec, NoCodec};
pub use decompress::{Decompressed, decompress};
pub use error::{CodecError, Error, Result};
pub use kind::{CompressionType, DfltVariant, StreamInfo, detect, inspect, is_compressed};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
