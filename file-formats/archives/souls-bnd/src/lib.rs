//! # souls_bnd - BND4 binder archives
//!
//! A binder is a flat list of files, each described by a fixed-size header
//! record and stored either verbatim or wrapped in a DCX container. The
//! archive-wide format byte decides which optional fields the records carry
//! (ids, names, 64-bit offsets, uncompressed sizes).
//!
//! ## Examples
//!
//! ```no_run
//! use souls_bnd::Bnd4;
//! use souls_dcx::NoCodec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("c0000.chrbnd")?;
//! let archive = Bnd4::read(&data, &NoCodec)?;
//! for file in &archive.files {
//!     println!("{:>4} {:?} ({} bytes)", file.id, file.name, file.data.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod archive;
pub mod error;
pub mod file;
pub mod format;
pub mod header;

pub use archive::Bnd4;
pub use error::{Error, Result};
pub use file::{BinderFile, FileHeader, NO_ID};
pub use format::{FileFlags, Format, reverse_bits};
pub use header::{Bnd4Header, binder_timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
