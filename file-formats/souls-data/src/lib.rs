//! # souls_data - shared binary reading primitives
//!
//! The archive, compression, model and texture crates of this workspace all
//! decode from one immutable byte buffer. This crate holds the pieces they
//! share:
//!
//! - [`BinaryCursor`], a bounds-checked reader with a switchable byte order
//!   and a stack of saved positions for scoped jumps
//! - value assertions that report the offending value, the accepted set and
//!   the byte offset
//! - Shift-JIS and UTF-16 string decoding
//!
//! Nothing in here panics on malformed input; every read returns a
//! [`Result`].

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod cursor;
pub mod error;
pub mod text;

pub use cursor::{BinaryCursor, Endian};
pub use error::{Error, Result};
pub use text::TextEncoding;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
