//! # souls_rs - FromSoftware asset loading
//!
//! Ties the per-format crates together: [`sniff`] identifies a buffer by its
//! magic, and [`load`] strips compression, expands archives and decodes every
//! model and texture it finds.
//!
//! ```no_run
//! use souls_dcx::NoCodec;
//! use souls_rs::{AssetData, load_named};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("c2000.chrbnd.dcx")?;
//! for asset in load_named("c2000.chrbnd.dcx", &data, &NoCodec)? {
//!     if let AssetData::Model(model) = &asset.data {
//!         println!("{}: {} meshes", asset.display_path(), model.meshes.len());
//!     }
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

pub mod loader;
pub mod sniff;

pub use loader::{Asset, AssetData, LoadError, MAX_DEPTH, load, load_named};
pub use sniff::{FileKind, sniff};
