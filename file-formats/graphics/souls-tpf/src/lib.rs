//! # souls_tpf - TPF texture containers
//!
//! A TPF bundles named textures. On PC every payload is a complete DDS file;
//! console builds store headerless pixel data plus a small platform-specific
//! header. Individual payloads may be wrapped in a `DCP_EDGE` container.
//!
//! ```no_run
//! use souls_dcx::NoCodec;
//! use souls_tpf::Tpf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("c0000.tpf")?;
//! let tpf = Tpf::read(&data, &NoCodec)?;
//! for texture in &tpf.textures {
//!     if let Some(dds) = texture.dds_header()? {
//!         println!("{}: {}x{} {}", texture.name, dds.width, dds.height, dds.format_name());
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

pub mod dds;
pub mod error;
pub mod texture;
pub mod tpf;

pub use dds::{DdsHeader, DxgiFormat};
pub use error::{Error, Result};
pub use texture::{FloatStruct, TexHeader, TexType, TpfTexture};
pub use tpf::{Tpf, TpfPlatform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
