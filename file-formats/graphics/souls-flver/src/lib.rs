//! # souls_flver - FLVER2 models
//!
//! Reads the FLVER2 model format: header, dummies, materials with their
//! textures and GX parameter lists, the bone arena, and meshes whose vertices
//! are decoded from per-buffer layouts.
//!
//! The file stores every record kind in its own flat table; owners refer to
//! table entries by index. After reading, each texture, face set and vertex
//! buffer has been moved into the one material or mesh that claims it, and
//! reading fails if any entry is claimed twice or not at all.
//!
//! ## Examples
//!
//! ```no_run
//! use souls_flver::{Flver, HostMeshOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("c2000.flver")?;
//! let model = Flver::read(&data)?;
//! for mesh in model.host_meshes(&HostMeshOptions::default()) {
//!     println!("{}: {} vertices, {} triangles", mesh.name, mesh.positions.len(), mesh.triangles.len());
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

pub mod bone;
pub mod dummy;
pub mod error;
pub mod export;
pub mod extension;
pub mod face_set;
pub mod gx_list;
pub mod header;
pub mod layout;
pub mod material;
pub mod mesh;
pub mod model;
pub mod pool;
pub mod texture;
pub mod triangulate;
pub mod vertex;
pub mod vertex_buffer;

pub use bone::{Bone, NO_RELATION};
pub use dummy::{Color8, Dummy};
pub use error::{FlverError, Phase, Result};
pub use export::{HostMesh, HostMeshOptions};
pub use extension::{ExtensionMember, ExtensionRecord};
pub use face_set::{FaceSet, FaceSetFlags};
pub use gx_list::{GxItem, GxList};
pub use header::{FlverHeader, SUPPORTED_VERSIONS};
pub use layout::{BufferLayout, LayoutMember, LayoutSemantic, LayoutType};
pub use material::Material;
pub use mesh::{Mesh, MeshBoundingBox, VertexCapacity};
pub use model::Flver;
pub use pool::ClaimPool;
pub use texture::Texture;
pub use triangulate::{PRIMITIVE_RESTART, strip_to_list};
pub use vertex::{Vertex, VertexColor};
pub use vertex_buffer::VertexBuffer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
