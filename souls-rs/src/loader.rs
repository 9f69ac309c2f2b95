//! Recursive unwrapping of compressed containers and archives into decoded assets

use std::borrow::Cow;

use souls_bnd::Bnd4;
use souls_dcx::{Codec, CompressionType};
use souls_flver::{Flver, FlverError};
use souls_tpf::{DdsHeader, Tpf};
use thiserror::Error;

use crate::sniff::{FileKind, sniff};

/// Containers nested deeper than this are rejected
pub const MAX_DEPTH: usize = 8;

/// Errors raised while loading, tagged with where in the container tree they happened
#[derive(Error, Debug)]
pub enum LoadError {
    /// A compressed container could not be unwrapped
    #[error("{path}: {source}")]
    Decompress {
        /// Location of the failing buffer
        path: String,
        /// Underlying failure
        #[source]
        source: souls_dcx::Error,
    },

    /// An archive could not be read
    #[error("{path}: {source}")]
    Archive {
        /// Location of the failing buffer
        path: String,
        /// Underlying failure
        #[source]
        source: souls_bnd::Error,
    },

    /// A model could not be decoded
    #[error("{path}: {source}")]
    Model {
        /// Location of the failing buffer
        path: String,
        /// Underlying failure
        #[source]
        source: FlverError,
    },

    /// A texture container or DDS file could not be decoded
    #[error("{path}: {source}")]
    Texture {
        /// Location of the failing buffer
        path: String,
        /// Underlying failure
        #[source]
        source: souls_tpf::Error,
    },

    /// Containers are nested too deeply
    #[error("{path}: containers nested more than {MAX_DEPTH} levels deep")]
    TooDeep {
        /// Location of the innermost container
        path: String,
    },
}

/// Result type for loading
pub type Result<T> = std::result::Result<T, LoadError>;

/// Decoded content of one leaf buffer
#[derive(Debug, Clone, PartialEq)]
pub enum AssetData {
    /// A FLVER2 model
    Model(Box<Flver>),
    /// A TPF texture container
    Textures(Tpf),
    /// A standalone DDS texture
    Dds {
        /// Parsed header
        header: DdsHeader,
        /// Whole file, header included
        bytes: Vec<u8>,
    },
    /// A buffer of unrecognised format
    Raw(Vec<u8>),
}

/// One decoded buffer and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Names from the outermost buffer down to this one; archive entries
    /// contribute their file name, or `#index` when they have none
    pub path: Vec<String>,
    /// Compression that directly wrapped this buffer
    pub compression: Option<CompressionType>,
    /// Decoded content
    pub data: AssetData,
}

impl Asset {
    /// Name of the innermost buffer
    pub fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Path joined for display
    pub fn display_path(&self) -> String {
        display(&self.path)
    }

    /// Format of the decoded content
    pub fn kind(&self) -> FileKind {
        match self.data {
            AssetData::Model(_) => FileKind::Flver,
            AssetData::Textures(_) => FileKind::Tpf,
            AssetData::Dds { .. } => FileKind::Dds,
            AssetData::Raw(_) => FileKind::Unknown,
        }
    }

    /// The model, if this asset is one
    pub fn as_model(&self) -> Option<&Flver> {
        match &self.data {
            AssetData::Model(model) => Some(model),
            _ => None,
        }
    }

    /// The texture container, if this asset is one
    pub fn as_textures(&self) -> Option<&Tpf> {
        match &self.data {
            AssetData::Textures(tpf) => Some(tpf),
            _ => None,
        }
    }
}

fn display(path: &[String]) -> String {
    path.join(" / ")
}

/// Decode every asset in `data`, naming the outermost buffer `<input>`.
pub fn load(data: &[u8], codec: &dyn Codec) -> Result<Vec<Asset>> {
    load_named("<input>", data, codec)
}

/// Decode every asset in `data`.
///
/// Compression is stripped, archives are expanded entry by entry, and every
/// resulting buffer is sniffed again. Models and textures are decoded; other
/// buffers are kept as [`AssetData::Raw`]. The first failure aborts loading.
pub fn load_named(name: &str, data: &[u8], codec: &dyn Codec) -> Result<Vec<Asset>> {
    let mut loader = Loader {
        codec,
        assets: Vec::new(),
    };
    loader.visit(vec![name.to_string()], Cow::Borrowed(data), None, 0)?;
    log::debug!("Loaded {} assets from {name}", loader.assets.len());
    Ok(loader.assets)
}

struct Loader<'c> {
    codec: &'c dyn Codec,
    assets: Vec<Asset>,
}

impl Loader<'_> {
    fn visit(
        &mut self,
        path: Vec<String>,
        data: Cow<'_, [u8]>,
        compression: Option<CompressionType>,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(LoadError::TooDeep { path: display(&path) });
        }

        let kind = sniff(&data);
        log::trace!("{}: {kind}", display(&path));

        let data = match kind {
            FileKind::Dcx(_) => {
                let unpacked = souls_dcx::decompress(&data, self.codec).map_err(|source| LoadError::Decompress {
                    path: display(&path),
                    source,
                })?;
                return self.visit(path, Cow::Owned(unpacked.data), Some(unpacked.kind), depth + 1);
            }
            FileKind::Bnd4 => {
                let archive = Bnd4::read(&data, self.codec).map_err(|source| LoadError::Archive {
                    path: display(&path),
                    source,
                })?;
                for (index, file) in archive.files.into_iter().enumerate() {
                    let name = file.file_name().map_or_else(|| format!("#{index}"), str::to_string);
                    let mut entry_path = path.clone();
                    entry_path.push(name);
                    self.visit(entry_path, Cow::Owned(file.data), file.compression, depth + 1)?;
                }
                return Ok(());
            }
            FileKind::Flver => {
                let model = Flver::read(&data).map_err(|source| LoadError::Model {
                    path: display(&path),
                    source,
                })?;
                AssetData::Model(Box::new(model))
            }
            FileKind::Tpf => {
                let tpf = Tpf::read(&data, self.codec).map_err(|source| LoadError::Texture {
                    path: display(&path),
                    source,
                })?;
                AssetData::Textures(tpf)
            }
            FileKind::Dds => {
                let header = DdsHeader::read(&data).map_err(|source| LoadError::Texture {
                    path: display(&path),
                    source,
                })?;
                AssetData::Dds {
                    header,
                    bytes: data.into_owned(),
                }
            }
            FileKind::Unknown if souls_dcx::kind::has_container_magic(&data) => {
                // Known magic, unknown variant: let the decompressor name it
                let err = souls_dcx::decompress(&data, self.codec).err();
                return match err {
                    Some(source) => Err(LoadError::Decompress {
                        path: display(&path),
                        source,
                    }),
                    None => Ok(()),
                };
            }
            FileKind::Unknown => AssetData::Raw(data.into_owned()),
        };

        self.assets.push(Asset {
            path,
            compression,
            data,
        });
        Ok(())
    }
}
