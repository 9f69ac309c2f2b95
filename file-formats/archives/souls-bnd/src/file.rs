//! File header records and extracted entries

use souls_data::BinaryCursor;
use souls_dcx::{Codec, CompressionType};

use crate::error::{Error, Result, to_usize};
use crate::format::{FileFlags, Format};
use crate::header::Bnd4Header;

/// Id used when an archive does not store ids
pub const NO_ID: i32 = -1;

/// One file header record, before its payload is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Per-file flags
    pub flags: FileFlags,
    /// File id, [`NO_ID`] when the format has none
    pub id: i32,
    /// File name when the format stores names
    pub name: Option<String>,
    /// Size of the stored payload
    pub compressed_size: usize,
    /// Size after decompression, when the format records it
    pub uncompressed_size: Option<usize>,
    /// Absolute offset of the payload
    pub data_offset: usize,
}

impl FileHeader {
    /// Read one record laid out according to the archive header.
    pub fn read(cursor: &mut BinaryCursor<'_>, header: &Bnd4Header) -> Result<Self> {
        let format = header.format;
        let flags = FileFlags::from_raw(cursor.read_u8()?, header.bit_big_endian);
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_i32(&[-1])?;

        let compressed_size = to_usize(cursor.read_i64()?, "compressed size")?;
        let uncompressed_size = if format.has_compression() {
            Some(to_usize(cursor.read_i64()?, "uncompressed size")?)
        } else {
            None
        };

        let data_offset = if format.has_long_offsets() {
            cursor.read_i64()?
        } else {
            cursor.read_i32()?.into()
        };
        let data_offset = to_usize(data_offset, "data offset")?;

        let mut id = if format.has_ids() {
            cursor.read_i32()?
        } else {
            NO_ID
        };

        let name = if format.has_names() {
            let name_offset = cursor.read_u32()? as usize;
            Some(cursor.get_string(name_offset, header.name_encoding())?)
        } else {
            None
        };

        if format == Format::NAMES1 {
            id = cursor.read_i32()?;
            cursor.assert_i32(&[0])?;
        }

        Ok(Self {
            flags,
            id,
            name,
            compressed_size,
            uncompressed_size,
            data_offset,
        })
    }

    /// Copy out the payload, unwrapping it when the compressed flag is set.
    pub fn read_data(
        &self,
        cursor: &mut BinaryCursor<'_>,
        index: usize,
        codec: &dyn Codec,
    ) -> Result<BinderFile> {
        let stored = cursor.get_bytes(self.data_offset, self.compressed_size)?;
        let (data, compression) = if self.flags.is_compressed() {
            let unpacked =
                souls_dcx::decompress(stored, codec).map_err(|source| Error::Decompress {
                    index,
                    source,
                })?;
            (unpacked.data, Some(unpacked.kind))
        } else {
            (stored.to_vec(), None)
        };
        log::trace!(
            "Entry {index} {:?}: {} stored bytes, {} extracted",
            self.name,
            stored.len(),
            data.len()
        );
        Ok(BinderFile {
            flags: self.flags,
            id: self.id,
            name: self.name.clone(),
            data,
            compression,
        })
    }
}

/// An extracted archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderFile {
    /// Per-file flags
    pub flags: FileFlags,
    /// File id, [`NO_ID`] when the archive has none
    pub id: i32,
    /// Full stored name
    pub name: Option<String>,
    /// Uncompressed payload
    pub data: Vec<u8>,
    /// Container the payload was wrapped in, if any
    pub compression: Option<CompressionType>,
}

impl BinderFile {
    /// Last component of the stored name, accepting either path separator
    pub fn file_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(|name| name.rsplit(['\\', '/']).next().unwrap_or(name))
    }
}
