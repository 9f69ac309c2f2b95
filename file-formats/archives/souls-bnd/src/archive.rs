//! Whole-archive reading

use souls_data::BinaryCursor;
use souls_dcx::Codec;

use crate::error::Result;
use crate::file::{BinderFile, FileHeader};
use crate::header::{BND4_MAGIC, Bnd4Header};

/// A decoded BND4 archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bnd4 {
    /// Archive header
    pub header: Bnd4Header,
    /// Entries in stored order
    pub files: Vec<BinderFile>,
}

impl Bnd4 {
    /// Whether `data` starts with the BND4 magic
    pub fn is(data: &[u8]) -> bool {
        data.starts_with(BND4_MAGIC)
    }

    /// Read the header, every file header record, then every payload.
    ///
    /// `codec` is only used for entries wrapped in a Kraken container.
    pub fn read(data: &[u8], codec: &dyn Codec) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        let header = Bnd4Header::read(&mut cursor)?;

        let mut file_headers = Vec::with_capacity(header.file_count.min(data.len() / 0x14));
        for _ in 0..header.file_count {
            file_headers.push(FileHeader::read(&mut cursor, &header)?);
        }

        let files = file_headers
            .iter()
            .enumerate()
            .map(|(index, file_header)| file_header.read_data(&mut cursor, index, codec))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Read {} entries from BND4 archive", files.len());
        Ok(Self { header, files })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find an entry by full stored name or by its last path component
    pub fn file_by_name(&self, name: &str) -> Option<&BinderFile> {
        self.files
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .or_else(|| self.files.iter().find(|f| f.file_name() == Some(name)))
    }

    /// Find an entry by id
    pub fn file_by_id(&self, id: i32) -> Option<&BinderFile> {
        self.files.iter().find(|f| f.id == id)
    }
}
