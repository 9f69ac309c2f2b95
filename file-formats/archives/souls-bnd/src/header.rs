//! BND4 archive header

use souls_data::{BinaryCursor, Endian, TextEncoding};

use crate::error::{Error, Result, to_usize};
use crate::format::Format;

/// Magic at the start of every BND4 archive
pub const BND4_MAGIC: &[u8; 4] = b"BND4";

/// Value of the `extended` byte that announces a hash table
pub const EXTENDED_HASH_TABLE: u8 = 4;

/// Fixed-size BND4 header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bnd4Header {
    /// Unknown
    pub unk04: bool,
    /// Unknown
    pub unk05: bool,
    /// Multi-byte fields are big-endian
    pub big_endian: bool,
    /// Flag bytes are stored without bit reversal
    pub bit_big_endian: bool,
    /// Number of file header records
    pub file_count: usize,
    /// Eight-character version stamp
    pub version: String,
    /// Size of one file header record
    pub file_header_size: u64,
    /// Offset of the end of the header region
    pub headers_end: i64,
    /// Names are UTF-16 rather than Shift-JIS
    pub unicode: bool,
    /// Archive format flags
    pub format: Format,
    /// Extension marker (0, 1, 4 or 0x80)
    pub extended: u8,
    /// Offset of the name hash table when `extended == 4`
    pub hash_table_offset: Option<u64>,
}

impl Bnd4Header {
    /// Read the header and switch the cursor to the archive's byte order.
    pub fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        cursor.assert_ascii(&["BND4"])?;
        let unk04 = cursor.read_bool()?;
        let unk05 = cursor.read_bool()?;
        cursor.assert_u8(&[0])?;
        cursor.assert_u8(&[0])?;

        cursor.assert_u8(&[0])?;
        let big_endian = cursor.read_bool()?;
        let bit_big_endian = !cursor.read_bool()?;
        cursor.assert_u8(&[0])?;

        cursor.set_endian(Endian::from_big_endian_flag(big_endian));

        let file_count = to_usize(cursor.read_i32()?.into(), "file count")?;
        cursor.assert_i64(&[0x40])?;
        let version = cursor.read_fixed_str(8)?;
        let raw_header_size = cursor.read_i64()?;
        let headers_end = cursor.read_i64()?;

        let unicode = cursor.read_bool()?;
        let format = Format::from_raw(cursor.read_u8()?, bit_big_endian);
        let extended = cursor.assert_u8(&[0, 1, EXTENDED_HASH_TABLE, 0x80])?;
        cursor.assert_u8(&[0])?;
        cursor.assert_i32(&[0])?;

        let hash_table_offset = if extended == EXTENDED_HASH_TABLE {
            let offset = cursor.read_i64()?;
            let offset = to_usize(offset, "hash table offset")?;
            cursor.at(offset, validate_hash_table)?;
            Some(offset as u64)
        } else {
            cursor.assert_i64(&[0])?;
            None
        };

        let expected = format.file_header_size();
        if u64::try_from(raw_header_size).ok() != Some(expected) {
            return Err(Error::HeaderSizeMismatch {
                format,
                expected,
                actual: raw_header_size,
            });
        }

        log::debug!(
            "BND4 header: {file_count} files, format {format:?}, version {version:?}, big endian: {big_endian}, unicode: {unicode}"
        );

        Ok(Self {
            unk04,
            unk05,
            big_endian,
            bit_big_endian,
            file_count,
            version,
            file_header_size: expected,
            headers_end,
            unicode,
            format,
            extended,
            hash_table_offset,
        })
    }

    /// Encoding of entry names
    pub fn name_encoding(&self) -> TextEncoding {
        TextEncoding::from_unicode_flag(self.unicode)
    }
}

/// Check the fixed fields of the name hash table header; its contents are not used.
fn validate_hash_table(cursor: &mut BinaryCursor<'_>) -> Result<()> {
    let _hash_groups_offset = cursor.read_i64()?;
    let _group_count = cursor.read_i32()?;
    cursor.assert_u8(&[0x10])?;
    cursor.assert_u8(&[8])?;
    cursor.assert_u8(&[8])?;
    cursor.assert_u8(&[0])?;
    Ok(())
}

/// Encode a date as the eight-character binder version stamp.
///
/// The stamp is the two-digit year, the month as a letter (`B` for January),
/// the day, the hour as a letter (`A` for midnight) and the minute, padded
/// with NULs. Years outside 2000..=2099 cannot be represented.
pub fn binder_timestamp(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> Option<String> {
    if !(2000..=2099).contains(&year) || !(1..=12).contains(&month) || hour > 23 {
        return None;
    }
    let month = char::from_u32(u32::from(b'A') + month)?;
    let hour = char::from_u32(u32::from(b'A') + hour)?;
    let mut stamp = format!("{:02}{month}{day}{hour}{minute}", year - 2000);
    while stamp.len() < 8 {
        stamp.push('\0');
    }
    Some(stamp)
}
