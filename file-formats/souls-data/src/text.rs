//! String encodings used by the binder, model and texture formats.

use encoding_rs::{SHIFT_JIS, UTF_16BE, UTF_16LE};

use crate::cursor::Endian;

/// Encoding of a NUL-terminated string table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Single/double-byte Japanese code page, terminated by one NUL byte
    ShiftJis,
    /// Two-byte code units in the cursor's byte order, terminated by `00 00`
    Utf16,
}

impl TextEncoding {
    /// Pick the encoding from a format's "unicode" flag
    pub fn from_unicode_flag(unicode: bool) -> Self {
        if unicode { Self::Utf16 } else { Self::ShiftJis }
    }
}

/// Decode Shift-JIS bytes, replacing malformed sequences.
pub fn decode_shift_jis(bytes: &[u8]) -> String {
    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        log::warn!("Malformed Shift-JIS sequence in {} byte string", bytes.len());
    }
    text.into_owned()
}

/// Decode UTF-16 code units stored in the given byte order.
pub fn decode_utf16(bytes: &[u8], endian: Endian) -> String {
    let encoding = match endian {
        Endian::Little => UTF_16LE,
        Endian::Big => UTF_16BE,
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::warn!("Malformed UTF-16 sequence in {} byte string", bytes.len());
    }
    text.into_owned()
}

/// Cut a fixed-width field at its first NUL byte.
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    match memchr::memchr(0, bytes) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}
