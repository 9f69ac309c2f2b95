//! Binder format and per-file flag bytes

bitflags::bitflags! {
    /// Archive-wide format flags, stored in one byte of the header
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Format: u8 {
        /// Big-endian byte order
        const BIG_ENDIAN = 0b0000_0001;
        /// File headers carry an id
        const IDS = 0b0000_0010;
        /// File headers carry a name offset
        const NAMES1 = 0b0000_0100;
        /// File headers carry a name offset
        const NAMES2 = 0b0000_1000;
        /// Data offsets are 64-bit
        const LONG_OFFSETS = 0b0001_0000;
        /// File headers carry an uncompressed size
        const COMPRESSION = 0b0010_0000;
        /// Unknown
        const FLAG6 = 0b0100_0000;
        /// Unknown
        const FLAG7 = 0b1000_0000;
    }
}

bitflags::bitflags! {
    /// Per-file flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileFlags: u8 {
        /// Payload is wrapped in a compressed container
        const COMPRESSED = 0b0000_0001;
        /// Unknown
        const FLAG1 = 0b0000_0010;
        /// Unknown
        const FLAG2 = 0b0000_0100;
        /// Unknown
        const FLAG3 = 0b0000_1000;
        /// Unknown
        const FLAG4 = 0b0001_0000;
        /// Unknown
        const FLAG5 = 0b0010_0000;
        /// Unknown
        const FLAG6 = 0b0100_0000;
        /// Unknown
        const FLAG7 = 0b1000_0000;
    }
}

impl Format {
    /// Decode the header format byte.
    ///
    /// The byte is stored bit-reversed unless the archive is bit-big-endian,
    /// or bit 0 is set while bit 7 is clear.
    pub fn from_raw(raw: u8, bit_big_endian: bool) -> Self {
        let keep = bit_big_endian || (raw & 0b0000_0001 != 0 && raw & 0b1000_0000 == 0);
        Self::from_bits_retain(if keep { raw } else { reverse_bits(raw) })
    }

    /// Data offsets are 64-bit
    pub fn has_long_offsets(self) -> bool {
        self.contains(Self::LONG_OFFSETS)
    }

    /// File headers carry an uncompressed size
    pub fn has_compression(self) -> bool {
        self.contains(Self::COMPRESSION)
    }

    /// File headers carry an id
    pub fn has_ids(self) -> bool {
        self.contains(Self::IDS)
    }

    /// File headers carry a name offset
    pub fn has_names(self) -> bool {
        self.intersects(Self::NAMES1 | Self::NAMES2)
    }

    /// Size in bytes of one file header record under this format
    pub fn file_header_size(self) -> u64 {
        let offset = if self.has_long_offsets() { 8 } else { 4 };
        let uncompressed_size = if self.has_compression() { 8 } else { 0 };
        let id = if self.has_ids() { 4 } else { 0 };
        let name = if self.has_names() { 4 } else { 0 };
        let names1_trailer = if self == Self::NAMES1 { 8 } else { 0 };
        0x10 + offset + uncompressed_size + id + name + names1_trailer
    }
}

impl FileFlags {
    /// Decode a file flag byte; bit-reversed unless the archive is bit-big-endian.
    pub fn from_raw(raw: u8, bit_big_endian: bool) -> Self {
        Self::from_bits_retain(if bit_big_endian { raw } else { reverse_bits(raw) })
    }

    /// Payload is wrapped in a compressed container
    pub fn is_compressed(self) -> bool {
        self.contains(Self::COMPRESSED)
    }
}

/// Mirror the bits of a byte (bit 0 becomes bit 7).
pub const fn reverse_bits(value: u8) -> u8 {
    value.reverse_bits()
}
