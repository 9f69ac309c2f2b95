//! Archive fixture writer shared by the integration tests

#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use souls_bnd::{Format, reverse_bits};
use souls_dcx::DfltVariant;
use souls_dcx::test_utils;

/// Entry to place in a fixture archive
#[derive(Debug, Clone)]
pub struct TestFile {
    pub id: i32,
    pub name: String,
    pub data: Vec<u8>,
    pub compress: bool,
}

impl TestFile {
    pub fn new(id: i32, name: &str, data: &[u8]) -> Self {
        Self {
            id,
            name: name.to_string(),
            data: data.to_vec(),
            compress: false,
        }
    }

    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }
}

/// Endian-aware byte sink
struct Writer {
    buf: Vec<u8>,
    big_endian: bool,
}

impl Writer {
    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn i32(&mut self, value: i32) {
        if self.big_endian {
            self.buf.write_i32::<BigEndian>(value).unwrap();
        } else {
            self.buf.write_i32::<LittleEndian>(value).unwrap();
        }
    }

    fn i64(&mut self, value: i64) {
        if self.big_endian {
            self.buf.write_i64::<BigEndian>(value).unwrap();
        } else {
            self.buf.write_i64::<LittleEndian>(value).unwrap();
        }
    }

    fn u16(&mut self, value: u16) {
        if self.big_endian {
            self.buf.write_u16::<BigEndian>(value).unwrap();
        } else {
            self.buf.write_u16::<LittleEndian>(value).unwrap();
        }
    }
}

/// Builds BND4 archives byte by byte
#[derive(Debug, Clone)]
pub struct Bnd4Builder {
    pub big_endian: bool,
    pub bit_big_endian: bool,
    pub unicode: bool,
    pub format: Format,
    pub extended: u8,
    pub files: Vec<TestFile>,
}

impl Default for Bnd4Builder {
    fn default() -> Self {
        Self {
            big_endian: false,
            bit_big_endian: false,
            unicode: true,
            format: Format::IDS | Format::NAMES1 | Format::NAMES2 | Format::COMPRESSION,
            extended: 0,
            files: Vec::new(),
        }
    }
}

impl Bnd4Builder {
    pub fn file(mut self, file: TestFile) -> Self {
        self.files.push(file);
        self
    }

    fn raw_format(&self) -> u8 {
        let bits = self.format.bits();
        let keep = self.bit_big_endian || (bits & 1 != 0 && bits & 0x80 == 0);
        if keep { bits } else { reverse_bits(bits) }
    }

    fn raw_flags(&self, compressed: bool) -> u8 {
        let bits = if compressed { 0b0000_0011 } else { 0b0000_0010 };
        if self.bit_big_endian { bits } else { reverse_bits(bits) }
    }

    fn encode_name(&self, name: &str) -> Vec<u8> {
        let mut w = Writer {
            buf: Vec::new(),
            big_endian: self.big_endian,
        };
        if self.unicode {
            for unit in name.encode_utf16() {
                w.u16(unit);
            }
            w.u16(0);
        } else {
            w.buf.extend_from_slice(name.as_bytes());
            w.u8(0);
        }
        w.buf
    }

    pub fn build(&self) -> Vec<u8> {
        let record_size = self.format.file_header_size() as usize;
        let records_end = 0x40 + record_size * self.files.len();

        let mut names = Vec::new();
        let mut name_offsets = Vec::new();
        for file in &self.files {
            name_offsets.push(records_end + names.len());
            names.extend_from_slice(&self.encode_name(&file.name));
        }

        let hash_table_offset = records_end + names.len();
        let hash_table_len = if self.extended == 4 { 0x10 } else { 0 };
        let data_start = (hash_table_offset + hash_table_len).next_multiple_of(0x10);

        let stored: Vec<Vec<u8>> = self
            .files
            .iter()
            .map(|f| {
                if f.compress {
                    test_utils::dcx_dflt(&f.data, DfltVariant::Dflt11000_44_9)
                } else {
                    f.data.clone()
                }
            })
            .collect();

        let mut w = Writer {
            buf: Vec::new(),
            big_endian: self.big_endian,
        };
        w.buf.extend_from_slice(b"BND4");
        w.u8(0);
        w.u8(0);
        w.u8(0);
        w.u8(0);
        w.u8(0);
        w.u8(u8::from(self.big_endian));
        w.u8(u8::from(!self.bit_big_endian));
        w.u8(0);
        w.i32(self.files.len() as i32);
        w.i64(0x40);
        w.buf.extend_from_slice(b"16D14J5\0");
        w.i64(record_size as i64);
        w.i64(data_start as i64);
        w.u8(u8::from(self.unicode));
        w.u8(self.raw_format());
        w.u8(self.extended);
        w.u8(0);
        w.i32(0);
        w.i64(if self.extended == 4 {
            hash_table_offset as i64
        } else {
            0
        });
        assert_eq!(w.buf.len(), 0x40);

        let mut data_offset = data_start;
        for ((file, payload), name_offset) in self.files.iter().zip(&stored).zip(&name_offsets) {
            w.u8(self.raw_flags(file.compress));
            w.u8(0);
            w.u8(0);
            w.u8(0);
            w.i32(-1);
            w.i64(payload.len() as i64);
            if self.format.has_compression() {
                w.i64(file.data.len() as i64);
            }
            if self.format.has_long_offsets() {
                w.i64(data_offset as i64);
            } else {
                w.i32(data_offset as i32);
            }
            if self.format.has_ids() {
                w.i32(file.id);
            }
            if self.format.has_names() {
                w.i32(*name_offset as i32);
            }
            if self.format == Format::NAMES1 {
                w.i32(file.id);
                w.i32(0);
            }
            data_offset = (data_offset + payload.len()).next_multiple_of(0x10);
        }
        assert_eq!(w.buf.len(), records_end);

        w.buf.extend_from_slice(&names);
        if self.extended == 4 {
            w.i64(0);
            w.i32(0);
            w.buf.extend_from_slice(&[0x10, 8, 8, 0]);
        }

        for payload in &stored {
            w.buf.resize(w.buf.len().next_multiple_of(0x10), 0);
            w.buf.extend_from_slice(payload);
        }
        w.buf
    }
}
