//! Endian-aware, bounds-checked reader over an in-memory buffer.
//!
//! Every format in this workspace is decoded from a single immutable byte
//! slice. [`BinaryCursor`] tracks an absolute position, the active byte order
//! and a stack of saved positions so that parsers can jump to an offset,
//! read a table and come back.
//!
//! ```
//! use souls_data::{BinaryCursor, Endian};
//!
//! let data = [0x00, 0x00, 0x00, 0x2A, 0x08, 0x00, 0x00, 0x00, b'h', b'i', 0];
//! let mut cursor = BinaryCursor::with_endian(&data, Endian::Big);
//! assert_eq!(cursor.read_i32()?, 42);
//! cursor.set_endian(Endian::Little);
//! let name_offset = cursor.read_u32()? as usize;
//! assert_eq!(cursor.get_shift_jis(name_offset)?, "hi");
//! assert_eq!(cursor.position(), 8);
//! # Ok::<(), souls_data::Error>(())
//! ```

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use glam::{Vec2, Vec3, Vec4};

use crate::error::{Error, Result};
use crate::text::{self, TextEncoding};

/// Byte order of multi-byte fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl Endian {
    /// Map a "big endian" header flag to a byte order
    pub fn from_big_endian_flag(big_endian: bool) -> Self {
        if big_endian { Self::Big } else { Self::Little }
    }
}

macro_rules! read_primitive {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $len:literal, $conv:ident) => {
        $(#[$doc])*
        pub fn $name(&mut self) -> Result<$ty> {
            let endian = self.endian;
            let bytes = self.take($len)?;
            Ok(match endian {
                Endian::Little => LittleEndian::$conv(bytes),
                Endian::Big => BigEndian::$conv(bytes),
            })
        }
    };
}

macro_rules! read_many {
    ($(#[$doc:meta])* $name:ident, $single:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&mut self, count: usize) -> Result<Vec<$ty>> {
            self.ensure(count.saturating_mul(size_of::<$ty>()))?;
            (0..count).map(|_| self.$single()).collect()
        }
    };
}

macro_rules! assert_int {
    ($(#[$doc:meta])* $name:ident, $read:ident, $ty:ty, $kind:literal) => {
        $(#[$doc])*
        pub fn $name(&mut self, expected: &[$ty]) -> Result<$ty> {
            let offset = self.position;
            let value = self.$read()?;
            if expected.contains(&value) {
                Ok(value)
            } else {
                Err(Error::mismatch(
                    $kind,
                    format!("{value:#x}"),
                    format_options(expected.iter().map(|v| format!("{v:#x}"))),
                    offset,
                ))
            }
        }
    };
}

/// Bounds-checked reader with a byte order and a position stack
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
    steps: Vec<usize>,
}

impl<'a> BinaryCursor<'a> {
    /// Create a little-endian cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    /// Create a cursor at the start of `data` with the given byte order
    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
            steps: Vec::new(),
        }
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Active byte order
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch the byte order used by later reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Whether reads are big-endian
    pub fn is_big_endian(&self) -> bool {
        self.endian == Endian::Big
    }

    /// Number of positions saved by [`step_in`](Self::step_in)
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::SeekOutOfBounds {
                offset,
                len: self.data.len(),
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Advance past `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Save the current position and jump to `offset`
    pub fn step_in(&mut self, offset: usize) -> Result<()> {
        let saved = self.position;
        self.seek(offset)?;
        self.steps.push(saved);
        Ok(())
    }

    /// Return to the position saved by the matching [`step_in`](Self::step_in)
    pub fn step_out(&mut self) -> Result<()> {
        let saved = self.steps.pop().ok_or(Error::StepUnderflow)?;
        self.position = saved;
        Ok(())
    }

    /// Run `f` at `offset`, then restore the position whether or not `f` succeeded.
    pub fn at<T, E, F>(&mut self, offset: usize, f: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        self.step_in(offset)?;
        let result = f(self);
        let restored = self.step_out();
        let value = result?;
        restored?;
        Ok(value)
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                requested: len,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Read one unsigned byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read one signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    read_primitive!(
        /// Read an unsigned 16-bit integer
        read_u16, u16, 2, read_u16
    );
    read_primitive!(
        /// Read a signed 16-bit integer
        read_i16, i16, 2, read_i16
    );
    read_primitive!(
        /// Read an unsigned 32-bit integer
        read_u32, u32, 4, read_u32
    );
    read_primitive!(
        /// Read a signed 32-bit integer
        read_i32, i32, 4, read_i32
    );
    read_primitive!(
        /// Read an unsigned 64-bit integer
        read_u64, u64, 8, read_u64
    );
    read_primitive!(
        /// Read a signed 64-bit integer
        read_i64, i64, 8, read_i64
    );
    read_primitive!(
        /// Read an IEEE-754 single precision float
        read_f32, f32, 4, read_f32
    );

    /// Read a boolean byte. Only 0 and 1 are accepted.
    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.position;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::mismatch(
                "Boolean",
                format!("{other:#x}"),
                "[0x0, 0x1]",
                offset,
            )),
        }
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    read_many!(
        /// Read `count` signed 16-bit integers
        read_i16s, read_i16, i16
    );
    read_many!(
        /// Read `count` unsigned 16-bit integers
        read_u16s, read_u16, u16
    );
    read_many!(
        /// Read `count` signed 32-bit integers
        read_i32s, read_i32, i32
    );
    read_many!(
        /// Read `count` unsigned 32-bit integers
        read_u32s, read_u32, u32
    );
    read_many!(
        /// Read `count` floats
        read_f32s, read_f32, f32
    );

    /// Read two floats
    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    /// Read three floats
    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read four floats
    pub fn read_vec4(&mut self) -> Result<Vec4> {
        Ok(Vec4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Read a fixed-width Shift-JIS field, stopping at the first NUL
    pub fn read_fixed_str(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        Ok(text::decode_shift_jis(text::trim_nul(bytes)))
    }

    /// Read `len` bytes as ASCII text, keeping any NULs
    pub fn read_ascii(&mut self, len: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    /// Read a NUL-terminated Shift-JIS string and consume the terminator
    pub fn read_shift_jis(&mut self) -> Result<String> {
        let start = self.position;
        let rest = self.data.get(start..).unwrap_or_default();
        let end = memchr::memchr(0, rest).ok_or(Error::UnexpectedEof {
            offset: start,
            requested: rest.len() + 1,
            available: rest.len(),
        })?;
        let value = text::decode_shift_jis(&rest[..end]);
        self.position = start + end + 1;
        Ok(value)
    }

    /// Read a UTF-16 string terminated by `00 00` and consume the terminator
    pub fn read_utf16(&mut self) -> Result<String> {
        let start = self.position;
        let rest = self.data.get(start..).unwrap_or_default();
        let units = rest
            .chunks_exact(2)
            .position(|pair| pair[0] == 0 && pair[1] == 0)
            .ok_or(Error::UnexpectedEof {
                offset: start,
                requested: rest.len() + 2,
                available: rest.len(),
            })?;
        let end = units * 2;
        let value = text::decode_utf16(&rest[..end], self.endian);
        self.position = start + end + 2;
        Ok(value)
    }

    /// Read a terminated string in the given encoding
    pub fn read_string(&mut self, encoding: TextEncoding) -> Result<String> {
        match encoding {
            TextEncoding::ShiftJis => self.read_shift_jis(),
            TextEncoding::Utf16 => self.read_utf16(),
        }
    }

    /// Read the next `i32` without moving
    pub fn peek_i32(&mut self) -> Result<i32> {
        let position = self.position;
        self.at(position, Self::read_i32)
    }

    assert_int!(
        /// Read a byte and require it to be one of `expected`
        assert_u8, read_u8, u8, "Byte"
    );
    assert_int!(
        /// Read an `i16` and require it to be one of `expected`
        assert_i16, read_i16, i16, "Int16"
    );
    assert_int!(
        /// Read a `u32` and require it to be one of `expected`
        assert_u32, read_u32, u32, "UInt32"
    );
    assert_int!(
        /// Read an `i32` and require it to be one of `expected`
        assert_i32, read_i32, i32, "Int32"
    );
    assert_int!(
        /// Read an `i64` and require it to be one of `expected`
        assert_i64, read_i64, i64, "Int64"
    );

    /// Read a float and require it to equal one of `expected`
    pub fn assert_f32(&mut self, expected: &[f32]) -> Result<f32> {
        let offset = self.position;
        let value = self.read_f32()?;
        if expected.iter().any(|e| e.to_bits() == value.to_bits() || *e == value) {
            Ok(value)
        } else {
            Err(Error::mismatch(
                "Single",
                value.to_string(),
                format_options(expected.iter().map(ToString::to_string)),
                offset,
            ))
        }
    }

    /// Read ASCII text and require it to be one of `expected`.
    ///
    /// All options must share the same length; the length of the first one is read.
    pub fn assert_ascii(&mut self, expected: &[&str]) -> Result<String> {
        let offset = self.position;
        let len = expected.first().map_or(0, |s| s.len());
        let bytes = self.take(len)?;
        if expected.iter().any(|s| s.as_bytes() == bytes) {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        } else {
            Err(Error::mismatch(
                "ASCII",
                format!("{:?}", String::from_utf8_lossy(bytes)),
                format_options(expected.iter().map(|s| format!("{s:?}"))),
                offset,
            ))
        }
    }

    /// Read `len` bytes that must all equal `value`
    pub fn assert_pattern(&mut self, len: usize, value: u8) -> Result<()> {
        let offset = self.position;
        let bytes = self.take(len)?;
        if let Some(index) = bytes.iter().position(|&b| b != value) {
            return Err(Error::mismatch(
                "Pattern",
                format!("{:#x}", bytes[index]),
                format!("{len} x {value:#x}"),
                offset + index,
            ));
        }
        Ok(())
    }

    /// Borrow `len` bytes at an absolute offset without moving
    pub fn get_bytes(&mut self, offset: usize, len: usize) -> Result<&'a [u8]> {
        self.at(offset, |c| c.read_bytes(len))
    }

    /// Read an `i32` at an absolute offset without moving
    pub fn get_i32(&mut self, offset: usize) -> Result<i32> {
        self.at(offset, Self::read_i32)
    }

    /// Read `count` `i32`s at an absolute offset without moving
    pub fn get_i32s(&mut self, offset: usize, count: usize) -> Result<Vec<i32>> {
        self.at(offset, |c| c.read_i32s(count))
    }

    /// Read `count` `u16`s at an absolute offset without moving
    pub fn get_u16s(&mut self, offset: usize, count: usize) -> Result<Vec<u16>> {
        self.at(offset, |c| c.read_u16s(count))
    }

    /// Read `count` `u32`s at an absolute offset without moving
    pub fn get_u32s(&mut self, offset: usize, count: usize) -> Result<Vec<u32>> {
        self.at(offset, |c| c.read_u32s(count))
    }

    /// Read a UTF-16 string at an absolute offset without moving
    pub fn get_utf16(&mut self, offset: usize) -> Result<String> {
        self.at(offset, Self::read_utf16)
    }

    /// Read a Shift-JIS string at an absolute offset without moving
    pub fn get_shift_jis(&mut self, offset: usize) -> Result<String> {
        self.at(offset, Self::read_shift_jis)
    }

    /// Read a terminated string at an absolute offset without moving
    pub fn get_string(&mut self, offset: usize, encoding: TextEncoding) -> Result<String> {
        self.at(offset, |c| c.read_string(encoding))
    }
}

fn format_options(options: impl Iterator<Item = String>) -> String {
    format!("[{}]", options.collect::<Vec<_>>().join(", "))
}
