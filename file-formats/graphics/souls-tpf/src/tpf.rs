//! TPF container header

use souls_data::{BinaryCursor, Endian};
use souls_dcx::Codec;

use crate::error::{Result, to_usize};
use crate::texture::TpfTexture;

/// Platform a TPF was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TpfPlatform {
    /// Windows; payloads are full DDS files
    Pc = 0,
    /// Xbox 360
    Xbox360 = 1,
    /// PlayStation 3
    Ps3 = 2,
    /// PlayStation 4
    Ps4 = 4,
    /// Xbox One
    XboxOne = 5,
}

impl TpfPlatform {
    /// Convert from the stored byte
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Pc),
            1 => Some(Self::Xbox360),
            2 => Some(Self::Ps3),
            4 => Some(Self::Ps4),
            5 => Some(Self::XboxOne),
            _ => None,
        }
    }

    /// Byte order of containers for this platform
    pub fn endian(self) -> Endian {
        match self {
            Self::Xbox360 | Self::Ps3 => Endian::Big,
            _ => Endian::Little,
        }
    }
}

/// A decoded TPF container
#[derive(Debug, Clone, PartialEq)]
pub struct Tpf {
    /// Target platform
    pub platform: TpfPlatform,
    /// Unknown; affects the PS3 texture header
    pub flag2: u8,
    /// Name encoding: 1 is UTF-16, 0 and 2 are Shift-JIS
    pub encoding: u8,
    /// Textures in stored order
    pub textures: Vec<TpfTexture>,
}

impl Tpf {
    /// Whether `data` starts with the TPF magic
    pub fn is(data: &[u8]) -> bool {
        data.starts_with(b"TPF\0")
    }

    /// Read the container and every texture.
    ///
    /// `codec` is only consulted for compressed texture payloads.
    pub fn read(data: &[u8], codec: &dyn Codec) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        cursor.assert_ascii(&["TPF\0"])?;

        let raw_platform = cursor.at(0xC, |c| c.assert_u8(&[0, 1, 2, 4, 5]))?;
        let platform = TpfPlatform::from_raw(raw_platform).unwrap_or(TpfPlatform::Pc);
        cursor.set_endian(platform.endian());

        let _data_len = cursor.read_i32()?;
        let file_count = to_usize(cursor.read_i32()?, "file count")?;
        cursor.skip(1)?;
        let flag2 = cursor.assert_u8(&[0, 1, 2, 3])?;
        let encoding = cursor.assert_u8(&[0, 1, 2])?;
        cursor.assert_u8(&[0])?;

        log::debug!("TPF: {file_count} textures, platform {platform:?}, encoding {encoding}");

        let mut textures = Vec::with_capacity(file_count.min(data.len() / 0x14));
        for index in 0..file_count {
            textures.push(TpfTexture::read(
                &mut cursor,
                index,
                platform,
                flag2,
                encoding,
                codec,
            )?);
        }

        Ok(Self {
            platform,
            flag2,
            encoding,
            textures,
        })
    }

    /// Find a texture by name
    pub fn texture(&self, name: &str) -> Option<&TpfTexture> {
        self.textures.iter().find(|t| t.name == name)
    }
}
