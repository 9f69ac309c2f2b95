//! Texture entries of a TPF container

use souls_data::{BinaryCursor, TextEncoding};
use souls_dcx::{Codec, CompressionType};

use crate::dds::DdsHeader;
use crate::error::{Error, Result, to_usize};
use crate::tpf::TpfPlatform;

/// Kind of texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TexType {
    /// Plain 2D texture
    Texture = 0,
    /// Six-faced cube map
    Cubemap = 1,
    /// 3D texture
    Volume = 2,
}

impl TexType {
    /// Convert from the stored byte
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Texture),
            1 => Some(Self::Cubemap),
            2 => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Extra metadata stored for console textures, whose payloads have no DDS header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TexHeader {
    /// Width in pixels
    pub width: i16,
    /// Height in pixels
    pub height: i16,
    /// Number of faces (PS4 and Xbox One)
    pub texture_count: Option<i32>,
    /// Unknown (PS3)
    pub unk1: Option<i32>,
    /// Unknown (PS3, PS4 and Xbox One)
    pub unk2: Option<i32>,
    /// DXGI format code (PS4 and Xbox One)
    pub dxgi_format: Option<i32>,
}

impl TexHeader {
    fn read(cursor: &mut BinaryCursor<'_>, platform: TpfPlatform, flag2: u8) -> Result<Self> {
        let mut header = Self {
            width: cursor.read_i16()?,
            height: cursor.read_i16()?,
            ..Self::default()
        };
        match platform {
            TpfPlatform::Xbox360 => {
                cursor.assert_i32(&[0])?;
            }
            TpfPlatform::Ps3 => {
                header.unk1 = Some(cursor.read_i32()?);
                if flag2 != 0 {
                    header.unk2 = Some(cursor.assert_i32(&[0, 0x69E0, 0xAAE4])?);
                }
            }
            TpfPlatform::Ps4 | TpfPlatform::XboxOne => {
                header.texture_count = Some(cursor.assert_i32(&[1, 6])?);
                header.unk2 = Some(cursor.assert_i32(&[0xD])?);
            }
            TpfPlatform::Pc => {}
        }
        Ok(header)
    }
}

/// Optional block of float shader parameters attached to a texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloatStruct {
    /// Unknown
    pub unk00: i32,
    /// Parameter values
    pub values: Vec<f32>,
}

impl FloatStruct {
    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let unk00 = cursor.read_i32()?;
        let length = cursor.read_i32()?;
        if length < 0 || length % 4 != 0 {
            return Err(Error::FloatStructLength(length));
        }
        let values = cursor.read_f32s(length as usize / 4)?;
        Ok(Self { unk00, values })
    }
}

/// One texture from a TPF container
#[derive(Debug, Clone, PartialEq)]
pub struct TpfTexture {
    /// Texture name, without extension
    pub name: String,
    /// Platform-specific format code
    pub format: u8,
    /// Texture kind
    pub tex_type: TexType,
    /// Number of mipmaps
    pub mipmaps: u8,
    /// 2 and 3 mean the payload is compressed
    pub flags1: u8,
    /// Pixel payload; a complete DDS file on PC
    pub bytes: Vec<u8>,
    /// Console metadata
    pub header: Option<TexHeader>,
    /// Float parameters
    pub float_struct: Option<FloatStruct>,
    /// Container the payload was stored in
    pub compression: Option<CompressionType>,
}

impl TpfTexture {
    pub(crate) fn read(
        cursor: &mut BinaryCursor<'_>,
        index: usize,
        platform: TpfPlatform,
        flag2: u8,
        encoding: u8,
        codec: &dyn Codec,
    ) -> Result<Self> {
        let file_offset = cursor.read_u32()? as usize;
        let file_size = to_usize(cursor.read_i32()?, "file size")?;
        let format = cursor.read_u8()?;
        let tex_type = cursor.assert_u8(&[0, 1, 2])?;
        let tex_type = TexType::from_raw(tex_type).unwrap_or(TexType::Texture);
        let mipmaps = cursor.read_u8()?;
        let flags1 = cursor.assert_u8(&[0, 1, 2, 3])?;

        let header = if platform == TpfPlatform::Pc {
            None
        } else {
            Some(TexHeader::read(cursor, platform, flag2)?)
        };

        let name_offset = cursor.read_u32()? as usize;
        let has_float_struct = cursor.assert_i32(&[0, 1])? == 1;

        let header = match (header, platform) {
            (Some(mut header), TpfPlatform::Ps4 | TpfPlatform::XboxOne) => {
                header.dxgi_format = Some(cursor.read_i32()?);
                Some(header)
            }
            (header, _) => header,
        };

        let float_struct = if has_float_struct {
            Some(FloatStruct::read(cursor)?)
        } else {
            None
        };

        let stored = cursor.get_bytes(file_offset, file_size)?;
        let (bytes, compression) = if flags1 == 2 || flags1 == 3 {
            let unpacked = souls_dcx::decompress(stored, codec)
                .map_err(|source| Error::Decompress { index, source })?;
            if unpacked.kind != CompressionType::DcpEdge {
                return Err(Error::UnexpectedCompression {
                    index,
                    kind: unpacked.kind,
                });
            }
            (unpacked.data, Some(unpacked.kind))
        } else {
            (stored.to_vec(), None)
        };

        let encoding = if encoding == 1 {
            TextEncoding::Utf16
        } else {
            TextEncoding::ShiftJis
        };
        let name = cursor.get_string(name_offset, encoding)?;

        log::trace!(
            "Texture {index} {name:?}: format {format}, {tex_type:?}, {mipmaps} mips, {} bytes",
            bytes.len()
        );

        Ok(Self {
            name,
            format,
            tex_type,
            mipmaps,
            flags1,
            bytes,
            header,
            float_struct,
            compression,
        })
    }

    /// Parse the DDS header when the payload is a complete DDS file
    pub fn dds_header(&self) -> Result<Option<DdsHeader>> {
        if DdsHeader::is(&self.bytes) {
            DdsHeader::read(&self.bytes).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Payload with any DDS header stripped
    pub fn pixel_data(&self) -> Result<&[u8]> {
        let offset = self.dds_header()?.map_or(0, |h| h.data_offset());
        Ok(self.bytes.get(offset..).unwrap_or_default())
    }
}
