//! DDS file header, as embedded in PC texture payloads

use std::fmt;

use souls_data::BinaryCursor;

use crate::error::Result;
use crate::texture::TexType;

/// Magic at the start of a DDS file
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Header size without the DX10 extension, magic included
pub const DDS_HEADER_SIZE: usize = 0x80;

/// Header size with the DX10 extension
pub const DDS_DX10_HEADER_SIZE: usize = 0x94;

bitflags::bitflags! {
    /// `dwFlags`: which header fields are valid
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsFlags: u32 {
        /// Required
        const CAPS = 0x1;
        /// Required
        const HEIGHT = 0x2;
        /// Required
        const WIDTH = 0x4;
        /// Pitch is given for an uncompressed texture
        const PITCH = 0x8;
        /// Required
        const PIXEL_FORMAT = 0x1000;
        /// Mipmap count is valid
        const MIPMAP_COUNT = 0x20000;
        /// Linear size is given for a compressed texture
        const LINEAR_SIZE = 0x80000;
        /// Depth is valid
        const DEPTH = 0x80_0000;
    }
}

bitflags::bitflags! {
    /// Pixel format flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        /// Alpha channel present in uncompressed data
        const ALPHA_PIXELS = 0x1;
        /// Alpha-only data
        const ALPHA = 0x2;
        /// FourCC code is valid
        const FOURCC = 0x4;
        /// Uncompressed RGB data
        const RGB = 0x40;
        /// YUV data
        const YUV = 0x200;
        /// Single-channel luminance data
        const LUMINANCE = 0x2_0000;
    }
}

bitflags::bitflags! {
    /// `dwCaps`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Caps: u32 {
        /// More than one surface
        const COMPLEX = 0x8;
        /// Required
        const TEXTURE = 0x1000;
        /// Has mipmaps
        const MIPMAP = 0x40_0000;
    }
}

bitflags::bitflags! {
    /// `dwCaps2`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Caps2: u32 {
        /// Cube map
        const CUBEMAP = 0x200;
        /// +X face present
        const CUBEMAP_POSITIVE_X = 0x400;
        /// -X face present
        const CUBEMAP_NEGATIVE_X = 0x800;
        /// +Y face present
        const CUBEMAP_POSITIVE_Y = 0x1000;
        /// -Y face present
        const CUBEMAP_NEGATIVE_Y = 0x2000;
        /// +Z face present
        const CUBEMAP_POSITIVE_Z = 0x4000;
        /// -Z face present
        const CUBEMAP_NEGATIVE_Z = 0x8000;
        /// Volume texture
        const VOLUME = 0x20_0000;
    }
}

/// DXGI pixel format code from the DX10 extension.
///
/// Only the formats that show up in game textures have names; any other
/// code is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    /// `DXGI_FORMAT_UNKNOWN`
    pub const UNKNOWN: Self = Self(0);
    /// `DXGI_FORMAT_R32G32B32A32_FLOAT`
    pub const R32G32B32A32_FLOAT: Self = Self(2);
    /// `DXGI_FORMAT_R16G16B16A16_FLOAT`
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    /// `DXGI_FORMAT_R8G8B8A8_UNORM`
    pub const R8G8B8A8_UNORM: Self = Self(28);
    /// `DXGI_FORMAT_R8G8B8A8_UNORM_SRGB`
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    /// `DXGI_FORMAT_R8_UNORM`
    pub const R8_UNORM: Self = Self(61);
    /// `DXGI_FORMAT_BC1_UNORM`
    pub const BC1_UNORM: Self = Self(71);
    /// `DXGI_FORMAT_BC1_UNORM_SRGB`
    pub const BC1_UNORM_SRGB: Self = Self(72);
    /// `DXGI_FORMAT_BC2_UNORM`
    pub const BC2_UNORM: Self = Self(74);
    /// `DXGI_FORMAT_BC2_UNORM_SRGB`
    pub const BC2_UNORM_SRGB: Self = Self(75);
    /// `DXGI_FORMAT_BC3_UNORM`
    pub const BC3_UNORM: Self = Self(77);
    /// `DXGI_FORMAT_BC3_UNORM_SRGB`
    pub const BC3_UNORM_SRGB: Self = Self(78);
    /// `DXGI_FORMAT_BC4_UNORM`
    pub const BC4_UNORM: Self = Self(80);
    /// `DXGI_FORMAT_BC4_SNORM`
    pub const BC4_SNORM: Self = Self(81);
    /// `DXGI_FORMAT_BC5_UNORM`
    pub const BC5_UNORM: Self = Self(83);
    /// `DXGI_FORMAT_BC5_SNORM`
    pub const BC5_SNORM: Self = Self(84);
    /// `DXGI_FORMAT_B8G8R8A8_UNORM`
    pub const B8G8R8A8_UNORM: Self = Self(87);
    /// `DXGI_FORMAT_B8G8R8A8_UNORM_SRGB`
    pub const B8G8R8A8_UNORM_SRGB: Self = Self(91);
    /// `DXGI_FORMAT_BC6H_UF16`
    pub const BC6H_UF16: Self = Self(95);
    /// `DXGI_FORMAT_BC6H_SF16`
    pub const BC6H_SF16: Self = Self(96);
    /// `DXGI_FORMAT_BC7_UNORM`
    pub const BC7_UNORM: Self = Self(98);
    /// `DXGI_FORMAT_BC7_UNORM_SRGB`
    pub const BC7_UNORM_SRGB: Self = Self(99);

    /// Short name for the known formats
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::UNKNOWN => "UNKNOWN",
            Self::R32G32B32A32_FLOAT => "R32G32B32A32_FLOAT",
            Self::R16G16B16A16_FLOAT => "R16G16B16A16_FLOAT",
            Self::R8G8B8A8_UNORM => "R8G8B8A8_UNORM",
            Self::R8G8B8A8_UNORM_SRGB => "R8G8B8A8_UNORM_SRGB",
            Self::R8_UNORM => "R8_UNORM",
            Self::BC1_UNORM => "BC1_UNORM",
            Self::BC1_UNORM_SRGB => "BC1_UNORM_SRGB",
            Self::BC2_UNORM => "BC2_UNORM",
            Self::BC2_UNORM_SRGB => "BC2_UNORM_SRGB",
            Self::BC3_UNORM => "BC3_UNORM",
            Self::BC3_UNORM_SRGB => "BC3_UNORM_SRGB",
            Self::BC4_UNORM => "BC4_UNORM",
            Self::BC4_SNORM => "BC4_SNORM",
            Self::BC5_UNORM => "BC5_UNORM",
            Self::BC5_SNORM => "BC5_SNORM",
            Self::B8G8R8A8_UNORM => "B8G8R8A8_UNORM",
            Self::B8G8R8A8_UNORM_SRGB => "B8G8R8A8_UNORM_SRGB",
            Self::BC6H_UF16 => "BC6H_UF16",
            Self::BC6H_SF16 => "BC6H_SF16",
            Self::BC7_UNORM => "BC7_UNORM",
            Self::BC7_UNORM_SRGB => "BC7_UNORM_SRGB",
            _ => return None,
        })
    }
}

impl fmt::Display for DxgiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "DXGI({})", self.0),
        }
    }
}

/// `DDS_PIXELFORMAT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFormat {
    /// Format flags
    pub flags: PixelFormatFlags,
    /// Compression code such as `DXT1` or `DX10`
    pub four_cc: [u8; 4],
    /// Bits per pixel for uncompressed data
    pub rgb_bit_count: i32,
    /// Red mask
    pub r_bit_mask: u32,
    /// Green mask
    pub g_bit_mask: u32,
    /// Blue mask
    pub b_bit_mask: u32,
    /// Alpha mask
    pub a_bit_mask: u32,
}

impl PixelFormat {
    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        cursor.assert_i32(&[32])?;
        let flags = PixelFormatFlags::from_bits_retain(cursor.read_u32()?);
        let mut four_cc = [0u8; 4];
        four_cc.copy_from_slice(cursor.read_bytes(4)?);
        Ok(Self {
            flags,
            four_cc,
            rgb_bit_count: cursor.read_i32()?,
            r_bit_mask: cursor.read_u32()?,
            g_bit_mask: cursor.read_u32()?,
            b_bit_mask: cursor.read_u32()?,
            a_bit_mask: cursor.read_u32()?,
        })
    }

    /// FourCC as text
    pub fn four_cc_str(&self) -> String {
        String::from_utf8_lossy(&self.four_cc)
            .trim_end_matches('\0')
            .to_string()
    }
}

/// `DDS_HEADER_DXT10`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dx10Header {
    /// Pixel format
    pub dxgi_format: DxgiFormat,
    /// 2 = 1D, 3 = 2D, 4 = 3D
    pub resource_dimension: u32,
    /// 0x4 marks a cube map
    pub misc_flag: u32,
    /// Number of array elements
    pub array_size: u32,
    /// Alpha mode
    pub misc_flags2: u32,
}

/// Parsed DDS header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    /// Valid-field flags
    pub flags: DdsFlags,
    /// Height in pixels
    pub height: i32,
    /// Width in pixels
    pub width: i32,
    /// Pitch or linear size
    pub pitch_or_linear_size: i32,
    /// Depth of a volume texture
    pub depth: i32,
    /// Number of mipmaps
    pub mipmap_count: i32,
    /// Reserved words
    pub reserved1: Vec<i32>,
    /// Pixel format
    pub pixel_format: PixelFormat,
    /// Surface capabilities
    pub caps: Caps,
    /// Cube map and volume capabilities
    pub caps2: Caps2,
    /// Unused
    pub caps3: i32,
    /// Unused
    pub caps4: i32,
    /// Unused
    pub reserved2: i32,
    /// Extension present when the FourCC is `DX10`
    pub dx10: Option<Dx10Header>,
}

impl DdsHeader {
    /// Whether `data` starts with the DDS magic
    pub fn is(data: &[u8]) -> bool {
        data.starts_with(DDS_MAGIC)
    }

    /// Parse the header at the start of a DDS file. DDS is always little-endian.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        cursor.assert_ascii(&["DDS "])?;
        cursor.assert_i32(&[0x7C])?;
        let flags = DdsFlags::from_bits_retain(cursor.read_u32()?);
        let height = cursor.read_i32()?;
        let width = cursor.read_i32()?;
        let pitch_or_linear_size = cursor.read_i32()?;
        let depth = cursor.read_i32()?;
        let mipmap_count = cursor.read_i32()?;
        let reserved1 = cursor.read_i32s(11)?;
        let pixel_format = PixelFormat::read(&mut cursor)?;
        let caps = Caps::from_bits_retain(cursor.read_u32()?);
        let caps2 = Caps2::from_bits_retain(cursor.read_u32()?);
        let caps3 = cursor.read_i32()?;
        let caps4 = cursor.read_i32()?;
        let reserved2 = cursor.read_i32()?;

        let dx10 = if &pixel_format.four_cc == b"DX10" {
            Some(Dx10Header {
                dxgi_format: DxgiFormat(cursor.read_u32()?),
                resource_dimension: cursor.read_u32()?,
                misc_flag: cursor.read_u32()?,
                array_size: cursor.read_u32()?,
                misc_flags2: cursor.read_u32()?,
            })
        } else {
            None
        };

        Ok(Self {
            flags,
            height,
            width,
            pitch_or_linear_size,
            depth,
            mipmap_count,
            reserved1,
            pixel_format,
            caps,
            caps2,
            caps3,
            caps4,
            reserved2,
            dx10,
        })
    }

    /// Offset of the pixel data from the start of the file
    pub fn data_offset(&self) -> usize {
        if self.dx10.is_some() {
            DDS_DX10_HEADER_SIZE
        } else {
            DDS_HEADER_SIZE
        }
    }

    /// Texture kind implied by the capability bits
    pub fn texture_type(&self) -> TexType {
        if self.caps2.contains(Caps2::CUBEMAP) {
            TexType::Cubemap
        } else if self.caps2.contains(Caps2::VOLUME) {
            TexType::Volume
        } else {
            TexType::Texture
        }
    }

    /// Human-readable compression name: the DXGI format when present, else the FourCC
    pub fn format_name(&self) -> String {
        match &self.dx10 {
            Some(dx10) => dx10.dxgi_format.to_string(),
            None if self.pixel_format.flags.contains(PixelFormatFlags::FOURCC) => {
                self.pixel_format.four_cc_str()
            }
            None => format!("RGB{}", self.pixel_format.rgb_bit_count),
        }
    }
}
