//! Named OpenGL enumerants for populating [`Info`](crate::Info).
//!
//! Values match the Khronos GL headers.
#![allow(non_upper_case_globals)]

/// Endianness marker as written by a same-endian writer.
pub const ENDIAN_DEFAULT: u32 = 0x04030201;

/// The marker as seen by a reader of the opposite byte order.
pub const ENDIAN_SWAPPED: u32 = 0x01020304;

// Pixel formats (glFormat, glBaseInternalFormat)
pub const RED: u32 = 0x1903;
pub const RG: u32 = 0x8227;
pub const RGB: u32 = 0x1907;
pub const RGBA: u32 = 0x1908;
pub const BGR: u32 = 0x80E0;
pub const BGRA: u32 = 0x80E1;
pub const LUMINANCE: u32 = 0x1909;
pub const LUMINANCE_ALPHA: u32 = 0x190A;

// Element types (glType)
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const UNSIGNED_SHORT: u32 = 0x1403;
pub const HALF_FLOAT: u32 = 0x140B;
pub const FLOAT: u32 = 0x1406;

// Sized internal formats
pub const R8: u32 = 0x8229;
pub const RG8: u32 = 0x822B;
pub const RGB8: u32 = 0x8051;
pub const RGBA8: u32 = 0x8058;
pub const SRGB8: u32 = 0x8C41;
pub const SRGB8_ALPHA8: u32 = 0x8C43;
pub const R16F: u32 = 0x822D;
pub const RG16F: u32 = 0x822F;
pub const RGBA16F: u32 = 0x881A;
pub const R32F: u32 = 0x822E;
pub const RGBA32F: u32 = 0x8814;
pub const R11F_G11F_B10F: u32 = 0x8C3A;

// S3TC
pub const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT1: u32 = 0x83F1;
pub const COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;

// ETC2 / EAC
pub const COMPRESSED_R11_EAC: u32 = 0x9270;
pub const COMPRESSED_SIGNED_R11_EAC: u32 = 0x9271;
pub const COMPRESSED_RG11_EAC: u32 = 0x9272;
pub const COMPRESSED_SIGNED_RG11_EAC: u32 = 0x9273;
pub const COMPRESSED_RGB8_ETC2: u32 = 0x9274;
pub const COMPRESSED_SRGB8_ETC2: u32 = 0x9275;
pub const COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9276;
pub const COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9277;
pub const COMPRESSED_RGBA8_ETC2_EAC: u32 = 0x9278;
pub const COMPRESSED_SRGB8_ALPHA8_ETC2_EAC: u32 = 0x9279;

// ASTC LDR
pub const COMPRESSED_RGBA_ASTC_4x4: u32 = 0x93B0;
pub const COMPRESSED_RGBA_ASTC_5x5: u32 = 0x93B2;
pub const COMPRESSED_RGBA_ASTC_6x6: u32 = 0x93B4;
pub const COMPRESSED_RGBA_ASTC_8x8: u32 = 0x93B7;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_4x4: u32 = 0x93D0;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8x8: u32 = 0x93D7;
