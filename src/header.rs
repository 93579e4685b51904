use crate::gl_format::ENDIAN_DEFAULT;

/// The 12-byte KTX 1.1 file identifier.
pub const IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

/// Identifier plus thirteen 32-bit fields.
pub(crate) const HEADER_SIZE: usize = 64;

/// Describes the texture object as a whole: its format, type and base dimensions.
///
/// Nothing here is validated; the values are carried to and from the wire as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Info {
    pub endianness: u32,
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
}

impl Info {
    /// A zeroed descriptor carrying the default endianness marker.
    pub fn new() -> Self {
        Info {
            endianness: ENDIAN_DEFAULT,
            ..Default::default()
        }
    }
}

/// The fixed header as laid out on the wire, after the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub info: Info,
    pub number_of_array_elements: u32,
    pub number_of_faces: u32,
    pub number_of_mipmap_levels: u32,
    pub bytes_of_key_value_data: u32,
}
