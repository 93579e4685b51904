//! KTX 1.1 serializer and deserializer.
//!
//! Layout after the 12-byte identifier, all integers 32-bit in the order announced by
//! the endianness marker:
//!
//! ```text
//! endianness, glType, glTypeSize, glFormat, glInternalFormat, glBaseInternalFormat,
//! pixelWidth, pixelHeight, pixelDepth, numberOfArrayElements, numberOfFaces,
//! numberOfMipmapLevels, bytesOfKeyValueData
//! for each key/value pair: keyAndValueByteSize, key, NUL, value, padding
//! for each mip level: imageSize, then per element, per face: image, padding;
//!                     then mip padding
//! ```

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::bundle::KtxBundle;
use crate::error::{Error, Result};
use crate::gl_format::{ENDIAN_DEFAULT, ENDIAN_SWAPPED};
use crate::header::{HEADER_SIZE, Header, IDENTIFIER, Info};
use crate::index::Layout;
use crate::level::{LevelBlock, padded, padding};
use crate::metadata::{Metadata, entry_length};

/// Byte order of every 32-bit field in a serialized bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Interprets the four marker bytes that follow the identifier.
    pub fn from_marker(bytes: [u8; 4]) -> Result<Self> {
        match LittleEndian::read_u32(&bytes) {
            ENDIAN_DEFAULT => Ok(Endianness::Little),
            ENDIAN_SWAPPED => Ok(Endianness::Big),
            other => Err(Error::InvalidEndianness(other)),
        }
    }
}

// ==================== Serialization ====================

pub(crate) fn serialized_length(bundle: &KtxBundle) -> usize {
    let per_level = bundle.layout.blobs_per_level();
    let levels: usize = (0..bundle.layout.mip_levels as usize)
        .map(|mip| {
            let first = mip * per_level;
            LevelBlock::new((first..first + per_level).map(|slot| bundle.blobs.size(slot))).total()
        })
        .sum();
    HEADER_SIZE + bundle.metadata.serialized_length() + levels
}

/// Image size of every level, checked for uniformity and 32-bit fit.
fn image_sizes(bundle: &KtxBundle) -> Result<Vec<u32>> {
    let per_level = bundle.layout.blobs_per_level();
    (0..bundle.layout.mip_levels)
        .map(|mip| {
            let first = mip as usize * per_level;
            let expected = bundle.blobs.size(first);
            for slot in first + 1..first + per_level {
                let found = bundle.blobs.size(slot);
                if found != expected {
                    return Err(Error::MismatchedImageSize {
                        mip_level: mip,
                        expected,
                        found,
                    });
                }
            }
            u32::try_from(expected).map_err(|_| Error::ImageTooLarge(expected))
        })
        .collect()
}

pub(crate) fn serialize(bundle: &KtxBundle, destination: &mut [u8]) -> Result<usize> {
    let required = serialized_length(bundle);
    if destination.len() < required {
        return Err(Error::InsufficientDestination {
            required,
            available: destination.len(),
        });
    }
    let kv_length = bundle.metadata.serialized_length();
    let header = Header {
        info: bundle.info,
        number_of_array_elements: bundle.layout.array_length,
        number_of_faces: bundle.layout.cube_faces,
        number_of_mipmap_levels: bundle.layout.mip_levels,
        bytes_of_key_value_data: u32::try_from(kv_length)
            .map_err(|_| Error::ImageTooLarge(kv_length))?,
    };
    let sizes = image_sizes(bundle)?;

    tracing::debug!(
        "Serializing KTX bundle: {} levels x {} elements x {} faces, {} bytes ({:?})",
        header.number_of_mipmap_levels,
        header.number_of_array_elements,
        header.number_of_faces,
        required,
        bundle.endianness
    );

    let target = &mut destination[..required];
    let written = match bundle.endianness {
        Endianness::Little => write_bundle::<LittleEndian>(bundle, &header, &sizes, target),
        Endianness::Big => write_bundle::<BigEndian>(bundle, &header, &sizes, target),
    }
    .map_err(|_| Error::InsufficientDestination {
        required,
        available: destination.len(),
    })?;
    debug_assert_eq!(written, required);
    Ok(written)
}

fn write_bundle<E: ByteOrder>(
    bundle: &KtxBundle,
    header: &Header,
    sizes: &[u32],
    target: &mut [u8],
) -> std::io::Result<usize> {
    let mut out = Cursor::new(target);
    write_header::<E>(&mut out, header)?;
    write_metadata::<E>(&mut out, &bundle.metadata)?;

    let per_level = bundle.layout.blobs_per_level();
    for (mip, &image_size) in sizes.iter().enumerate() {
        out.write_u32::<E>(image_size)?;
        let first = mip * per_level;
        let mut level_bytes = 0;
        for slot in first..first + per_level {
            let image = bundle.blobs.get(slot).unwrap_or_default();
            out.write_all(image)?;
            write_zeros(&mut out, padding(image.len()))?;
            level_bytes += padded(image.len());
        }
        write_zeros(&mut out, padding(level_bytes))?;
        tracing::trace!("Wrote mip level {}: image size {}", mip, image_size);
    }
    Ok(out.position() as usize)
}

fn write_header<E: ByteOrder>(out: &mut Cursor<&mut [u8]>, header: &Header) -> std::io::Result<()> {
    let info = &header.info;
    out.write_all(&IDENTIFIER)?;
    out.write_u32::<E>(ENDIAN_DEFAULT)?;
    out.write_u32::<E>(info.gl_type)?;
    out.write_u32::<E>(info.gl_type_size)?;
    out.write_u32::<E>(info.gl_format)?;
    out.write_u32::<E>(info.gl_internal_format)?;
    out.write_u32::<E>(info.gl_base_internal_format)?;
    out.write_u32::<E>(info.pixel_width)?;
    out.write_u32::<E>(info.pixel_height)?;
    out.write_u32::<E>(info.pixel_depth)?;
    out.write_u32::<E>(header.number_of_array_elements)?;
    out.write_u32::<E>(header.number_of_faces)?;
    out.write_u32::<E>(header.number_of_mipmap_levels)?;
    out.write_u32::<E>(header.bytes_of_key_value_data)?;
    Ok(())
}

fn write_metadata<E: ByteOrder>(out: &mut Cursor<&mut [u8]>, metadata: &Metadata) -> std::io::Result<()> {
    for (key, value) in metadata.iter() {
        let length = entry_length(key, value);
        // Bounded by bytesOfKeyValueData, already checked to fit.
        out.write_u32::<E>(length as u32)?;
        out.write_all(key.as_bytes())?;
        out.write_u8(0)?;
        out.write_all(value)?;
        write_zeros(out, padding(length))?;
    }
    Ok(())
}

fn write_zeros(out: &mut Cursor<&mut [u8]>, count: usize) -> std::io::Result<()> {
    const ZEROS: [u8; 3] = [0; 3];
    out.write_all(&ZEROS[..count])
}

// ==================== Deserialization ====================

/// Bounds-checked reader over the source buffer.
struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader {
            cursor: Cursor::new(bytes),
        }
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.cursor.position() as usize
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::Truncated {
                needed: count,
                available,
            });
        }
        let start = self.cursor.position() as usize;
        let bytes: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + count) as u64);
        Ok(&bytes[start..start + count])
    }

    fn u32<E: ByteOrder>(&mut self) -> Result<u32> {
        let available = self.remaining();
        self.cursor
            .read_u32::<E>()
            .map_err(|_| Error::Truncated { needed: 4, available })
    }
}

pub(crate) fn deserialize(bytes: &[u8], keep_metadata: bool) -> Result<KtxBundle> {
    let result = parse(bytes, keep_metadata);
    if let Err(err) = &result {
        tracing::warn!("Rejected KTX source of {} bytes: {}", bytes.len(), err);
    }
    result
}

fn parse(bytes: &[u8], keep_metadata: bool) -> Result<KtxBundle> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::Truncated {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }
    if bytes[..12] != IDENTIFIER {
        return Err(Error::InvalidIdentifier);
    }
    let endianness = Endianness::from_marker([bytes[12], bytes[13], bytes[14], bytes[15]])?;
    let mut bundle = match endianness {
        Endianness::Little => read_bundle::<LittleEndian>(bytes, keep_metadata),
        Endianness::Big => read_bundle::<BigEndian>(bytes, keep_metadata),
    }?;
    bundle.endianness = endianness;
    Ok(bundle)
}

fn read_header<E: ByteOrder>(reader: &mut Reader<'_>) -> Result<Header> {
    reader.take(IDENTIFIER.len())?;
    let endianness = reader.u32::<E>()?;
    let info = Info {
        endianness,
        gl_type: reader.u32::<E>()?,
        gl_type_size: reader.u32::<E>()?,
        gl_format: reader.u32::<E>()?,
        gl_internal_format: reader.u32::<E>()?,
        gl_base_internal_format: reader.u32::<E>()?,
        pixel_width: reader.u32::<E>()?,
        pixel_height: reader.u32::<E>()?,
        pixel_depth: reader.u32::<E>()?,
    };
    Ok(Header {
        info,
        number_of_array_elements: reader.u32::<E>()?,
        number_of_faces: reader.u32::<E>()?,
        number_of_mipmap_levels: reader.u32::<E>()?,
        bytes_of_key_value_data: reader.u32::<E>()?,
    })
}

fn read_metadata<E: ByteOrder>(block: &[u8], keep: bool) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    let mut reader = Reader::new(block);
    while reader.remaining() > 0 {
        let length = reader.u32::<E>()? as usize;
        let entry = reader.take(length)?;
        // Trailing padding may be cut short by the end of the block.
        reader.take(padding(length).min(reader.remaining()))?;
        if !keep {
            continue;
        }
        let nul = entry
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::InvalidMetadataKey)?;
        let key = std::str::from_utf8(&entry[..nul]).map_err(|_| Error::InvalidMetadataKey)?;
        metadata.set(key, &entry[nul + 1..])?;
    }
    Ok(metadata)
}

fn read_bundle<E: ByteOrder>(bytes: &[u8], keep_metadata: bool) -> Result<KtxBundle> {
    let mut reader = Reader::new(bytes);
    let mut header = read_header::<E>(&mut reader)?;
    // The marker was read in its own byte order, so it always decodes to the default.
    header.info.endianness = ENDIAN_DEFAULT;

    let cube_faces = match header.number_of_faces {
        0 | 1 => 1,
        6 => 6,
        other => return Err(Error::InvalidFaceCount(other)),
    };
    let layout = Layout {
        mip_levels: header.number_of_mipmap_levels.max(1),
        array_length: header.number_of_array_elements.max(1),
        cube_faces,
    };
    tracing::debug!(
        "Parsing KTX bundle: {} levels x {} elements x {} faces, {} bytes of key/value data",
        layout.mip_levels,
        layout.array_length,
        layout.cube_faces,
        header.bytes_of_key_value_data
    );

    let block = reader.take(header.bytes_of_key_value_data as usize)?;
    let metadata = read_metadata::<E>(block, keep_metadata)?;

    // Each level needs at least its image-size field.
    let needed = (layout.mip_levels as usize)
        .checked_mul(4)
        .ok_or(Error::DimensionOverflow)?;
    if needed > reader.remaining() {
        return Err(Error::Truncated {
            needed,
            available: reader.remaining(),
        });
    }

    // Every slot must be backed by at least one source byte before the table is allocated.
    let slots = layout.blob_count().ok_or(Error::DimensionOverflow)?;
    if slots > reader.remaining() {
        return Err(Error::Truncated {
            needed: slots,
            available: reader.remaining(),
        });
    }

    let mut bundle = KtxBundle::with_layout(layout, header.info)?;
    bundle.metadata = metadata;

    let per_level = layout.blobs_per_level();
    for mip in 0..layout.mip_levels as usize {
        let image_size = reader.u32::<E>()? as usize;
        let mut level_bytes = 0;
        for slot in mip * per_level..(mip + 1) * per_level {
            let image = reader.take(image_size)?;
            reader.take(padding(image_size))?;
            if !image.is_empty() {
                bundle.blobs.replace(slot, Box::from(image));
            }
            level_bytes += padded(image_size);
        }
        reader.take(padding(level_bytes))?;
        tracing::trace!("Read mip level {}: image size {}", mip, image_size);
    }
    if reader.remaining() > 0 {
        tracing::debug!("Ignoring {} trailing bytes", reader.remaining());
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BlobIndex;
    use pretty_assertions::assert_eq;

    fn single_blob(data: &[u8]) -> KtxBundle {
        let mut bundle = KtxBundle::new(1, 1, false).unwrap();
        bundle.set_blob(BlobIndex::new(0, 0, 0), data).unwrap();
        bundle
    }

    #[test]
    fn header_is_byte_exact() {
        let mut bundle = KtxBundle::new(1, 1, false).unwrap();
        bundle.info_mut().gl_type = 0x1401;
        bundle.info_mut().pixel_width = 2;
        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 4);
        assert_eq!(&bytes[..12], &IDENTIFIER);
        assert_eq!(&bytes[12..16], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[16..20], &[0x01, 0x14, 0, 0]);
        assert_eq!(&bytes[36..40], &[2, 0, 0, 0]);
        // array elements, faces, levels, kv bytes
        assert_eq!(&bytes[48..60], &[1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(&bytes[60..64], &[0, 0, 0, 0]);
    }

    #[test]
    fn three_byte_image_gets_one_padding_byte() {
        let bytes = single_blob(&[7, 8, 9]).to_bytes().unwrap();
        let level = &bytes[HEADER_SIZE..];
        assert_eq!(level.len() % 4, 0);
        assert_eq!(level, &[3, 0, 0, 0, 7, 8, 9, 0]);
    }

    #[test]
    fn metadata_entry_layout() {
        let mut bundle = KtxBundle::new(1, 1, false).unwrap();
        bundle.set_metadata("ab", "xyz").unwrap();
        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(&bytes[60..64], &[12, 0, 0, 0]);
        assert_eq!(
            &bytes[HEADER_SIZE..HEADER_SIZE + 12],
            &[6, 0, 0, 0, b'a', b'b', 0, b'x', b'y', b'z', 0, 0]
        );
    }

    #[test]
    fn big_endian_round_trip() {
        let mut bundle = single_blob(&[1, 2, 3, 4, 5]);
        bundle.set_endianness(Endianness::Big);
        bundle.info_mut().pixel_height = 0x0102;
        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(&bytes[12..16], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[40..44], &[0, 0, 0x01, 0x02]);
        let parsed = KtxBundle::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.endianness(), Endianness::Big);
        assert_eq!(parsed.info(), bundle.info());
        assert_eq!(parsed.blob(BlobIndex::new(0, 0, 0)), Some(&[1u8, 2, 3, 4, 5][..]));
    }

    #[test]
    fn short_destination_is_untouched() {
        let bundle = single_blob(&[1, 2, 3]);
        let length = bundle.serialized_length();
        let mut dest = vec![0xEEu8; length - 1];
        assert_eq!(
            bundle.serialize(&mut dest),
            Err(Error::InsufficientDestination {
                required: length,
                available: length - 1
            })
        );
        assert!(dest.iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn mismatched_sub_images_are_rejected() {
        let mut bundle = KtxBundle::new(1, 2, false).unwrap();
        bundle.set_blob(BlobIndex::new(0, 0, 0), &[1, 2]).unwrap();
        bundle.set_blob(BlobIndex::new(0, 1, 0), &[1]).unwrap();
        assert_eq!(
            bundle.to_bytes(),
            Err(Error::MismatchedImageSize {
                mip_level: 0,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn partly_filled_cubemap_level_is_rejected() {
        let mut bundle = KtxBundle::new(1, 1, true).unwrap();
        bundle.set_blob(BlobIndex::new(0, 0, 0), &[1, 2, 3, 4]).unwrap();
        let mut dest = vec![0u8; bundle.serialized_length()];
        assert_eq!(
            bundle.serialize(&mut dest),
            Err(Error::MismatchedImageSize {
                mip_level: 0,
                expected: 4,
                found: 0
            })
        );
        assert!(dest.iter().all(|&b| b == 0));
    }

    #[test]
    fn bad_identifier_and_marker() {
        let mut bytes = single_blob(&[1]).to_bytes().unwrap();
        bytes[12] = 0xFF;
        assert!(matches!(
            KtxBundle::from_bytes(&bytes),
            Err(Error::InvalidEndianness(_))
        ));
        bytes[0] = 0;
        assert_eq!(KtxBundle::from_bytes(&bytes), Err(Error::InvalidIdentifier));
    }

    #[test]
    fn short_header_is_truncated() {
        assert_eq!(
            KtxBundle::from_bytes(&IDENTIFIER),
            Err(Error::Truncated {
                needed: HEADER_SIZE,
                available: 12
            })
        );
    }

    #[test]
    fn metadata_is_skipped_unless_requested() {
        let mut bundle = single_blob(&[1, 2, 3, 4]);
        bundle.set_metadata("KTXorientation", "S=r,T=d").unwrap();
        let bytes = bundle.to_bytes().unwrap();

        let skipped = KtxBundle::from_bytes(&bytes).unwrap();
        assert!(skipped.metadata().is_empty());
        assert_eq!(skipped.blob(BlobIndex::new(0, 0, 0)), Some(&[1u8, 2, 3, 4][..]));

        let kept = KtxBundle::from_bytes_with_metadata(&bytes).unwrap();
        assert_eq!(kept.get_metadata("KTXorientation"), Some(&b"S=r,T=d"[..]));
    }

    #[test]
    fn odd_face_count_is_malformed() {
        let mut bytes = single_blob(&[1]).to_bytes().unwrap();
        bytes[52] = 3;
        assert_eq!(KtxBundle::from_bytes(&bytes), Err(Error::InvalidFaceCount(3)));
    }

    #[test]
    fn huge_declared_grid_is_rejected_before_allocating() {
        let words = [
            ENDIAN_DEFAULT, 0, 1, 0, 0, 0, 1, 1, 0,
            u32::MAX, // array elements
            6,        // faces
            1,        // mip levels
            0,        // key/value bytes
            0,        // image size of level 0
        ];
        let mut bytes = IDENTIFIER.to_vec();
        for word in words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        assert_eq!(bytes.len(), 68);
        assert!(matches!(
            KtxBundle::from_bytes(&bytes),
            Err(Error::Truncated { .. } | Error::DimensionOverflow)
        ));
    }

    #[test]
    fn oversized_metadata_block_is_truncated() {
        let mut bytes = single_blob(&[1]).to_bytes().unwrap();
        bytes[60] = 0xFF;
        assert!(matches!(
            KtxBundle::from_bytes(&bytes),
            Err(Error::Truncated { .. })
        ));
    }
}
