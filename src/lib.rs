//! # ktxbundle
//!
//! KTX 1.1 texture bundles: a fixed grid of opaque GPU-ready blobs addressed by mip level,
//! array element and cube face, plus key/value metadata, serialized byte-exactly to and
//! from the KTX container format.
//!
//! ```
//! use ktxbundle::{gl_format, BlobIndex, KtxBundle};
//!
//! let mut bundle = KtxBundle::new(1, 1, false)?;
//! bundle.info_mut().gl_internal_format = gl_format::COMPRESSED_RGBA8_ETC2_EAC;
//! bundle.set_blob(BlobIndex::new(0, 0, 0), &[0u8; 16])?;
//! let bytes = bundle.to_bytes()?;
//!
//! let parsed = KtxBundle::from_bytes(&bytes)?;
//! assert_eq!(parsed.blob(BlobIndex::new(0, 0, 0)).map(<[u8]>::len), Some(16));
//! # Ok::<(), ktxbundle::Error>(())
//! ```

pub mod gl_format;
pub(crate) mod header;
pub(crate) mod index;
pub(crate) mod level;
pub(crate) mod blobs;
pub mod metadata;
pub mod error;
pub mod codec;

pub mod bundle;

pub use blobs::BlobMut;
pub use bundle::KtxBundle;
pub use codec::Endianness;
pub use error::{Error, Result};
pub use header::{IDENTIFIER, Info};
pub use index::BlobIndex;
pub use metadata::Metadata;

#[cfg(test)]
mod tests {
    use crate::{BlobIndex, KtxBundle, gl_format};

    #[test]
    fn it_works() {
        let size = 4u32;
        let mut bundle = KtxBundle::new(1, 1, false).unwrap();
        let info = bundle.info_mut();
        info.gl_type = gl_format::HALF_FLOAT;
        info.gl_type_size = 2;
        info.gl_format = gl_format::RED;
        info.gl_internal_format = gl_format::R16F;
        info.gl_base_internal_format = gl_format::RED;
        info.pixel_width = size;
        info.pixel_height = size;
        let texels = vec![0x3Cu8; (size * size * 2) as usize];
        bundle.set_blob(BlobIndex::new(0, 0, 0), &texels).unwrap();

        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(bytes.len(), 64 + 4 + texels.len());
        assert_eq!(KtxBundle::from_bytes(&bytes).unwrap(), bundle);
    }
}
