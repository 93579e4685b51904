use crate::blobs::{BlobMut, BlobTable};
use crate::codec::{self, Endianness};
use crate::error::{Error, Result};
use crate::header::Info;
use crate::index::{BlobIndex, Layout};
use crate::metadata::Metadata;

/// A structured set of opaque data blobs that together make up one texture object,
/// ready to hand to the GPU. Well suited to block-compressed data.
///
/// A bundle may hold several mip levels, cubemap faces and array elements. The number
/// of blobs is fixed at construction:
///
/// ```text
/// blob_count = mip_levels * array_length * (cubemap ? 6 : 1)
/// ```
///
/// Bundles serialize to and from the KTX 1.1 container format. No CPU-side decoding is
/// offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KtxBundle {
    pub(crate) info: Info,
    pub(crate) layout: Layout,
    pub(crate) blobs: BlobTable,
    pub(crate) metadata: Metadata,
    pub(crate) endianness: Endianness,
}

impl KtxBundle {
    /// Creates a grid of unset blobs, to be filled with [`set_blob`](Self::set_blob) or
    /// [`allocate_blob`](Self::allocate_blob). Zero counts are treated as one.
    pub fn new(num_mip_levels: u32, array_length: u32, is_cubemap: bool) -> Result<Self> {
        let layout = Layout {
            mip_levels: num_mip_levels.max(1),
            array_length: array_length.max(1),
            cube_faces: if is_cubemap { 6 } else { 1 },
        };
        Self::with_layout(layout, Info::new())
    }

    pub(crate) fn with_layout(layout: Layout, info: Info) -> Result<Self> {
        let count = layout.blob_count().ok_or(Error::DimensionOverflow)?;
        Ok(KtxBundle {
            info,
            layout,
            blobs: BlobTable::new(count)?,
            metadata: Metadata::new(),
            endianness: Endianness::default(),
        })
    }

    /// Parses a KTX 1.1 buffer.
    ///
    /// The file's own key/value block is validated and skipped, so the returned bundle
    /// has empty metadata. Use [`from_bytes_with_metadata`](Self::from_bytes_with_metadata)
    /// to keep it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        codec::deserialize(bytes, false)
    }

    /// Parses a KTX 1.1 buffer and repopulates the metadata store from its key/value block.
    pub fn from_bytes_with_metadata(bytes: &[u8]) -> Result<Self> {
        codec::deserialize(bytes, true)
    }

    /// Writes the bundle into `destination` and returns the number of bytes written.
    ///
    /// Nothing is written if `destination` is shorter than
    /// [`serialized_length`](Self::serialized_length).
    ///
    /// A level stores a single image size, so every sub-image of a level must have the
    /// same length. Unset blobs count as zero bytes; a level with some blobs set and others
    /// unset (or of different lengths) fails with [`Error::MismatchedImageSize`] before
    /// anything is written.
    pub fn serialize(&self, destination: &mut [u8]) -> Result<usize> {
        codec::serialize(self, destination)
    }

    /// Exact size of the serialized bundle in bytes.
    pub fn serialized_length(&self) -> usize {
        codec::serialized_length(self)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; self.serialized_length()];
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }

    /// Byte order used by [`serialize`](Self::serialize). Parsed bundles keep the order of
    /// their source.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn get_metadata(&self, key: &str) -> Option<&[u8]> {
        self.metadata.get(key)
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<Vec<u8>>) -> Result<()> {
        self.metadata.set(key, value)
    }

    /// Never zero.
    pub fn num_mip_levels(&self) -> u32 {
        self.layout.mip_levels
    }

    /// Never zero.
    pub fn array_length(&self) -> u32 {
        self.layout.array_length
    }

    pub fn num_cube_faces(&self) -> u32 {
        self.layout.cube_faces
    }

    pub fn is_cubemap(&self) -> bool {
        self.layout.cube_faces > 1
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    fn slot(&self, index: BlobIndex) -> Result<usize> {
        self.layout.slot(index).ok_or(Error::BlobIndexOutOfRange {
            index,
            mip_levels: self.layout.mip_levels,
            array_length: self.layout.array_length,
            cube_faces: self.layout.cube_faces,
        })
    }

    /// Borrowed view of a blob. `None` if the index is out of range or the blob is unset.
    pub fn blob(&self, index: BlobIndex) -> Option<&[u8]> {
        self.try_blob(index).ok()
    }

    /// Like [`blob`](Self::blob), but says why the lookup failed.
    pub fn try_blob(&self, index: BlobIndex) -> Result<&[u8]> {
        let slot = self.slot(index)?;
        self.blobs.get(slot).ok_or(Error::BlobUnset(index))
    }

    /// Copies `data` into the blob at `index`, replacing whatever was there.
    pub fn set_blob(&mut self, index: BlobIndex, data: &[u8]) -> Result<()> {
        let slot = self.slot(index)?;
        self.blobs.set(slot, data);
        Ok(())
    }

    /// Gives the blob at `index` a zero-filled buffer of `size` bytes, replacing whatever
    /// was there. Allocate every slot up front, then fill them through
    /// [`blobs_mut`](Self::blobs_mut), possibly from several threads.
    pub fn allocate_blob(&mut self, index: BlobIndex, size: usize) -> Result<()> {
        let slot = self.slot(index)?;
        self.blobs.allocate(slot, size);
        Ok(())
    }

    /// Mutable view of one allocated blob.
    pub fn blob_mut(&mut self, index: BlobIndex) -> Option<&mut [u8]> {
        let slot = self.layout.slot(index)?;
        self.blobs.get_mut(slot)
    }

    /// Every set blob in slot order, with its index.
    pub fn blobs(&self) -> impl Iterator<Item = (BlobIndex, &[u8])> {
        let layout = self.layout;
        self.blobs
            .iter()
            .enumerate()
            .filter_map(move |(slot, blob)| blob.map(|b| (layout.index_of(slot), b)))
    }

    /// Splits the table into disjoint mutable views, one per allocated blob.
    ///
    /// Sizes are frozen for as long as any view lives, so the views can be filled
    /// concurrently without further coordination.
    pub fn blobs_mut(&mut self) -> impl Iterator<Item = BlobMut<'_>> {
        let layout = self.layout;
        self.blobs.iter_mut().map(move |(slot, data)| BlobMut {
            index: layout.index_of(slot),
            data,
        })
    }
}
