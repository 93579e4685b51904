//! Error types for `ktxbundle`

use thiserror::Error;

use crate::index::BlobIndex;

/// The error type for bundle operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== Addressing ====================
    /// The blob index lies outside the bundle's fixed grid.
    #[error("blob index {index} out of range for {mip_levels} levels x {array_length} elements x {cube_faces} faces")]
    BlobIndexOutOfRange {
        index: BlobIndex,
        mip_levels: u32,
        array_length: u32,
        cube_faces: u32,
    },

    /// The slot exists but holds no buffer.
    #[error("blob {0} is unset")]
    BlobUnset(BlobIndex),

    // ==================== Serialization ====================
    /// The destination buffer cannot hold the serialized bundle.
    #[error("destination holds {available} bytes, serialized bundle needs {required}")]
    InsufficientDestination { required: usize, available: usize },

    /// Sub-images of one mip level must share the level's image size.
    #[error("mip level {mip_level}: image size is {expected} bytes but a sub-image has {found}")]
    MismatchedImageSize {
        mip_level: u32,
        expected: usize,
        found: usize,
    },

    /// A blob or metadata entry does not fit a 32-bit length field.
    #[error("{0} bytes do not fit a 32-bit length field")]
    ImageTooLarge(usize),

    // ==================== Deserialization ====================
    /// The source ends before a declared field or payload.
    #[error("source truncated: needed {needed} bytes, {available} remain")]
    Truncated { needed: usize, available: usize },

    /// The 12-byte KTX identifier does not match.
    #[error("invalid KTX identifier")]
    InvalidIdentifier,

    /// The endianness marker is neither the default nor its byte swap.
    #[error("invalid endianness marker: 0x{0:08X}")]
    InvalidEndianness(u32),

    /// Face count must be 1 or 6.
    #[error("invalid cube face count: {0}")]
    InvalidFaceCount(u32),

    /// The declared blob grid does not fit in memory arithmetic.
    #[error("declared texture dimensions overflow")]
    DimensionOverflow,

    // ==================== Metadata ====================
    /// Metadata keys are NUL-terminated UTF-8 on the wire.
    #[error("invalid metadata key")]
    InvalidMetadataKey,
}

/// A specialized Result type for bundle operations.
pub type Result<T> = std::result::Result<T, Error>;
