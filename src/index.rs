use std::fmt;

/// Address of one blob: a mip level, an array element and a cube face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlobIndex {
    pub mip_level: u32,
    pub array_index: u32,
    pub cube_face: u32,
}

impl BlobIndex {
    pub const fn new(mip_level: u32, array_index: u32, cube_face: u32) -> Self {
        BlobIndex {
            mip_level,
            array_index,
            cube_face,
        }
    }
}

impl fmt::Display for BlobIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(mip {}, element {}, face {})",
            self.mip_level, self.array_index, self.cube_face
        )
    }
}

/// The fixed grid a bundle is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub mip_levels: u32,
    pub array_length: u32,
    pub cube_faces: u32,
}

impl Layout {
    /// Total slot count, or `None` if it overflows.
    pub fn blob_count(&self) -> Option<usize> {
        (self.mip_levels as usize)
            .checked_mul(self.array_length as usize)?
            .checked_mul(self.cube_faces as usize)
    }

    /// Blobs stored per mip level.
    pub fn blobs_per_level(&self) -> usize {
        self.array_length as usize * self.cube_faces as usize
    }

    /// Mip-major, then array element, then face.
    pub fn slot(&self, index: BlobIndex) -> Option<usize> {
        if index.mip_level >= self.mip_levels
            || index.array_index >= self.array_length
            || index.cube_face >= self.cube_faces
        {
            return None;
        }
        let faces = self.cube_faces as usize;
        Some(
            index.mip_level as usize * self.blobs_per_level()
                + index.array_index as usize * faces
                + index.cube_face as usize,
        )
    }

    /// Inverse of [`Layout::slot`] for an in-range slot.
    pub fn index_of(&self, slot: usize) -> BlobIndex {
        let faces = self.cube_faces as usize;
        let per_level = self.blobs_per_level();
        BlobIndex {
            mip_level: (slot / per_level) as u32,
            array_index: ((slot % per_level) / faces) as u32,
            cube_face: (slot % faces) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_ARRAY: Layout = Layout {
        mip_levels: 3,
        array_length: 2,
        cube_faces: 6,
    };

    #[test]
    fn slots_are_mip_major_then_array_then_face() {
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(0, 0, 0)), Some(0));
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(0, 0, 5)), Some(5));
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(0, 1, 0)), Some(6));
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(1, 0, 0)), Some(12));
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(2, 1, 5)), Some(35));
    }

    #[test]
    fn every_slot_is_unique_and_inverts() {
        let count = CUBE_ARRAY.blob_count().unwrap();
        assert_eq!(count, 36);
        for slot in 0..count {
            let index = CUBE_ARRAY.index_of(slot);
            assert_eq!(CUBE_ARRAY.slot(index), Some(slot));
        }
    }

    #[test]
    fn out_of_range_components_have_no_slot() {
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(3, 0, 0)), None);
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(0, 2, 0)), None);
        assert_eq!(CUBE_ARRAY.slot(BlobIndex::new(0, 0, 6)), None);
    }

    #[test]
    fn overflowing_grid_has_no_count() {
        let layout = Layout {
            mip_levels: u32::MAX,
            array_length: u32::MAX,
            cube_faces: 6,
        };
        assert_eq!(layout.blob_count(), None);
    }
}
