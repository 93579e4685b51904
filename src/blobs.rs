//! Fixed-size table of blob buffers, one per slot.

use crate::error::{Error, Result};
use crate::index::BlobIndex;

/// Owns one optional buffer per slot. The slot count is set at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlobTable {
    slots: Box<[Option<Box<[u8]>>]>,
}

impl BlobTable {
    /// Fails instead of aborting when `count` slots cannot be allocated.
    pub fn new(count: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(count)
            .map_err(|_| Error::DimensionOverflow)?;
        slots.resize(count, None);
        Ok(BlobTable {
            slots: slots.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Borrowed view of a set slot.
    pub fn get(&self, slot: usize) -> Option<&[u8]> {
        self.slots.get(slot)?.as_deref()
    }

    /// Byte length of a slot, zero when unset.
    pub fn size(&self, slot: usize) -> usize {
        self.get(slot).map_or(0, <[u8]>::len)
    }

    /// Copies `data` into a fresh buffer, dropping the previous one.
    pub fn set(&mut self, slot: usize, data: &[u8]) -> bool {
        self.replace(slot, Box::from(data))
    }

    /// Gives the slot a zero-filled buffer of `size` bytes.
    pub fn allocate(&mut self, slot: usize, size: usize) -> bool {
        self.replace(slot, vec![0u8; size].into_boxed_slice())
    }

    /// Takes ownership of an already built buffer.
    pub fn replace(&mut self, slot: usize, buffer: Box<[u8]>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = Some(buffer);
                true
            }
            None => false,
        }
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut [u8]> {
        self.slots.get_mut(slot)?.as_deref_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&[u8]>> {
        self.slots.iter().map(|s| s.as_deref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, s)| s.as_deref_mut().map(|buf| (slot, buf)))
    }
}

/// Exclusive access to one allocated blob, detached from the rest of the table.
///
/// Produced by [`KtxBundle::blobs_mut`](crate::KtxBundle::blobs_mut). While any `BlobMut`
/// is alive the bundle stays mutably borrowed, so no slot can be set or re-allocated
/// underneath it. Distinct `BlobMut`s never alias and may be sent to separate threads.
#[derive(Debug)]
pub struct BlobMut<'a> {
    pub index: BlobIndex,
    pub data: &'a mut [u8],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_all_unset() {
        let table = BlobTable::new(4).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|b| b.is_none()));
        assert_eq!(table.size(2), 0);
    }

    #[test]
    fn set_replaces_previous_buffer() {
        let mut table = BlobTable::new(2).unwrap();
        assert!(table.set(1, b"abc"));
        assert!(table.set(1, b"z"));
        assert_eq!(table.get(1), Some(&b"z"[..]));
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn allocate_fixes_size() {
        let mut table = BlobTable::new(1).unwrap();
        assert!(table.allocate(0, 16));
        assert_eq!(table.size(0), 16);
        table.get_mut(0).unwrap()[15] = 7;
        assert_eq!(table.get(0).unwrap()[15], 7);
    }

    #[test]
    fn out_of_range_slot_fails() {
        let mut table = BlobTable::new(1).unwrap();
        assert!(!table.set(1, b"x"));
        assert!(!table.allocate(1, 4));
        assert_eq!(table.get(1), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unallocatable_table_is_an_error() {
        assert_eq!(BlobTable::new(usize::MAX / 8), Err(Error::DimensionOverflow));
    }

    #[test]
    fn iter_mut_skips_unset_slots() {
        let mut table = BlobTable::new(3).unwrap();
        table.allocate(0, 1);
        table.allocate(2, 2);
        let slots: Vec<usize> = table.iter_mut().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![0, 2]);
    }
}
