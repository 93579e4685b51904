//! String-keyed metadata carried in the key/value block.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::level::padded;

/// Insertion-ordered key/value store. Overwriting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: IndexMap<String, Vec<u8>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`. Keys may not contain NUL, which terminates them on the wire.
    pub fn set(&mut self, key: &str, value: impl Into<Vec<u8>>) -> Result<()> {
        if key.contains('\0') {
            return Err(Error::InvalidMetadataKey);
        }
        self.entries.insert(key.to_owned(), value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Byte length of the serialized key/value block.
    pub(crate) fn serialized_length(&self) -> usize {
        self.iter()
            .map(|(key, value)| 4 + padded(entry_length(key, value)))
            .sum()
    }
}

/// Key, NUL separator and value, before padding.
pub(crate) fn entry_length(key: &str, value: &[u8]) -> usize {
    key.len() + 1 + value.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_replaces_value() {
        let mut meta = Metadata::new();
        meta.set("a", "1").unwrap();
        meta.set("a", "22").unwrap();
        assert_eq!(meta.get("a"), Some(&b"22"[..]));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let meta = Metadata::new();
        assert_eq!(meta.get("missing"), None);
    }

    #[test]
    fn keeps_first_set_order() {
        let mut meta = Metadata::new();
        meta.set("b", "x").unwrap();
        meta.set("a", "y").unwrap();
        meta.set("b", "z").unwrap();
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn nul_in_key_is_rejected() {
        let mut meta = Metadata::new();
        assert_eq!(meta.set("a\0b", "v"), Err(Error::InvalidMetadataKey));
        assert!(meta.is_empty());
    }

    #[test]
    fn serialized_length_pads_each_entry() {
        let mut meta = Metadata::new();
        // 7 + 1 + 2 = 10, padded to 12, plus the length word
        meta.set("KTXname", "ab").unwrap();
        assert_eq!(meta.serialized_length(), 16);
        meta.set("k", "12").unwrap();
        assert_eq!(meta.serialized_length(), 16 + 8);
    }
}
