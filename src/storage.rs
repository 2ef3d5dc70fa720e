use std::collections::HashMap;

use anyhow::{Result, ensure};

/// Durable string key-value storage backing the four collections.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Process-local store. Optionally enforces a byte quota over all values,
/// which is how a full browser storage area behaves.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Places raw text under `key` without counting it as a write.
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            ensure!(
                needed <= quota,
                "storage quota exceeded writing '{key}' ({needed} of {quota} bytes)"
            );
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let mut store = MemoryStore::with_quota(16);
        store.write("k", "small").unwrap();
        let err = store.write("k", "this value is far too long").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(store.raw("k"), Some("small"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn overwrite_does_not_double_count_quota() {
        let mut store = MemoryStore::with_quota(10);
        store.write("k", "12345678").unwrap();
        store.write("k", "87654321").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("87654321"));
    }
}
