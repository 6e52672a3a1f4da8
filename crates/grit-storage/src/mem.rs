//! In-memory slice store for tests and offline rendering.

use std::collections::BTreeMap;

use grit_engine::{SliceStore, StorageError};

/// Slice storage backed by a map, with the same short-read and
/// end-of-object behavior as the on-disk store.
#[derive(Default)]
pub struct MemStore {
    files: BTreeMap<String, Vec<i16>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, samples: Vec<i16>) {
        self.files.insert(path.to_owned(), samples);
    }

    pub fn get(&self, path: &str) -> Option<&[i16]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl SliceStore for MemStore {
    fn total_samples(&mut self, path: &str) -> Result<u32, StorageError> {
        self.files
            .get(path)
            .map(|d| d.len() as u32)
            .ok_or(StorageError::NotFound)
    }

    fn read_chunk(&mut self, path: &str, offset: u32, out: &mut [i16]) -> Result<usize, StorageError> {
        let data = self.files.get(path).ok_or(StorageError::NotFound)?;
        let start = offset as usize;
        if start >= data.len() {
            return Ok(0);
        }
        let n = out.len().min(data.len() - start);
        out[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn write_all(&mut self, path: &str, samples: &[i16]) -> Result<(), StorageError> {
        self.files.insert(path.to_owned(), samples.to_vec());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.files.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_store() {
        let mut store = MemStore::new();
        assert_eq!(store.total_samples("x"), Err(StorageError::NotFound));

        store.insert("x", vec![1, 2, 3, 4, 5]);
        assert_eq!(store.total_samples("x"), Ok(5));

        let mut out = [0i16; 3];
        assert_eq!(store.read_chunk("x", 3, &mut out), Ok(2));
        assert_eq!(&out[..2], &[4, 5]);

        store.remove("x").unwrap();
        assert_eq!(store.total_samples("x"), Err(StorageError::NotFound));
    }
}
