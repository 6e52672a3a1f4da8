//! Raw slice files on the host filesystem.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;

use grit_core::ROW_NAMES;
use grit_engine::{SliceStore, StorageError};

/// Store of 16-bit little-endian mono `.raw` files under a root
/// directory, mirroring the instrument's on-flash layout
/// (`A/A1.raw` … `D/D8.raw`).
pub struct RawDirStore {
    root: PathBuf,
}

impl RawDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the four pad-row folders if missing.
    pub fn ensure_tree(&self) -> std::io::Result<()> {
        for row in ROW_NAMES {
            fs::create_dir_all(self.root.join(row))?;
        }
        Ok(())
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn map_open_err(err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Read
    }
}

impl SliceStore for RawDirStore {
    fn total_samples(&mut self, path: &str) -> Result<u32, StorageError> {
        let meta = fs::metadata(self.resolve(path)).map_err(map_open_err)?;
        Ok((meta.len() / 2) as u32)
    }

    fn read_chunk(&mut self, path: &str, offset: u32, out: &mut [i16]) -> Result<usize, StorageError> {
        let mut file = File::open(self.resolve(path)).map_err(map_open_err)?;
        file.seek(SeekFrom::Start(offset as u64 * 2))
            .map_err(|_| StorageError::Read)?;

        // A single read per call; a short count surfaces to the caller as
        // a short read and is resumed on a later tick.
        let mut bytes = vec![0u8; out.len() * 2];
        let n = file.read(&mut bytes).map_err(|_| StorageError::Read)?;
        let samples = n / 2;
        for (slot, pair) in out[..samples].iter_mut().zip(bytes.chunks_exact(2)) {
            *slot = i16::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(samples)
    }

    fn write_all(&mut self, path: &str, samples: &[i16]) -> Result<(), StorageError> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        fs::write(self.resolve(path), bytes).map_err(|_| StorageError::Write)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(_) => Err(StorageError::Write),
        }
    }
}
