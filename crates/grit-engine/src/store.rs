//! Storage seam the engine streams from.
//!
//! Storage is slow relative to the sample clock; every call here happens
//! on the service side, never in the mix path.

use core::fmt;

/// Error type for slice storage operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// No object bound to the given path.
    NotFound,
    /// The backing medium failed a read.
    Read,
    /// The backing medium failed a write.
    Write,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "slice not found"),
            StorageError::Read => write!(f, "storage read failed"),
            StorageError::Write => write!(f, "storage write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// Block storage holding raw 16-bit mono slices.
///
/// Calls are synchronous; a failure is an immediate result, never a
/// timeout. `read_chunk` may return fewer samples than requested (short
/// read) and never reads past the end of the object.
pub trait SliceStore {
    /// Total sample count of the object at `path`. `Ok(0)` means present
    /// but empty.
    fn total_samples(&mut self, path: &str) -> Result<u32, StorageError>;

    /// Read up to `out.len()` samples starting at `offset` samples into
    /// the object. Returns the count actually read.
    fn read_chunk(&mut self, path: &str, offset: u32, out: &mut [i16])
        -> Result<usize, StorageError>;

    /// Replace the object at `path` with `samples`.
    fn write_all(&mut self, path: &str, samples: &[i16]) -> Result<(), StorageError>;

    /// Remove the object at `path` if present.
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
}
