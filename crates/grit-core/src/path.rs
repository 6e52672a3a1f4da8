//! Fixed-capacity slice path type.

use arrayvec::ArrayString;

use crate::config::MAX_PATH_LEN;

/// Identifier of a stored slice, e.g. `"A/A1.raw"`.
///
/// Fixed capacity so jobs and voice state stay plain `Copy` values with no
/// heap ownership. Construction truncating or rejecting over-long paths is
/// the caller's concern; the engine rejects paths that do not fit.
pub type SlicePath = ArrayString<MAX_PATH_LEN>;
