//! WAV import: turn a mono capture into stored pad-row slices.
//!
//! The instrument records and plays raw 16-bit mono at the fixed engine
//! rate, so import rejects anything else rather than resampling.

use std::fmt;

use grit_core::{MAX_RECORD_SAMPLES, SAMPLE_RATE_HZ, SLICES_PER_ROW};
use grit_engine::{SliceStore, StorageError};

/// Error type for WAV import.
#[derive(Debug, PartialEq, Eq)]
pub enum ImportError {
    /// Invalid RIFF/WAVE header or chunk layout
    InvalidHeader,
    /// File ends before the declared data
    UnexpectedEof,
    /// Not 16-bit mono PCM at the engine sample rate
    UnsupportedShape,
    /// Too few samples to cut into slices
    TooShort,
    /// Writing the slices to storage failed
    Storage(StorageError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidHeader => write!(f, "not a WAV file"),
            ImportError::UnexpectedEof => write!(f, "WAV file is truncated"),
            ImportError::UnsupportedShape => {
                write!(f, "WAV must be 16-bit mono PCM at {} Hz", SAMPLE_RATE_HZ)
            }
            ImportError::TooShort => write!(f, "capture too short to slice"),
            ImportError::Storage(err) => write!(f, "storage error: {}", err),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<StorageError> for ImportError {
    fn from(err: StorageError) -> Self {
        ImportError::Storage(err)
    }
}

/// Parse a 16-bit mono PCM WAV at the engine rate into samples.
pub fn load_wav_mono(data: &[u8]) -> Result<Vec<i16>, ImportError> {
    if data.len() < 12 {
        return Err(ImportError::UnexpectedEof);
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(ImportError::InvalidHeader);
    }

    let mut pos = 12;
    let mut format: Option<(u16, u16, u32, u16)> = None;
    while pos + 8 <= data.len() {
        let id = &data[pos..pos + 4];
        let size = u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body = pos + 8;
        if body + size > data.len() {
            return Err(ImportError::UnexpectedEof);
        }
        match id {
            b"fmt " => {
                if size < 16 {
                    return Err(ImportError::InvalidHeader);
                }
                let audio_format = u16::from_le_bytes(data[body..body + 2].try_into().unwrap());
                let channels = u16::from_le_bytes(data[body + 2..body + 4].try_into().unwrap());
                let rate = u32::from_le_bytes(data[body + 4..body + 8].try_into().unwrap());
                let bits = u16::from_le_bytes(data[body + 14..body + 16].try_into().unwrap());
                format = Some((audio_format, channels, rate, bits));
            }
            b"data" => {
                let (audio_format, channels, rate, bits) =
                    format.ok_or(ImportError::InvalidHeader)?;
                if audio_format != 1 || channels != 1 || bits != 16 || rate != SAMPLE_RATE_HZ {
                    return Err(ImportError::UnsupportedShape);
                }
                let samples = data[body..body + size]
                    .chunks_exact(2)
                    .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                return Ok(samples);
            }
            _ => {}
        }
        // Chunks are word-aligned
        pos = body + size + (size & 1);
    }
    Err(ImportError::UnexpectedEof)
}

/// Store a capture as `<row>/source.raw` plus eight equal slices
/// `<row>/<row>1.raw` … `<row>/<row>8.raw`.
///
/// Captures longer than the record ceiling are truncated to it, matching
/// what the recorder front-end would have kept.
pub fn slice_into_row(
    store: &mut impl SliceStore,
    row: &str,
    samples: &[i16],
) -> Result<(), ImportError> {
    let samples = &samples[..samples.len().min(MAX_RECORD_SAMPLES as usize)];
    let seg = samples.len() / SLICES_PER_ROW as usize;
    if seg == 0 {
        return Err(ImportError::TooShort);
    }

    store.write_all(&format!("{row}/source.raw"), samples)?;
    for i in 0..SLICES_PER_ROW as usize {
        let slice = &samples[i * seg..(i + 1) * seg];
        store.write_all(&format!("{row}/{row}{}.raw", i + 1), slice)?;
    }
    log::info!("imported {} samples into row {} ({} per slice)", samples.len(), row, seg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemStore;

    fn wav_bytes(rate: u32, channels: u16, bits: u16, samples: &[i16]) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let data_size = samples.len() as u32 * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_size).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_size.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn parses_canonical_mono_wav() {
        let samples: Vec<i16> = (0..64).map(|i| i * 100).collect();
        let bytes = wav_bytes(SAMPLE_RATE_HZ, 1, 16, &samples);
        assert_eq!(load_wav_mono(&bytes).unwrap(), samples);
    }

    #[test]
    fn rejects_wrong_shape() {
        let samples = vec![0i16; 64];
        assert_eq!(
            load_wav_mono(&wav_bytes(44_100, 1, 16, &samples)),
            Err(ImportError::UnsupportedShape)
        );
        assert_eq!(
            load_wav_mono(&wav_bytes(SAMPLE_RATE_HZ, 2, 16, &samples)),
            Err(ImportError::UnsupportedShape)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(load_wav_mono(b"RIFX"), Err(ImportError::UnexpectedEof));
        assert_eq!(
            load_wav_mono(b"OGGSxxxxxxxxxxxxxxxxxxxx"),
            Err(ImportError::InvalidHeader)
        );
        // Declared data runs past the end of the buffer
        let mut bytes = wav_bytes(SAMPLE_RATE_HZ, 1, 16, &[0i16; 8]);
        bytes.truncate(bytes.len() - 4);
        assert_eq!(load_wav_mono(&bytes), Err(ImportError::UnexpectedEof));
    }

    #[test]
    fn slices_into_eight_equal_parts() {
        let samples: Vec<i16> = (0..800).map(|i| i as i16).collect();
        let mut store = MemStore::new();
        slice_into_row(&mut store, "A", &samples).unwrap();

        assert_eq!(store.get("A/source.raw").unwrap().len(), 800);
        for i in 1..=8 {
            let slice = store.get(&format!("A/A{i}.raw")).unwrap();
            assert_eq!(slice.len(), 100);
            assert_eq!(slice[0], ((i - 1) * 100) as i16);
        }
    }

    #[test]
    fn too_short_capture_is_rejected() {
        let mut store = MemStore::new();
        assert_eq!(slice_into_row(&mut store, "B", &[1, 2, 3]), Err(ImportError::TooShort));
        assert!(store.get("B/source.raw").is_none());
    }
}
