//! Conversion of decoded sample planes into interleaved, normalized `f32`.
//!
//! Output order is always sample-major then channel, whatever the planarity of
//! the frame: `[s0c0, s0c1, s1c0, s1c1, ...]`.
//!
//! Integer samples are scaled by `(1 << (bits - 1)) - 1`. Float samples are
//! taken as already normalized; doubles are narrowed to `f32`.

use thiserror::Error;

use crate::format::{BitWidth, Planarity, SampleFormat, StorageClass};
use crate::frame::AudioFrame;

/// Offset that re-centers unsigned 8-bit samples. 127 rather than 128, so 127
/// maps to 0.0 and 255 to 128/127; kept for output compatibility with
/// existing `.raw` files. Do not carry this over to other widths.
const U8_BIAS: i32 = 127;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unsupported sample format {0}")]
    UnsupportedFormat(SampleFormat),
    #[error("expected {expected} sample planes, frame has {actual}")]
    PlaneCount { expected: usize, actual: usize },
    #[error("plane {plane} holds {actual} bytes, {needed} needed")]
    ShortPlane {
        plane: usize,
        needed: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy)]
enum Conversion {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Conversion {
    fn for_format(format: &SampleFormat) -> Result<Self, ExtractError> {
        match (format.class(), format.width()) {
            (StorageClass::Integer { signed: false }, BitWidth::B8) => Ok(Conversion::U8),
            (StorageClass::Integer { signed: true }, BitWidth::B16) => Ok(Conversion::I16),
            (StorageClass::Integer { signed: true }, BitWidth::B32) => Ok(Conversion::I32),
            (StorageClass::Integer { signed: true }, BitWidth::B64) => Ok(Conversion::I64),
            (StorageClass::Float, BitWidth::B32) => Ok(Conversion::F32),
            (StorageClass::Float, BitWidth::B64) => Ok(Conversion::F64),
            _ => Err(ExtractError::UnsupportedFormat(*format)),
        }
    }

    /// `raw` is exactly one sample wide.
    fn convert(self, raw: &[u8]) -> f32 {
        match self {
            Conversion::U8 => (raw[0] as i32 - U8_BIAS) as f32 / int_scale(8),
            Conversion::I16 => i16::from_ne_bytes(sample_bytes(raw)) as f32 / int_scale(16),
            Conversion::I32 => i32::from_ne_bytes(sample_bytes(raw)) as f32 / int_scale(32),
            Conversion::I64 => i64::from_ne_bytes(sample_bytes(raw)) as f32 / int_scale(64),
            Conversion::F32 => f32::from_ne_bytes(sample_bytes(raw)),
            Conversion::F64 => f64::from_ne_bytes(sample_bytes(raw)) as f32,
        }
    }
}

fn int_scale(bits: u32) -> f32 {
    ((1u64 << (bits - 1)) - 1) as f32
}

fn sample_bytes<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(raw);
    buf
}

/// Extracts all samples of `frame` as normalized interleaved floats.
pub fn extract(frame: &AudioFrame) -> Result<Vec<f32>, ExtractError> {
    let mut out = Vec::with_capacity(frame.value_count());
    extract_into(frame, &mut out)?;
    Ok(out)
}

/// Appends the samples of `frame` to `out`. Nothing is appended on error.
pub fn extract_into(frame: &AudioFrame, out: &mut Vec<f32>) -> Result<(), ExtractError> {
    let format = frame.format();
    let conversion = Conversion::for_format(format)?;
    let width = format.width().bytes();
    let samples = frame.samples();
    let planes = frame.planes();

    let expected = format.planes();
    if planes.len() != expected {
        return Err(ExtractError::PlaneCount {
            expected,
            actual: planes.len(),
        });
    }
    let needed = format.plane_len(samples);
    if let Some((plane, data)) = planes.iter().enumerate().find(|(_, p)| p.len() < needed) {
        return Err(ExtractError::ShortPlane {
            plane,
            needed,
            actual: data.len(),
        });
    }

    out.reserve(frame.value_count());
    match format.planarity() {
        Planarity::Packed => {
            out.extend(
                planes[0][..needed]
                    .chunks_exact(width)
                    .map(|raw| conversion.convert(raw)),
            );
        }
        Planarity::Planar => {
            let mut lanes: Vec<_> = planes
                .iter()
                .map(|p| p[..needed].chunks_exact(width))
                .collect();
            for _ in 0..samples {
                for lane in lanes.iter_mut() {
                    if let Some(raw) = lane.next() {
                        out.push(conversion.convert(raw));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;
