//! Sample format descriptors for decoded audio frames.

use std::fmt;

use ffmpeg_next::format::{Sample, sample::Type};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("channel count must be at least 1")]
    NoChannels,
    #[error("unsupported sample bit width {0}")]
    BitWidth(u32),
    #[error("decoder reported no sample format")]
    Unknown,
}

/// How one sample's bits are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Integer { signed: bool },
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitWidth {
    B8,
    B16,
    B32,
    B64,
}

impl BitWidth {
    pub fn from_bits(bits: u32) -> Result<Self, FormatError> {
        match bits {
            8 => Ok(BitWidth::B8),
            16 => Ok(BitWidth::B16),
            32 => Ok(BitWidth::B32),
            64 => Ok(BitWidth::B64),
            other => Err(FormatError::BitWidth(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            BitWidth::B8 => 8,
            BitWidth::B16 => 16,
            BitWidth::B32 => 32,
            BitWidth::B64 => 64,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

/// Planar frames carry one buffer per channel, packed frames a single
/// channel-interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Planarity {
    Packed,
    Planar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    class: StorageClass,
    width: BitWidth,
    planarity: Planarity,
    channels: u16,
}

impl SampleFormat {
    pub fn new(
        class: StorageClass,
        width: BitWidth,
        planarity: Planarity,
        channels: u16,
    ) -> Result<Self, FormatError> {
        if channels == 0 {
            return Err(FormatError::NoChannels);
        }
        Ok(Self {
            class,
            width,
            planarity,
            channels,
        })
    }

    /// Maps an FFmpeg sample format. Unsigned storage only exists for 8 bits
    /// in FFmpeg, every wider integer format is signed.
    pub fn from_ffmpeg(sample: Sample, channels: u16) -> Result<Self, FormatError> {
        let (class, width, kind) = match sample {
            Sample::None => return Err(FormatError::Unknown),
            Sample::U8(kind) => (StorageClass::Integer { signed: false }, BitWidth::B8, kind),
            Sample::I16(kind) => (StorageClass::Integer { signed: true }, BitWidth::B16, kind),
            Sample::I32(kind) => (StorageClass::Integer { signed: true }, BitWidth::B32, kind),
            Sample::I64(kind) => (StorageClass::Integer { signed: true }, BitWidth::B64, kind),
            Sample::F32(kind) => (StorageClass::Float, BitWidth::B32, kind),
            Sample::F64(kind) => (StorageClass::Float, BitWidth::B64, kind),
        };
        let planarity = match kind {
            Type::Packed => Planarity::Packed,
            Type::Planar => Planarity::Planar,
        };
        Self::new(class, width, planarity, channels)
    }

    pub fn class(&self) -> StorageClass {
        self.class
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn planarity(&self) -> Planarity {
        self.planarity
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_planar(&self) -> bool {
        self.planarity == Planarity::Planar
    }

    /// Number of byte buffers a frame in this format carries.
    pub fn planes(&self) -> usize {
        match self.planarity {
            Planarity::Packed => 1,
            Planarity::Planar => self.channels as usize,
        }
    }

    /// Bytes one plane needs to hold `samples` samples.
    pub fn plane_len(&self, samples: usize) -> usize {
        let per_sample = match self.planarity {
            Planarity::Packed => self.channels as usize,
            Planarity::Planar => 1,
        };
        samples * per_sample * self.width.bytes()
    }
}

// Names follow FFmpeg's sample format names (s16, fltp, ...) where one exists.
impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.class, self.width) {
            (StorageClass::Float, BitWidth::B32) => write!(f, "flt")?,
            (StorageClass::Float, BitWidth::B64) => write!(f, "dbl")?,
            (StorageClass::Float, width) => write!(f, "f{}", width.bits())?,
            (StorageClass::Integer { signed: true }, width) => write!(f, "s{}", width.bits())?,
            (StorageClass::Integer { signed: false }, width) => write!(f, "u{}", width.bits())?,
        }
        if self.is_planar() {
            write!(f, "p")?;
        }
        write!(f, " x{}", self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_channels_rejected() {
        let err = SampleFormat::new(
            StorageClass::Float,
            BitWidth::B32,
            Planarity::Packed,
            0,
        )
        .unwrap_err();
        assert_eq!(err, FormatError::NoChannels);
    }

    #[test]
    fn test_bit_width_from_bits() {
        assert_eq!(BitWidth::from_bits(16), Ok(BitWidth::B16));
        assert_eq!(BitWidth::from_bits(24), Err(FormatError::BitWidth(24)));
        assert_eq!(BitWidth::B64.bytes(), 8);
    }

    #[test]
    fn test_from_ffmpeg_mapping() -> anyhow::Result<()> {
        let u8p = SampleFormat::from_ffmpeg(Sample::U8(Type::Planar), 2)?;
        assert_eq!(u8p.class(), StorageClass::Integer { signed: false });
        assert_eq!(u8p.width(), BitWidth::B8);
        assert_eq!(u8p.planes(), 2);

        let s16 = SampleFormat::from_ffmpeg(Sample::I16(Type::Packed), 2)?;
        assert_eq!(s16.class(), StorageClass::Integer { signed: true });
        assert_eq!(s16.planes(), 1);
        assert_eq!(s16.plane_len(10), 40);

        let dblp = SampleFormat::from_ffmpeg(Sample::F64(Type::Planar), 6)?;
        assert_eq!(dblp.class(), StorageClass::Float);
        assert_eq!(dblp.plane_len(10), 80);

        assert_eq!(
            SampleFormat::from_ffmpeg(Sample::None, 2),
            Err(FormatError::Unknown)
        );
        Ok(())
    }

    #[test]
    fn test_display_uses_ffmpeg_names() -> anyhow::Result<()> {
        let fltp = SampleFormat::from_ffmpeg(Sample::F32(Type::Planar), 2)?;
        assert_eq!(fltp.to_string(), "fltp x2");
        let s16 = SampleFormat::from_ffmpeg(Sample::I16(Type::Packed), 1)?;
        assert_eq!(s16.to_string(), "s16 x1");
        Ok(())
    }
}
