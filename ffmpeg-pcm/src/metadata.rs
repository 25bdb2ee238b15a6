//! Decoder diagnostics printed before extraction starts (similar to ffprobe).

use std::fmt;

use crate::decoder::AvDecoder;
use crate::input::AvInput;

#[derive(Debug, Clone, PartialEq)]
pub struct DecoderInfo {
    pub stream_index: usize,
    /// Container format name, e.g. "mov,mp4,m4a,3gp,3g2,mj2"
    pub format_name: String,
    /// Duration in seconds; None if unknown.
    pub duration_sec: Option<f64>,
    /// Codec name, e.g. "aac"
    pub codec_name: String,
    pub codec_description: String,
    /// FFmpeg sample format name, e.g. "fltp"
    pub sample_format: String,
    pub sample_rate: u32,
    pub bytes_per_sample: usize,
    pub channels: u16,
    pub planar: bool,
}

impl DecoderInfo {
    pub fn new(input: &AvInput, stream_index: usize, decoder: &AvDecoder) -> Self {
        let format = decoder.format();
        Self {
            stream_index,
            format_name: input.format_name().to_string(),
            duration_sec: input.duration_sec(),
            codec_name: decoder.codec_name(),
            codec_description: decoder.codec_description(),
            sample_format: format.name().to_string(),
            sample_rate: decoder.rate(),
            bytes_per_sample: format.bytes(),
            channels: decoder.channels(),
            planar: format.is_planar(),
        }
    }
}

/// Formats seconds as `h:mm:ss`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}

impl fmt::Display for DecoderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[DECODER]")?;
        writeln!(f, "stream={}", self.stream_index)?;
        writeln!(f, "format_name={}", self.format_name)?;
        match self.duration_sec {
            Some(d) => writeln!(f, "duration={}", format_duration(d))?,
            None => writeln!(f, "duration=N/A")?,
        }
        writeln!(f, "codec={} ({})", self.codec_name, self.codec_description)?;
        writeln!(f, "sample_format={}", self.sample_format)?;
        writeln!(f, "sample_rate={}", self.sample_rate)?;
        writeln!(f, "sample_size={}", self.bytes_per_sample)?;
        writeln!(f, "channels={}", self.channels)?;
        writeln!(f, "planar={}", self.planar)?;
        write!(f, "[/DECODER]")
    }
}
