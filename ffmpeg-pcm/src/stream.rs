use ffmpeg_next::{Rational, codec::Parameters, format::stream};

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Other,
}

impl From<ffmpeg_next::media::Type> for MediaType {
    fn from(medium: ffmpeg_next::media::Type) -> Self {
        match medium {
            ffmpeg_next::media::Type::Audio => MediaType::Audio,
            ffmpeg_next::media::Type::Video => MediaType::Video,
            _ => MediaType::Other,
        }
    }
}

/// One elementary stream of a container, as the demuxer reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    index: usize,
    media_type: MediaType,
    codec: String,
}

impl StreamDescriptor {
    pub fn new(index: usize, media_type: MediaType, codec: &str) -> Self {
        Self {
            index,
            media_type,
            codec: codec.to_string(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }
}

/// Index of the first audio stream. Containers may carry several (alternate
/// languages, commentary); only the first is decoded.
pub fn select_audio_stream(streams: &[StreamDescriptor]) -> Result<usize, PipelineError> {
    streams
        .iter()
        .find(|s| s.media_type() == MediaType::Audio)
        .map(StreamDescriptor::index)
        .ok_or(PipelineError::NoAudioStream {
            streams: streams.len(),
        })
}

/// Owned copy of an FFmpeg stream's codec parameters and time base.
pub struct AvStream {
    index: usize,
    parameters: Parameters,
    time_base: Rational,
}

impl AvStream {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn is_audio(&self) -> bool {
        self.parameters.medium() == ffmpeg_next::media::Type::Audio
    }

    pub fn descriptor(&self) -> StreamDescriptor {
        StreamDescriptor::new(
            self.index,
            self.parameters.medium().into(),
            self.parameters.id().name(),
        )
    }
}

impl From<stream::Stream<'_>> for AvStream {
    fn from(stream: stream::Stream<'_>) -> Self {
        Self {
            index: stream.index(),
            parameters: stream.parameters(),
            time_base: stream.time_base(),
        }
    }
}

impl Clone for AvStream {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            parameters: self.parameters.clone(),
            time_base: self.time_base,
        }
    }
}
