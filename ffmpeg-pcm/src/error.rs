use thiserror::Error;

use crate::format::FormatError;
use crate::sample::ExtractError;
use crate::session::{ReceiveError, SessionState};

/// Failure reading the next packet from a demuxer. End of stream is not an
/// error and is reported as `Ok(None)` by [`crate::traits::Demuxer::read_packet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("read error ({code}): {message}")]
pub struct DemuxError {
    pub code: i32,
    pub message: String,
}

impl DemuxError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ffmpeg_next::Error> for DemuxError {
    fn from(err: ffmpeg_next::Error) -> Self {
        Self::new(i32::from(err), err.to_string())
    }
}

/// Failure negotiating a decoder for the selected stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("stream {0} is not an audio stream")]
    NotAudio(usize),
    #[error("no decoder available for codec {0}")]
    NoSuchCodec(String),
    #[error("failed to open decoder ({code}): {message}")]
    Open { code: i32, message: String },
}

impl From<ffmpeg_next::Error> for OpenError {
    fn from(err: ffmpeg_next::Error) -> Self {
        Self::Open {
            code: i32::from(err),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("none of the {streams} streams is an audio stream")]
    NoAudioStream { streams: usize },
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error("decode error ({code})")]
    Decode { code: i32 },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Read(#[from] DemuxError),
    #[error("output sink: {0}")]
    Sink(#[from] std::io::Error),
    #[error("decoder session is {0:?}")]
    InvalidState(SessionState),
    #[error("decoder is busy but has no frame to hand out")]
    Stalled,
    #[error("extraction cancelled")]
    Cancelled,
}

impl From<ReceiveError> for PipelineError {
    fn from(err: ReceiveError) -> Self {
        match err {
            ReceiveError::Decode(code) => PipelineError::Decode { code },
            ReceiveError::Format(err) => PipelineError::Format(err),
        }
    }
}
