//! Capabilities the pipeline consumes: a demuxer yielding packets, a decoder
//! driven through send/receive/EOF, and a sink for normalized samples.

use crate::error::DemuxError;
use crate::format::FormatError;
use crate::frame::AudioFrame;
use crate::stream::StreamDescriptor;

pub trait StreamPacket {
    fn stream_index(&self) -> usize;
}

pub trait Demuxer {
    type Packet: StreamPacket;

    fn streams(&self) -> &[StreamDescriptor];

    /// `Ok(None)` at end of stream.
    fn read_packet(&mut self) -> Result<Option<Self::Packet>, DemuxError>;
}

/// Raw outcome of a decoder call that did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// EAGAIN: output must be read before more input is accepted, or more
    /// input is needed before output is available.
    Again,
    /// The decoder has been fully flushed.
    Eof,
    Failed(i32),
    /// The decoder produced a frame whose sample format cannot be described.
    Format(FormatError),
}

impl CodecError {
    /// FFmpeg-style negative error code.
    pub fn code(&self) -> i32 {
        match *self {
            CodecError::Again => i32::from(ffmpeg_next::Error::Other {
                errno: ffmpeg_next::util::error::EAGAIN,
            }),
            CodecError::Eof => i32::from(ffmpeg_next::Error::Eof),
            CodecError::Failed(code) => code,
            CodecError::Format(_) => i32::from(ffmpeg_next::Error::InvalidData),
        }
    }
}

impl From<ffmpeg_next::Error> for CodecError {
    fn from(err: ffmpeg_next::Error) -> Self {
        match err {
            ffmpeg_next::Error::Eof => CodecError::Eof,
            ffmpeg_next::Error::Other { errno } if errno == ffmpeg_next::util::error::EAGAIN => {
                CodecError::Again
            }
            other => CodecError::Failed(i32::from(other)),
        }
    }
}

impl From<FormatError> for CodecError {
    fn from(err: FormatError) -> Self {
        CodecError::Format(err)
    }
}

pub trait Decoder {
    type Packet;

    fn send_packet(&mut self, packet: &Self::Packet) -> Result<(), CodecError>;

    /// Signals end of input; buffered frames are then handed out until
    /// `receive_frame` reports [`CodecError::Eof`].
    fn send_eof(&mut self) -> Result<(), CodecError>;

    fn receive_frame(&mut self) -> Result<AudioFrame, CodecError>;
}

/// Receives one call per decoded frame with its interleaved samples.
pub trait OutputSink {
    fn write(&mut self, samples: &[f32]) -> std::io::Result<()>;
}

impl OutputSink for Vec<f32> {
    fn write(&mut self, samples: &[f32]) -> std::io::Result<()> {
        self.extend_from_slice(samples);
        Ok(())
    }
}
