//! Scripted in-memory demuxer and decoder used by the session and pipeline tests.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::error::DemuxError;
use crate::format::{BitWidth, FormatError, Planarity, SampleFormat, StorageClass};
use crate::frame::AudioFrame;
use crate::stream::{MediaType, StreamDescriptor};
use crate::traits::{CodecError, Decoder, Demuxer, StreamPacket};

pub const FAIL_CODE: i32 = -1094995529;

#[derive(Debug, Clone)]
pub struct TestPacket {
    stream: usize,
    id: u32,
}

impl TestPacket {
    pub fn new(stream: usize, id: u32) -> Self {
        Self { stream, id }
    }
}

impl StreamPacket for TestPacket {
    fn stream_index(&self) -> usize {
        self.stream
    }
}

/// Sample value carried by frame `k` of packet `id`; exact in `f32`.
pub fn marker(id: u32, k: usize) -> f32 {
    (id * 16 + k as u32) as f32
}

pub fn marker_frame(id: u32, k: usize) -> AudioFrame {
    let format = SampleFormat::new(StorageClass::Float, BitWidth::B32, Planarity::Packed, 1)
        .expect("mono format");
    AudioFrame::new(
        format,
        1,
        vec![Bytes::copy_from_slice(&marker(id, k).to_ne_bytes())],
    )
}

pub struct ScriptedDemuxer {
    streams: Vec<StreamDescriptor>,
    packets: VecDeque<Result<TestPacket, DemuxError>>,
}

impl ScriptedDemuxer {
    /// Stream 0 is video, stream 1 audio.
    pub fn new(packets: Vec<Result<TestPacket, DemuxError>>) -> Self {
        Self {
            streams: vec![
                StreamDescriptor::new(0, MediaType::Video, "h264"),
                StreamDescriptor::new(1, MediaType::Audio, "aac"),
            ],
            packets: packets.into(),
        }
    }

    /// Audio packets `0..count` on stream 1.
    pub fn audio(count: u32) -> Self {
        Self::new((0..count).map(|id| Ok(TestPacket::new(1, id))).collect())
    }
}

impl Demuxer for ScriptedDemuxer {
    type Packet = TestPacket;

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn read_packet(&mut self) -> Result<Option<TestPacket>, DemuxError> {
        self.packets.pop_front().transpose()
    }
}

/// Emits `frames_per_packet` marker frames per accepted packet.
///
/// * `lookahead`: frames held back until later input or drain.
/// * `burst`: frames handed out between two send calls before reporting EAGAIN.
/// * `capacity`: send reports EAGAIN while this many frames are deliverable.
/// * `eof_busy`: the end-of-stream signal reports EAGAIN while frames are deliverable.
pub struct FakeDecoder {
    frames_per_packet: usize,
    lookahead: usize,
    burst: usize,
    capacity: usize,
    fail_on: Option<u32>,
    unknown_format: bool,
    eof_busy: bool,
    pending: VecDeque<AudioFrame>,
    delivered: usize,
    draining: bool,
    accepted: Vec<u32>,
}

impl FakeDecoder {
    pub fn new(frames_per_packet: usize) -> Self {
        Self {
            frames_per_packet,
            lookahead: 0,
            burst: usize::MAX,
            capacity: usize::MAX,
            fail_on: None,
            unknown_format: false,
            eof_busy: false,
            pending: VecDeque::new(),
            delivered: 0,
            draining: false,
            accepted: Vec::new(),
        }
    }

    pub fn lookahead(mut self, frames: usize) -> Self {
        self.lookahead = frames;
        self
    }

    pub fn burst(mut self, frames: usize) -> Self {
        self.burst = frames;
        self
    }

    pub fn capacity(mut self, frames: usize) -> Self {
        self.capacity = frames;
        self
    }

    pub fn fail_on(mut self, id: u32) -> Self {
        self.fail_on = Some(id);
        self
    }

    pub fn unknown_format(mut self) -> Self {
        self.unknown_format = true;
        self
    }

    pub fn eof_busy(mut self) -> Self {
        self.eof_busy = true;
        self
    }

    pub fn accepted(&self) -> &[u32] {
        &self.accepted
    }

    fn deliverable(&self) -> usize {
        if self.draining {
            self.pending.len()
        } else {
            self.pending.len().saturating_sub(self.lookahead)
        }
    }
}

impl Decoder for FakeDecoder {
    type Packet = TestPacket;

    fn send_packet(&mut self, packet: &TestPacket) -> Result<(), CodecError> {
        self.delivered = 0;
        if self.draining {
            return Err(CodecError::Eof);
        }
        if self.fail_on == Some(packet.id) {
            return Err(CodecError::Failed(FAIL_CODE));
        }
        if self.deliverable() >= self.capacity {
            return Err(CodecError::Again);
        }
        self.accepted.push(packet.id);
        for k in 0..self.frames_per_packet {
            self.pending.push_back(marker_frame(packet.id, k));
        }
        Ok(())
    }

    fn send_eof(&mut self) -> Result<(), CodecError> {
        self.delivered = 0;
        if self.eof_busy && !self.draining && self.deliverable() > 0 {
            return Err(CodecError::Again);
        }
        self.draining = true;
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<AudioFrame, CodecError> {
        if self.deliverable() == 0 {
            return Err(if self.draining {
                CodecError::Eof
            } else {
                CodecError::Again
            });
        }
        if !self.draining && self.delivered >= self.burst {
            return Err(CodecError::Again);
        }
        if self.unknown_format {
            return Err(CodecError::Format(FormatError::Unknown));
        }
        self.delivered += 1;
        self.pending.pop_front().ok_or(CodecError::Again)
    }
}
