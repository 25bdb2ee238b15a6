use std::path::Path;

use crate::{
    error::DemuxError,
    packet::RawPacket,
    stream::{AvStream, StreamDescriptor},
    traits::Demuxer,
};

/// An opened media file read linearly, packet by packet.
pub struct AvInput {
    inner: ffmpeg_next::format::context::Input,
    streams: Vec<AvStream>,
    descriptors: Vec<StreamDescriptor>,
}

impl AvInput {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let input = ffmpeg_next::format::input(path)
            .map_err(|e| anyhow::anyhow!("open input {}: {}", path.display(), e))?;

        let streams: Vec<AvStream> = input.streams().map(AvStream::from).collect();
        let descriptors = streams.iter().map(AvStream::descriptor).collect();

        Ok(Self {
            inner: input,
            streams,
            descriptors,
        })
    }

    pub fn stream(&self, index: usize) -> Option<&AvStream> {
        self.streams.iter().find(|s| s.index() == index)
    }

    pub fn format_name(&self) -> &str {
        self.inner.format().name()
    }

    /// Container duration in seconds; None if unknown.
    pub fn duration_sec(&self) -> Option<f64> {
        // AV_TIME_BASE = 1_000_000; duration is in 1/AV_TIME_BASE seconds
        let d = self.inner.duration();
        if d == ffmpeg_next::ffi::AV_NOPTS_VALUE as i64 || d <= 0 {
            None
        } else {
            Some(d as f64 / 1_000_000.0)
        }
    }
}

impl Demuxer for AvInput {
    type Packet = RawPacket;

    fn streams(&self) -> &[StreamDescriptor] {
        &self.descriptors
    }

    fn read_packet(&mut self) -> Result<Option<RawPacket>, DemuxError> {
        let mut packet = ffmpeg_next::Packet::empty();
        match packet.read(&mut self.inner) {
            Ok(()) => Ok(Some(packet.into())),
            Err(ffmpeg_next::Error::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
