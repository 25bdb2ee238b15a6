use crate::traits::StreamPacket;

/// An encoded packet read from an [`crate::input::AvInput`].
pub struct RawPacket {
    packet: ffmpeg_next::codec::packet::Packet,
}

impl RawPacket {
    pub fn packet(&self) -> &ffmpeg_next::codec::packet::Packet {
        &self.packet
    }
}

impl StreamPacket for RawPacket {
    fn stream_index(&self) -> usize {
        self.packet.stream()
    }
}

impl From<ffmpeg_next::codec::packet::Packet> for RawPacket {
    fn from(packet: ffmpeg_next::codec::packet::Packet) -> Self {
        Self { packet }
    }
}
