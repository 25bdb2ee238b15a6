use crate::{
    config::DecodeOptions,
    error::OpenError,
    frame::AudioFrame,
    packet::RawPacket,
    stream::AvStream,
    traits::{CodecError, Decoder},
};

/// FFmpeg audio decoder for one stream.
pub struct AvDecoder {
    inner: ffmpeg_next::codec::decoder::Audio,
}

impl AvDecoder {
    pub fn open(stream: &AvStream, options: &DecodeOptions) -> Result<Self, OpenError> {
        if !stream.is_audio() {
            return Err(OpenError::NotAudio(stream.index()));
        }
        let codec_id = stream.parameters().id();
        let codec = ffmpeg_next::decoder::find(codec_id)
            .ok_or_else(|| OpenError::NoSuchCodec(codec_id.name().to_string()))?;

        let mut decoder_ctx =
            ffmpeg_next::codec::Context::from_parameters(stream.parameters().clone())?;
        unsafe {
            let ctx = decoder_ctx.as_mut_ptr();
            (*ctx).pkt_timebase = stream.time_base().into();
            if options.prefer_packed {
                (*ctx).request_sample_fmt =
                    ffmpeg_next::ffi::av_get_alt_sample_fmt((*ctx).sample_fmt, 0);
            }
        }

        let inner = decoder_ctx.decoder().open_as(codec)?.audio()?;
        log::debug!(
            "stream {}: opened {} decoder, format {:?}",
            stream.index(),
            codec_id.name(),
            inner.format()
        );
        Ok(Self { inner })
    }

    pub fn codec_name(&self) -> String {
        self.inner
            .codec()
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    pub fn codec_description(&self) -> String {
        self.inner
            .codec()
            .map(|c| c.description().to_string())
            .unwrap_or_default()
    }

    pub fn format(&self) -> ffmpeg_next::format::Sample {
        self.inner.format()
    }

    pub fn rate(&self) -> u32 {
        self.inner.rate()
    }

    pub fn channels(&self) -> u16 {
        self.inner.channels()
    }
}

impl Decoder for AvDecoder {
    type Packet = RawPacket;

    fn send_packet(&mut self, packet: &RawPacket) -> Result<(), CodecError> {
        self.inner.send_packet(packet.packet())?;
        Ok(())
    }

    fn send_eof(&mut self) -> Result<(), CodecError> {
        self.inner.send_eof()?;
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<AudioFrame, CodecError> {
        let mut frame = ffmpeg_next::frame::Audio::empty();
        self.inner.receive_frame(&mut frame)?;
        Ok(AudioFrame::try_from(&frame)?)
    }
}
