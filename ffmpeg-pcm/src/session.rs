use thiserror::Error;

use crate::format::FormatError;
use crate::frame::AudioFrame;
use crate::traits::{CodecError, Decoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting packets and handing out frames.
    Open,
    /// End of input signalled; buffered frames are being flushed.
    Draining,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Pending frames must be received before the same packet is sent again.
    #[error("decoder busy, pending frames must be received first")]
    Busy,
    #[error("decode error ({0})")]
    Decode(i32),
    #[error("cannot submit packets in {0:?} state")]
    InvalidState(SessionState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("decode error ({0})")]
    Decode(i32),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrainError {
    #[error("decoder busy, pending frames must be received before draining")]
    Busy,
    #[error("decode error ({0})")]
    Decode(i32),
}

/// A negotiated decoder for one stream, driven through submit/receive/drain.
pub struct DecoderSession<D> {
    decoder: D,
    stream_index: usize,
    state: SessionState,
}

impl<D: Decoder> DecoderSession<D> {
    pub fn new(decoder: D, stream_index: usize) -> Self {
        Self {
            decoder,
            stream_index,
            state: SessionState::Open,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    #[cfg(test)]
    pub(crate) fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn submit(&mut self, packet: &D::Packet) -> Result<(), SubmitError> {
        if self.state != SessionState::Open {
            return Err(SubmitError::InvalidState(self.state));
        }
        match self.decoder.send_packet(packet) {
            Ok(()) => Ok(()),
            Err(CodecError::Again) => Err(SubmitError::Busy),
            Err(err) => Err(SubmitError::Decode(err.code())),
        }
    }

    /// `Ok(None)` means more input is needed while open, or that draining is
    /// exhausted, after which the session is closed.
    pub fn receive(&mut self) -> Result<Option<AudioFrame>, ReceiveError> {
        if self.state == SessionState::Closed {
            return Ok(None);
        }
        match self.decoder.receive_frame() {
            Ok(frame) => Ok(Some(frame)),
            Err(CodecError::Again) | Err(CodecError::Eof) => {
                if self.state == SessionState::Draining {
                    log::debug!("stream {}: decoder drained", self.stream_index);
                    self.state = SessionState::Closed;
                }
                Ok(None)
            }
            Err(CodecError::Format(err)) => Err(ReceiveError::Format(err)),
            Err(CodecError::Failed(code)) => Err(ReceiveError::Decode(code)),
        }
    }

    /// Signals end of input. Callers then `receive` until `None`.
    pub fn drain(&mut self) -> Result<(), DrainError> {
        if self.state != SessionState::Open {
            return Ok(());
        }
        match self.decoder.send_eof() {
            Ok(()) | Err(CodecError::Eof) => {
                self.state = SessionState::Draining;
                Ok(())
            }
            Err(CodecError::Again) => Err(DrainError::Busy),
            Err(err) => Err(DrainError::Decode(err.code())),
        }
    }

    /// Releases the decoder.
    pub fn close(self) {
        log::debug!("stream {}: decoder session closed", self.stream_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDecoder, TestPacket, marker};

    fn receive_all(session: &mut DecoderSession<FakeDecoder>) -> Vec<f32> {
        let mut out = Vec::new();
        while let Some(frame) = session.receive().unwrap() {
            out.extend(crate::sample::extract(&frame).unwrap());
        }
        out
    }

    #[test]
    fn test_open_session_yields_frames_per_packet() {
        let mut session = DecoderSession::new(FakeDecoder::new(2), 1);
        session.submit(&TestPacket::new(1, 0)).unwrap();
        assert_eq!(receive_all(&mut session), vec![marker(0, 0), marker(0, 1)]);
        assert_eq!(session.receive().unwrap().map(|f| f.samples()), None);
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn test_busy_then_resubmit_keeps_every_frame_once() {
        let decoder = FakeDecoder::new(2).burst(1).capacity(1);
        let mut session = DecoderSession::new(decoder, 0);

        session.submit(&TestPacket::new(0, 0)).unwrap();
        let mut out = receive_all(&mut session);
        assert_eq!(out, vec![marker(0, 0)]);

        let packet = TestPacket::new(0, 1);
        assert_eq!(session.submit(&packet), Err(SubmitError::Busy));
        out.extend(receive_all(&mut session));
        session.submit(&packet).unwrap();
        out.extend(receive_all(&mut session));

        session.drain().unwrap();
        out.extend(receive_all(&mut session));

        assert_eq!(
            out,
            vec![marker(0, 0), marker(0, 1), marker(1, 0), marker(1, 1)]
        );
        assert_eq!(session.decoder().accepted(), &[0, 1]);
    }

    #[test]
    fn test_drain_flushes_held_frames_then_closes() {
        let mut session = DecoderSession::new(FakeDecoder::new(1).lookahead(2), 0);
        let mut out = Vec::new();
        for id in 0..3 {
            session.submit(&TestPacket::new(0, id)).unwrap();
            out.extend(receive_all(&mut session));
        }
        assert_eq!(out, vec![marker(0, 0)]);

        session.drain().unwrap();
        assert_eq!(session.state(), SessionState::Draining);
        out.extend(receive_all(&mut session));

        assert_eq!(out, vec![marker(0, 0), marker(1, 0), marker(2, 0)]);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.receive().unwrap().is_none());
    }

    #[test]
    fn test_submit_outside_open_is_rejected() {
        let mut session = DecoderSession::new(FakeDecoder::new(1), 0);
        session.drain().unwrap();
        assert_eq!(
            session.submit(&TestPacket::new(0, 0)),
            Err(SubmitError::InvalidState(SessionState::Draining))
        );
        // drain is idempotent
        session.drain().unwrap();
        assert!(session.receive().unwrap().is_none());
        assert_eq!(
            session.submit(&TestPacket::new(0, 1)),
            Err(SubmitError::InvalidState(SessionState::Closed))
        );
    }

    #[test]
    fn test_drain_busy_until_pending_frames_received() {
        let decoder = FakeDecoder::new(2).burst(1).eof_busy();
        let mut session = DecoderSession::new(decoder, 0);
        session.submit(&TestPacket::new(0, 0)).unwrap();
        assert_eq!(receive_all(&mut session), vec![marker(0, 0)]);

        assert_eq!(session.drain(), Err(DrainError::Busy));
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(receive_all(&mut session), vec![marker(0, 1)]);

        session.drain().unwrap();
        assert_eq!(session.state(), SessionState::Draining);
        assert!(receive_all(&mut session).is_empty());
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_decoder_failure_is_reported() {
        let mut session = DecoderSession::new(FakeDecoder::new(1).fail_on(3), 0);
        assert_eq!(
            session.submit(&TestPacket::new(0, 3)),
            Err(SubmitError::Decode(crate::testing::FAIL_CODE))
        );
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn test_unknown_frame_format_is_reported() {
        let mut session = DecoderSession::new(FakeDecoder::new(1).unknown_format(), 0);
        session.submit(&TestPacket::new(0, 0)).unwrap();
        assert_eq!(
            session.receive().unwrap_err(),
            ReceiveError::Format(FormatError::Unknown)
        );
    }
}
