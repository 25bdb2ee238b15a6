//! Drives a decoder session over the packets of a demuxer and writes every
//! decoded frame, normalized and interleaved, to an output sink.
//!
//! ```text
//! Demuxer ──► packet ──► stream == selected? ──► submit ──► receive* ──► extract ──► sink
//!                              │ no                 │ busy
//!                              ▼                    └──► receive* then submit again
//!                            skip
//! end of stream / error ──► drain ──► receive* ──► close
//! ```
//!
//! The drain-and-flush step also runs when the read loop fails, so frames the
//! decoder already holds still reach the sink before the error is returned.

use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::sample;
use crate::session::{DecoderSession, DrainError, SubmitError};
use crate::traits::{Decoder, Demuxer, OutputSink, StreamPacket};

/// Counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub packets_read: u64,
    /// Packets belonging to other streams.
    pub packets_skipped: u64,
    pub packets_submitted: u64,
    pub busy_retries: u64,
    pub frames: u64,
    pub samples: u64,
}

pub struct Pipeline {
    cancel: CancellationToken,
    stats: PipelineStats,
    scratch: Vec<f32>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_cancel(CancellationToken::new())
    }

    /// The token is checked between packets.
    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            stats: PipelineStats::default(),
            scratch: Vec::new(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn run<M, D, S>(
        &mut self,
        demuxer: &mut M,
        mut session: DecoderSession<D>,
        sink: &mut S,
    ) -> Result<(), PipelineError>
    where
        M: Demuxer,
        D: Decoder<Packet = M::Packet>,
        S: OutputSink + ?Sized,
    {
        let read = self.read_loop(demuxer, &mut session, sink);
        if let Err(e) = &read {
            log::warn!("stream {}: {}, flushing decoder", session.stream_index(), e);
        }
        let flush = self.flush(&mut session, sink);
        session.close();

        match (read, flush) {
            (Err(e), Err(flush_err)) => {
                log::warn!("flush after error failed: {}", flush_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), flush) => flush,
        }
    }

    fn read_loop<M, D, S>(
        &mut self,
        demuxer: &mut M,
        session: &mut DecoderSession<D>,
        sink: &mut S,
    ) -> Result<(), PipelineError>
    where
        M: Demuxer,
        D: Decoder<Packet = M::Packet>,
        S: OutputSink + ?Sized,
    {
        let stream_index = session.stream_index();
        loop {
            if self.cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let Some(packet) = demuxer.read_packet()? else {
                log::debug!("end of input stream");
                return Ok(());
            };
            self.stats.packets_read += 1;
            if packet.stream_index() != stream_index {
                self.stats.packets_skipped += 1;
                continue;
            }

            loop {
                match session.submit(&packet) {
                    Ok(()) => break,
                    Err(SubmitError::Busy) => {
                        self.stats.busy_retries += 1;
                        if self.receive_all(session, sink)? == 0 {
                            return Err(PipelineError::Stalled);
                        }
                    }
                    Err(SubmitError::Decode(code)) => return Err(PipelineError::Decode { code }),
                    Err(SubmitError::InvalidState(state)) => {
                        return Err(PipelineError::InvalidState(state));
                    }
                }
            }
            self.stats.packets_submitted += 1;
            self.receive_all(session, sink)?;
        }
    }

    fn flush<D, S>(
        &mut self,
        session: &mut DecoderSession<D>,
        sink: &mut S,
    ) -> Result<(), PipelineError>
    where
        D: Decoder,
        S: OutputSink + ?Sized,
    {
        loop {
            match session.drain() {
                Ok(()) => break,
                Err(DrainError::Busy) => {
                    if self.receive_all(session, sink)? == 0 {
                        return Err(PipelineError::Stalled);
                    }
                }
                Err(DrainError::Decode(code)) => return Err(PipelineError::Decode { code }),
            }
        }
        self.receive_all(session, sink)?;
        Ok(())
    }

    /// Receives until the session has nothing more to give; returns the
    /// number of frames written.
    fn receive_all<D, S>(
        &mut self,
        session: &mut DecoderSession<D>,
        sink: &mut S,
    ) -> Result<usize, PipelineError>
    where
        D: Decoder,
        S: OutputSink + ?Sized,
    {
        let mut frames = 0;
        while let Some(frame) = session.receive()? {
            self.scratch.clear();
            sample::extract_into(&frame, &mut self.scratch)?;
            sink.write(&self.scratch)?;
            frames += 1;
            self.stats.frames += 1;
            self.stats.samples += self.scratch.len() as u64;
            log::trace!(
                "frame: samples={}, rate={}, pts={:?}",
                frame.samples(),
                frame.rate(),
                frame.pts()
            );
        }
        Ok(frames)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
