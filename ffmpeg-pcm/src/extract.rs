use tokio_util::sync::CancellationToken;

use crate::{
    config::ExtractConfig,
    decoder::AvDecoder,
    error::PipelineError,
    input::AvInput,
    metadata::DecoderInfo,
    pipeline::{Pipeline, PipelineStats},
    session::DecoderSession,
    sink::RawFileSink,
    stream::select_audio_stream,
    traits::Demuxer,
};

/// Decodes the first audio stream of `config.input()` into raw `f32` samples
/// at `config.output()`. Blocks until done; `cancel` is checked between packets.
pub fn extract_file(
    config: &ExtractConfig,
    cancel: CancellationToken,
) -> anyhow::Result<PipelineStats> {
    let mut input = AvInput::open(config.input())?;
    let stream_index = select_audio_stream(input.streams())?;
    if let Some(selected) = input.streams().iter().find(|s| s.index() == stream_index) {
        log::debug!(
            "selected stream {} ({:?}, {})",
            selected.index(),
            selected.media_type(),
            selected.codec()
        );
    }
    let stream = input
        .stream(stream_index)
        .ok_or_else(|| anyhow::anyhow!("stream {} not found", stream_index))?
        .clone();
    let decoder = AvDecoder::open(&stream, config.decode())?;
    log::info!("\n{}", DecoderInfo::new(&input, stream_index, &decoder));

    let mut sink = RawFileSink::create(config.output())
        .map_err(|e| anyhow::anyhow!("create {}: {}", config.output().display(), e))?;

    let mut pipeline = Pipeline::with_cancel(cancel);
    let result = pipeline.run(&mut input, DecoderSession::new(decoder, stream_index), &mut sink);
    // keep whatever was decoded, even when the run failed
    let written = sink.samples_written();
    let finished = sink.finish();
    finish_run(result, finished)?;

    let stats = pipeline.stats();
    log::info!(
        "{} -> {}: {} frames, {} samples ({} packets read, {} skipped)",
        config.input().display(),
        config.output().display(),
        stats.frames,
        written,
        stats.packets_read,
        stats.packets_skipped
    );
    Ok(stats)
}

/// The driver error wins over a failed output flush, which is only logged then.
fn finish_run<W>(
    result: Result<(), PipelineError>,
    finished: std::io::Result<W>,
) -> anyhow::Result<()> {
    match (result, finished) {
        (Err(e), Err(flush_err)) => {
            log::warn!("flush output after error failed: {}", flush_err);
            Err(e.into())
        }
        (Err(e), Ok(_)) => Err(e.into()),
        (Ok(()), Err(flush_err)) => Err(flush_err.into()),
        (Ok(()), Ok(_)) => Ok(()),
    }
}

/// Runs [`extract_file`] on the blocking pool and can be stopped from async code.
pub struct ExtractTask {
    cancel: CancellationToken,
}

impl ExtractTask {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub async fn run(&self, config: ExtractConfig) -> anyhow::Result<PipelineStats> {
        let cancel = self.cancel.clone();
        let handle = tokio::task::spawn_blocking(move || extract_file(&config, cancel));
        handle.await?
    }
}

impl Default for ExtractTask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
