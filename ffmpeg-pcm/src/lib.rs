/// Registers FFmpeg components. Call once at startup before opening inputs.
pub fn init() -> anyhow::Result<()> {
    ffmpeg_next::init().map_err(|e| anyhow::anyhow!("ffmpeg_next init: {}", e))
}

pub mod config;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod format;
pub mod frame;
pub mod input;
pub mod metadata;
pub mod packet;
pub mod pipeline;
pub mod sample;
pub mod session;
pub mod sink;
pub mod stream;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::PipelineError;
pub use extract::{ExtractTask, extract_file};
pub use pipeline::{Pipeline, PipelineStats};
pub use sample::{extract, extract_into};
