use ffmpeg_pcm::{ExtractTask, config::ExtractConfig};

fn init_logging() {
    // RUST_LOG, when set, overrides these defaults
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("ffmpeg_pcm", log::LevelFilter::Info)
        .filter_module("pcm_extract", log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = ExtractConfig::from_args(std::env::args().skip(1))?;
    ffmpeg_pcm::init()?;

    let task = ExtractTask::new();
    let cancel = task.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("ctrl+c received, stopping after the current packet");
            cancel.cancel();
        }
    });

    let stats = task.run(config).await?;
    log::info!(
        "done: {} frames, {} samples, {} busy retries",
        stats.frames,
        stats.samples,
        stats.busy_retries
    );
    Ok(())
}
