use framecast::adapters::local::http;
use framecast::{Config, FfmpegTool, FramePipeline, FsCacheStore, HttpFetcher, PipelineOptions};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = FsCacheStore::new(&config.cache_root, &config.files_root, &config.public_base_url);
    if let Err(e) = store.ensure_roots().await {
        error!("Failed to create cache directories: {}", e);
        std::process::exit(1);
    }

    let fetcher = match HttpFetcher::new(config.fetch_timeout) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let media = FfmpegTool::new(&config.ffmpeg_bin, &config.ffprobe_bin);

    let options = PipelineOptions {
        extract_concurrency: config.extract_concurrency,
        completion: config.phase_completion,
        ..Default::default()
    };
    let pipeline = Arc::new(FramePipeline::new(store, fetcher, media, options));

    let app = http::router(pipeline, &config.files_root, &config.cache_root);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("Failed to bind TCP listener");
    info!(
        "Listening at {} (files: {:?}, cache: {:?}, completion: {})",
        config.bind_addr(),
        config.files_root,
        config.cache_root,
        config.phase_completion
    );
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
