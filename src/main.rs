//! Storycast server entry point

use std::sync::Arc;

use storycast::application::{FreshStoryCache, StoryPipeline};
use storycast::config::{load_config, print_config};
use storycast::infrastructure::http::{AppState, HttpServer, ServerConfig};
use storycast::infrastructure::llm::{OpenAiLlmClient, OpenAiLlmConfig};
use storycast::infrastructure::storage::{SeedPool, StoryStore};
use storycast::infrastructure::tts::{PiperTtsClient, PiperTtsConfig};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let log_filter = format!(
        "{},storycast={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Storycast - narrated story dialogue server");
    print_config(&config);

    tokio::fs::create_dir_all(&config.storage.generated_dir).await?;

    // fail fast: no sources, no server
    let seeds = Arc::new(SeedPool::load(&config.storage.seeds_dir)?);
    let store = Arc::new(StoryStore::new(&config.storage.generated_dir));

    // fail fast: missing credential is a configuration error
    let llm = Arc::new(OpenAiLlmClient::new(OpenAiLlmConfig {
        base_url: config.llm.base_url.clone(),
        api_key: config.llm.api_key.clone(),
        timeout_secs: config.llm.timeout_secs,
    })?);

    let tts = Arc::new(PiperTtsClient::new(PiperTtsConfig {
        executable: config.tts.executable.clone(),
        models_dir: config.tts.models_dir.clone(),
        timeout_secs: config.tts.timeout_secs,
    }));

    let pipeline = Arc::new(StoryPipeline::new(
        seeds,
        store,
        llm,
        tts,
        config.llm.completion_defaults(),
    ));

    let fresh_cache = Arc::new(FreshStoryCache::new((&config.cache).into(), pipeline));

    // one blocking run so the first request never waits; best-effort
    tracing::info!("Generating initial story...");
    fresh_cache.warm_up().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refill_handle = fresh_cache.spawn_refill_loop(shutdown_rx);

    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        AppState::new(fresh_cache),
        config.storage.generated_dir.clone(),
    );

    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = refill_handle.await;

    tracing::info!("Server shutdown complete");
    Ok(())
}
