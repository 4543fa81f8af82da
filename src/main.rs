use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_search::{config::AppConfig, server, SearchEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_search=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;

    tracing::info!(
        "Searching {:?} files under {}",
        config.search_extensions,
        config.search_dir.display()
    );
    if !config.search_dir.is_dir() {
        tracing::warn!(
            "Search directory {} does not exist, every search will come back empty",
            config.search_dir.display()
        );
    }

    let search_engine = SearchEngine::new(config.search_settings());

    tracing::info!("Press Ctrl+C to stop");
    server::serve(addr, search_engine).await?;

    Ok(())
}
