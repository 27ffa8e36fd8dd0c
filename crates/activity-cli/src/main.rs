mod http;
mod settings;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use activity_core::ActivityService;
use activity_redis::RedisStore;
use anyhow::{Context, Result};
use clap::Parser;

use settings::Settings;

/// Command-line bootstrap for the activity counter gateway.
#[derive(Debug, Parser)]
#[command(name = "activity-gateway", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "ACTIVITY_CONFIG", default_value = "activity.toml")]
    config: PathBuf,

    /// Address to bind the HTTP gateway to.
    #[arg(long, env = "ACTIVITY_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    log::info!("connecting to backing store at {}", settings.redis.url);
    let store = RedisStore::connect(&settings.redis)
        .await
        .context("connecting to the backing store")?;

    let service = Arc::new(ActivityService::new(Arc::new(store), settings.activity)?);

    let app = http::router(service);

    log::info!("listening on {}", cli.bind);
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding to {}", cli.bind))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving the activity gateway")?;

    Ok(())
}
