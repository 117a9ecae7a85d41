use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tenant_gateway::{app, config, is_production, AppState};

#[derive(Debug, Parser)]
#[command(name = "tenant-gateway", version, about = "Multi-tenant web gateway")]
struct ServerArgs {
    /// Port to listen on (falls back to $PORT, then 3000)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up LOGS_API_URL, API_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tenant_gateway=info,tower_http=info")),
        )
        .init();

    let args = ServerArgs::parse();

    let config = config::config();
    tracing::info!("Starting tenant-gateway in {:?} mode", config.environment);
    if is_production!() && !config.tenant.strict {
        tracing::warn!(
            "Requests without a tenant fall back to '{}'; set TENANT_STRICT=true to reject them",
            config.tenant.default_tenant_id
        );
    }

    let state = AppState::new(config.clone()).context("failed to build backend client")?;
    let app = app(state);

    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("tenant-gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
