use server::config;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;

    tracing::info!(
        kind = %config.model_kind,
        path = ?config.model_path,
        "Loading scoring model..."
    );
    let model = server::load_model(&config)?;
    tracing::info!("Scoring model ready: {}", model.name());
    if config.engine_plays_both {
        tracing::info!("Engine will move for both sides");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let app = server::router(model, config);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
