use anyhow::Context;

use rainforest_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rainforest_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let app = rainforest_api::app::build_app(&config)
        .await
        .context("failed to start services")?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
