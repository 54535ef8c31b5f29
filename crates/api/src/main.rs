use std::sync::Arc;

use anyhow::Context;

use stockroom_api::{app, config::ApiConfig, session::SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let registry = SessionRegistry::with_idle_ttl(config.session_idle_ttl);
    tracing::info!(
        idle_ttl_secs = registry.idle_ttl().num_seconds(),
        "session registry ready"
    );

    let app = app::build_app(Arc::new(registry));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
