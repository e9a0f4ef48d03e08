use std::sync::Arc;

use anyhow::Context;

use stocktag_infra::StocktagConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stocktag_observability::init();

    let config = StocktagConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(stocktag_api::app::services::build_services(&config).await?);
    let app = stocktag_api::app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.ledger.close().await;
    tracing::info!("store closed; bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
