use crate::config::Config;
use crate::services::ReferralService;
use crate::services::{api, store};
use tokio::net::TcpListener;

pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.listen_addr()?;
    let allowed_origin = config.allowed_origin()?;

    // 打开存储并注入服务
    let store = store::open(&config.store.uri)?;
    let service = ReferralService::new(store);

    let app = api::router(service, allowed_origin);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        allowed_origin = %config.cors.allowed_origin,
        "Referral server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Referral server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
