pub mod api;

use std::path::Path;
use std::sync::Arc;

use icsfeed_core::config::Settings;
use icsfeed_db::db::StoreProvider;
use icsfeed_db::db::connection::verify_connection;
use icsfeed_service::regenerate::Regenerator;
use salvo::Listener;
use salvo::conn::TcpListener;
use tokio::sync::watch;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Creates the output directory if it does not exist yet.
///
/// ## Errors
/// Returns `AppError::DestinationError` if the directory cannot be created.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub async fn prepare_destination(path: &Path) -> AppResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| AppError::DestinationError {
            path: path.to_path_buf(),
            source,
        })
}

/// ## Summary
/// Runs the regeneration scheduler over `provider` and the publisher until
/// ctrl-c.
///
/// ## Errors
/// Returns an error if the store cannot be reached at startup or the
/// scheduler task panics.
pub async fn serve<P: StoreProvider + 'static>(provider: P, config: &Settings) -> anyhow::Result<()> {
    verify_connection(&provider).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let regenerator = Regenerator::new(Arc::new(provider), config.feed.clone());
    let interval = config.schedule.interval();
    let scheduler = tokio::spawn(async move {
        let mut shutdown_rx = shutdown_rx;
        regenerator
            .run(interval, async move {
                shutdown_rx.changed().await.ok();
            })
            .await;
    });

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;
    let server = salvo::Server::new(acceptor);
    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown requested");
        shutdown_tx.send(true).ok();
        server_handle.stop_graceful(None);
    });

    tracing::info!(
        destination = %config.feed.destination.display(),
        "Serving feeds on {bind_addr}"
    );

    server.serve(api::routes(&config.feed.destination)).await;

    scheduler.await?;

    Ok(())
}
