//! Server bootstrap shared by `libris-app` and `libris serve`.

use anyhow::Context;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};

use crate::modules;

/// Open the store, bring every module up, serve until Ctrl-C, then stop the
/// modules so the catalog is flushed.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = libris_db::open(&settings.storage).context("failed to open snapshot store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings, store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(env = ?settings.environment, "libris bootstrap complete");

    let served = libris_http::start_server(&registry, &settings, shutdown_signal()).await;
    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
