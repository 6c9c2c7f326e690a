//! Shelf application library
//!
//! Hosts the project modules and the server bootstrap shared by the
//! `shelf-app` binary and the `shelf` CLI.

pub mod modules;

use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Register modules, run their lifecycle, and serve HTTP until a shutdown
/// signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings, shelf_http::shutdown_signal()).await;

    // Stop modules even if serving failed, then report the first error.
    let stopped = registry.stop_modules().await;
    served?;
    stopped?;

    tracing::info!("shelf shut down cleanly");
    Ok(())
}
