use anyhow::Context;
use shelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = %settings.environment,
        storage = %settings.storage.path.display(),
        "shelf-app bootstrap starting"
    );

    shelf_app::run(settings).await
}
