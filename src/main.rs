use anyhow::Context;
use italia_app::App;
use italia_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load settings")?;
    italia_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "italia-app bootstrap starting"
    );

    let app = App::bootstrap(settings).await?;

    tracing::info!(modules = app.registry.modules().len(), "italia-app bootstrap complete");
    app.serve().await
}
