use ebook_service::config::EbookConfig;
use ebook_service::services::init_metrics;
use ebook_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EbookConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "ebook-service",
        &config.common.log_level,
        otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    let app = Application::build(config).await?;
    tracing::info!("ebook-service listening on port {}", app.port());

    app.run_until_stopped().await?;

    tracing::info!("ebook-service stopped");
    Ok(())
}
