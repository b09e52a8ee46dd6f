use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use labtab::api::report_api_router;
use labtab::config::AppConfig;
use labtab::pipeline::detection::RemoteDetector;
use labtab::pipeline::extraction::{RemoteOcrClient, TableExtractor};
use labtab::pipeline::summarize::ChatCompletionsClient;
use labtab::service::ReportService;

// The pipeline clients are blocking; they are constructed before the async
// runtime starts and only ever used from spawn_blocking.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(labtab::config::default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("labtab starting v{}", labtab::APP_VERSION);

    let table_detector = RemoteDetector::new(
        &config.detection_url,
        config.api_token.clone(),
        config.http_timeout_secs,
    )?;
    let structure_recognizer = RemoteDetector::new(
        &config.structure_url,
        config.api_token.clone(),
        config.http_timeout_secs,
    )?;
    let ocr = RemoteOcrClient::new(&config.ocr_url, config.http_timeout_secs)?;
    let llm = ChatCompletionsClient::new(
        &config.llm_url,
        &config.llm_model,
        config.api_token.clone(),
        config.http_timeout_secs,
    )?;

    let extractor = TableExtractor::new(
        Arc::new(table_detector),
        Arc::new(structure_recognizer),
        Arc::new(ocr),
    );
    let service = Arc::new(ReportService::new(
        extractor,
        Arc::new(llm),
        config.confidence_threshold,
    ));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let router = report_api_router(service);
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
        tracing::info!(addr = %config.bind_addr, "report API listening");
        axum::serve(listener, router).await?;
        Ok(())
    })
}
