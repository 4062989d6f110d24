use axum::http::{Method, header};
use fintrack::api::app;
use fintrack::config::CONFIG;
use fintrack::core::services::FintrackService;
use fintrack::infrastructure::classifier::http::HttpClassifier;
use fintrack::infrastructure::logging::in_memory::InMemoryLogging;
use fintrack::infrastructure::storage::in_memory::InMemoryStorage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&CONFIG.log_level))
        .init();
    info!("Starting with {:?}", *CONFIG);

    let classifier = HttpClassifier::builder()
        .endpoint(CONFIG.classifier_url.clone())
        .api_key(CONFIG.classifier_api_key.clone())
        .timeout(Duration::from_secs(CONFIG.classifier_timeout_secs))
        .build()?;
    let service = Arc::new(FintrackService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        classifier,
        CONFIG.jwt_secret.clone(),
        CONFIG.public_origin.clone(),
    ));

    let app = app(service)
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(CONFIG.request_timeout_secs)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
