//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `news::NewsError` and `kernel::error::AppError`.

use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use news::{NewsConfig, OpenAiClassifier, TavilyClient, news_router};
use platform::rate_limit::{RateLimitConfig, STORE_TOKEN_VAR, STORE_URL_VAR};
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,news=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Rate limiting: missing credentials do not stop startup, every fetch
    // will answer 500 until they are provided
    let rate_limit_config = RateLimitConfig::from_env();
    if rate_limit_config.is_store_configured() {
        tracing::info!(
            max_requests = rate_limit_config.effective_limit(),
            "Daily rate limit enabled"
        );
    } else {
        tracing::warn!(
            url_var = STORE_URL_VAR,
            token_var = STORE_TOKEN_VAR,
            "Rate limit store not configured, news fetches will fail"
        );
    }

    // News providers
    let news_config = NewsConfig::from_env();
    let search = TavilyClient::new(&news_config)?;
    let classifier = OpenAiClassifier::new(&news_config)?;
    if !search.is_configured() || !classifier.is_configured() {
        tracing::warn!(
            search = search.is_configured(),
            classifier = classifier.is_configured(),
            "News provider API keys missing"
        );
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .expose_headers(ExposeHeaders::list([header::RETRY_AFTER]));

    // Build router
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest(
            "/api/news",
            news_router(search, classifier, news_config, rate_limit_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
