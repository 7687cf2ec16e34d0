use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use store_api_client::StoreApiClient;
use storefront_common::Config;
use storefront_web::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("storefront=info".parse()?)
                .add_directive("store_api_client=info".parse()?),
        )
        .init();

    let config = Config::web_from_env()?;

    let backend = StoreApiClient::new(&config.store_api_url, config.store_api_timeout)?;
    let state = Arc::new(AppState::new(
        Arc::new(backend),
        config.locales.clone(),
        config.products_per_page,
    ));

    let app = router(state)
        // Logging layer: method + path only (no query params, no IP)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(
        locales = ?config.locales.supported(),
        default_locale = %config.locales.default_locale(),
        "Storefront web server starting on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
