use axum::http::{header, Method};
use axum::middleware;
use backend::shared::config::load_config;
use backend::shared::format::format_number;
use backend::shared::sales_source::SalesStore;
use backend::system::middleware::request_logger::request_logger;
use backend::{routes, system};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;
    let store = Arc::new(SalesStore::new(config.sales_data.clone()));

    // Load once at startup so a missing or broken file shows up in the log early
    match store.snapshot().await {
        Ok(loaded) => tracing::info!(
            "Sales data ready: {} records from {} ({} rows skipped)",
            format_number(loaded.records.len()),
            loaded.path.display(),
            loaded.skipped
        ),
        Err(e) => tracing::warn!("Sales data not loaded at startup: {}", e),
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(store)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr = config.server.socket_addr();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
