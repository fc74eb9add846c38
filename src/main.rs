use anyhow::Context;
use axum::Router;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routing_utils;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor for the shared application state
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters.as_ref())?;

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set", app_env::DB_URL))?;
    let db = db::connect_sqlx(&db_url).await?;
    db::run_migrations(&db).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    });

    let address = env::var(app_env::SERVER_ADDRESS)
        .unwrap_or_else(|_| app_env::DEFAULT_SERVER_ADDRESS.to_owned());
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding to {address}"))?;

    info!("Starting server on {address}");
    axum::serve(listener, build_router(shared_data))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(exporters) = otel_exporters {
        exporters.shutdown();
    }
    info!("Server stopped");

    Ok(())
}

/// Assembles every route of the service along with its middleware
fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .nest("/api/invoice", api::invoice::invoice_routes())
        .nest("/api/user", api::user::user_routes())
        .merge(api::swagger_main::build_documentation());

    logging::attach_tracing_http(router)
        .layer(CorsLayer::permissive())
        .with_state(shared_data)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Could not listen for Ctrl-C, the server will only stop when killed: {err}");
        std::future::pending::<()>().await;
    }

    info!("Received Ctrl-C, shutting down");
}
