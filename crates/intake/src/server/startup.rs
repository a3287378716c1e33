//! REST server startup and configuration

use anyhow::Result;
use axum::{serve, Router};
use herald::server_logs::ServerLogs;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::IntakeConfig;
use crate::server::routing::create_router;
use crate::server::AppState;

/// Router with tracing and CORS layers over a controller built from `config`
pub fn build_app(config: &IntakeConfig, logs: ServerLogs) -> Router {
  let state = AppState::new(crate::open_controller(config), logs);
  create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
}

/// Start the REST server on `config.bind`
pub async fn start_server(config: &IntakeConfig) -> Result<()> {
  let addr = config.bind;
  let logs = ServerLogs::open(config.server_log_path())?;

  logs.info(&format!("Starting intake REST server on {addr}"), "intake-server").await;

  let app = build_app(config, logs.clone());

  let listener = TcpListener::bind(addr).await?;
  logs.info(&format!("Server listening on {addr}"), "intake-server").await;

  match serve(listener, app).await {
    Ok(()) => {
      logs.info("Server shutdown gracefully", "intake-server").await;
      Ok(())
    }
    Err(e) => {
      logs.error(&format!("Server error: {e}"), "intake-server").await;
      Err(anyhow::anyhow!("Server error: {e}"))
    }
  }
}
