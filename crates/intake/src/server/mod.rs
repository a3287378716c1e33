//! REST API for the intake kiosk and staff dashboard
//!
//! Uses axum for routing. The controller is shared behind a tokio mutex;
//! report generation releases the lock while the external call is in
//! flight, so other requests are never blocked on it.

use herald::server_logs::ServerLogs;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::controller::{IntakeController, SharedController};

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
  pub controller: SharedController,
  pub logs: ServerLogs,
}

impl AppState {
  pub fn new(controller: IntakeController, logs: ServerLogs) -> Self {
    Self { controller: Arc::new(Mutex::new(controller)), logs }
  }
}
