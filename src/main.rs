//! MapID · Question Identifier Backend
//!
//! - Axum HTTP API for the MapID codec (parse / validate / generate / describe)
//! - Taxonomy configuration store persisted as a single JSON document
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   MAPID_CONFIG_PATH : path to the taxonomy JSON (default ./data/taxonomy.json)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod codec;
mod config;
mod describe;
mod protocol;
mod state;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (config store wired to its file resource).
  let state = Arc::new(AppState::new());

  // First explicit load: seeds and persists the built-in default taxonomy
  // when no document exists yet at MAPID_CONFIG_PATH.
  let cfg = state.store.load().await?;
  info!(
    target: "mapid_backend",
    grades = cfg.grade.len(),
    subjects = cfg.subject.len(),
    chapters = cfg.chapter.len(),
    levels = cfg.level.len(),
    lessons = cfg.lesson.len(),
    forms = cfg.form.len(),
    "Taxonomy configuration ready"
  );

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "mapid_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
