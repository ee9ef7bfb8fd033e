//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! codec, the config store, and the description resolver; error kinds are
//! rendered to user-facing messages and status codes here, nowhere else.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::{header, StatusCode},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::codec::{self, CodecError, IdComponents};
use crate::config::{ConfigError, PartialTaxonomyConfig};
use crate::describe::{describe, structure, DescribeError};
use crate::protocol::*;
use crate::state::AppState;
use crate::util::trunc_for_log;

fn codec_error(e: &CodecError) -> Response {
  // Every codec failure is an input defect.
  (StatusCode::BAD_REQUEST, Json(ErrorOut { message: e.to_string() })).into_response()
}

fn config_error(e: &ConfigError) -> Response {
  let status = match e {
    ConfigError::InvalidFormat(_) | ConfigError::Validation { .. } => {
      StatusCode::UNPROCESSABLE_ENTITY
    }
    ConfigError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  };
  (status, Json(ErrorOut { message: e.to_string() })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", fields(%q.id))]
pub async fn http_parse(Query(q): Query<IdQuery>) -> Response {
  match codec::parse(&q.id) {
    Ok(identifier) => Json(identifier).into_response(),
    Err(e) => codec_error(&e),
  }
}

#[instrument(level = "info", fields(%q.id))]
pub async fn http_validate(Query(q): Query<IdQuery>) -> impl IntoResponse {
  let report = codec::validate(&q.id);
  info!(target: "mapid_backend", id = %q.id, is_valid = report.is_valid, errors = report.errors.len(), "Identifier validated");
  Json(ValidateOut::from(report))
}

#[instrument(level = "info", skip(body))]
pub async fn http_generate(Json(body): Json<IdComponents>) -> Response {
  match codec::generate(&body) {
    Ok(id) => {
      info!(target: "mapid_backend", %id, "Identifier generated");
      Json(GenerateOut { id }).into_response()
    }
    Err(e) => codec_error(&e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.id))]
pub async fn http_describe(
  State(state): State<Arc<AppState>>,
  Query(q): Query<IdQuery>,
) -> Response {
  match describe(&state.store, &q.id).await {
    Ok(d) => {
      info!(target: "mapid_backend", id = %q.id, entries = d.entries.len(), "Identifier described");
      Json(d).into_response()
    }
    Err(DescribeError::Codec(e)) => codec_error(&e),
    Err(DescribeError::Config(e)) => config_error(&e),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_structure(State(state): State<Arc<AppState>>) -> Response {
  match structure(&state.store).await {
    Ok(cfg) => Json(cfg).into_response(),
    Err(e) => config_error(&e),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_config(State(state): State<Arc<AppState>>) -> Response {
  match state.store.load().await {
    Ok(cfg) => Json(cfg).into_response(),
    Err(e) => config_error(&e),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_update_config(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PartialTaxonomyConfig>,
) -> Response {
  match state.store.update(body).await {
    Ok(cfg) => {
      info!(target: "taxonomy", "Taxonomy configuration updated");
      Json(cfg).into_response()
    }
    Err(e) => config_error(&e),
  }
}

#[instrument(level = "info", skip(state, body), fields(body_len = body.len()))]
pub async fn http_import_config(State(state): State<Arc<AppState>>, body: String) -> Response {
  match state.store.import_from_text(&body).await {
    Ok(cfg) => Json(cfg).into_response(),
    Err(e) => {
      info!(target: "taxonomy", payload = %trunc_for_log(&body, 160), error = %e, "Taxonomy import rejected");
      config_error(&e)
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_export_config(State(state): State<Arc<AppState>>) -> Response {
  match state.store.export_to_text().await {
    Ok(text) => ([(header::CONTENT_TYPE, "application/json")], text).into_response(),
    Err(e) => config_error(&e),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_reset_config(State(state): State<Arc<AppState>>) -> Response {
  match state.store.reset().await {
    Ok(cfg) => Json(cfg).into_response(),
    Err(e) => config_error(&e),
  }
}
