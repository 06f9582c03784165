use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorBody, GatewayError};
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Deserialize, Serialize)]
pub struct WriteSiteRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WriteSiteResponse {
    pub success: bool,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
}

pub async fn list_sites(State(state): State<AppState>) -> Result<Json<Vec<String>>, GatewayError> {
    let result = state.store.list().await;
    metrics::record_site_operation("list", result.is_ok());
    Ok(Json(result?))
}

pub async fn get_site(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, GatewayError> {
    if !state.store.layout().has_suffix(&name) {
        return Ok(route_not_found());
    }

    let result = state.store.read(&name).await;
    metrics::record_site_operation("read", result.is_ok());
    Ok(Json(result?).into_response())
}

pub async fn put_site(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<WriteSiteRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    if !state.store.layout().has_suffix(&name) {
        return Ok(route_not_found());
    }
    let Json(body) = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge(e.body_text()),
        _ => GatewayError::MalformedBody(e.body_text()),
    })?;

    let result = state.store.write(&name, &body.content).await;
    metrics::record_site_operation("write", result.is_ok());
    let name = result?;

    Ok(Json(WriteSiteResponse {
        success: true,
        name: name.to_string(),
    })
    .into_response())
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, GatewayError> {
    let start = std::time::Instant::now();
    let result = state.reloader.run().await;
    metrics::record_reload(result.is_ok(), start.elapsed());
    let outcome = result?;

    let mut message = format!("Configuration reloaded in {}ms", outcome.elapsed.as_millis());
    if !outcome.stdout.is_empty() {
        message.push_str(": ");
        message.push_str(&outcome.stdout);
    }

    Ok(Json(ReloadResponse {
        success: true,
        message,
    }))
}

/// Names without the recognized suffix are not part of the route table.
fn route_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found"))).into_response()
}
