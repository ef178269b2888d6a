use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::types::AppState;

/// Query parameters for the health endpoints.
#[derive(Debug, Deserialize)]
pub struct EchoQuery {
    /// Optional string echoed back in the response
    pub echo: Option<String>,
}

/// Health document returned by `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: u16,
    pub status_message: String,
    pub timestamp: String,
    pub ip_address: String,
    pub echo: Option<String>,
    pub path_echo: Option<String>,
    pub uptime_secs: i64,
    pub courses: usize,
    pub assignments: usize,
}

fn make_health(s: &AppState, echo: Option<String>, path_echo: Option<String>) -> Health {
    let now = Utc::now();
    Health {
        status: StatusCode::OK.as_u16(),
        status_message: "OK".to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        ip_address: s.config.address.clone(),
        echo,
        path_echo,
        uptime_secs: (now - s.started_at).num_seconds(),
        courses: s.courses.len(),
        assignments: s.assignments.len(),
    }
}

/// GET /
pub async fn get_root() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Welcome to the Course and Assignment Management API."
        })),
    )
        .into_response()
}

/// GET /health
pub async fn get_health(
    State(s): State<Arc<AppState>>,
    Query(query): Query<EchoQuery>,
) -> Response {
    info!("GET /health");
    (StatusCode::OK, Json(make_health(&s, query.echo, None))).into_response()
}

/// GET /health/:path_echo
pub async fn get_health_with_path(
    Path(path_echo): Path<String>,
    State(s): State<Arc<AppState>>,
    Query(query): Query<EchoQuery>,
) -> Response {
    info!("GET /health/{}", path_echo);
    (
        StatusCode::OK,
        Json(make_health(&s, query.echo, Some(path_echo))),
    )
        .into_response()
}
