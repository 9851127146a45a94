use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use babylog_core::{LogRowId, RecordError, UpstreamParseError};
use babylog_parser::{parse_timestamp, NormalizedActivity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/echo", post(echo))
        .route("/api/record", post(record))
        .route("/api/reflect", post(reflect))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::UpstreamParse(err) => {
                warn!("utterance could not be normalized: {err}");
                ApiError {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    detail: upstream_detail(&err),
                }
            }
            RecordError::Storage(err) => {
                error!("activity could not be saved: {err}");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: "failed to save activity".to_string(),
                }
            }
        }
    }
}

/// Upstream response bodies stay in the logs; clients only learn that the
/// request failed.
fn upstream_detail(err: &UpstreamParseError) -> String {
    match err {
        UpstreamParseError::Transport(_) => "language model request failed".to_string(),
        other => other.to_string(),
    }
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "babylog API" }))
}

async fn echo(Json(payload): Json<Value>) -> Json<Value> {
    let message = payload
        .get("message")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    Json(json!({ "echo": message }))
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub utterance: String,
    #[serde(deserialize_with = "deserialize_recorded_at")]
    pub recorded_at: DateTime<Utc>,
}

fn deserialize_recorded_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid recorded_at '{raw}'")))
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub parsed: NormalizedActivity,
    pub saved: bool,
    pub id: LogRowId,
}

async fn record(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, ApiError> {
    let recorded = state
        .recorder
        .record(&payload.utterance, payload.recorded_at)
        .await?;

    Ok(Json(RecordResponse {
        parsed: recorded.parsed,
        saved: true,
        id: recorded.id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReflectRequest {
    #[serde(default)]
    pub message: String,
}

async fn reflect(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReflectRequest>,
) -> Result<Json<Value>, ApiError> {
    let reply = state
        .reflector
        .reflect(&payload.message)
        .await
        .map_err(|err: UpstreamParseError| {
            warn!("reflection failed: {err}");
            ApiError {
                status: StatusCode::BAD_GATEWAY,
                detail: upstream_detail(&err),
            }
        })?;

    Ok(Json(json!({ "ai_response": reply })))
}
