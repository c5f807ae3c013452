use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use satintin_engine::GachaError;

pub type AppSuccess = GenericResponse;

/// Uniform envelope every endpoint answers with; the client JSON-parses
/// `data` and never sees a raw storage or transport error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl GenericResponse {
    pub fn new(status: StatusCode, message: &str, data: serde_json::Value) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }

    pub fn ok(data: serde_json::Value) -> Self {
        Self::new(StatusCode::OK, "ok", data)
    }
}

impl IntoResponse for GenericResponse {
    fn into_response(self) -> Response {
        Json::from(self).into_response()
    }
}

#[derive(Debug)]
pub struct AppError(pub StatusCode, pub anyhow::Error);

impl AppError {
    pub fn new(status: StatusCode, err: anyhow::Error) -> Self {
        Self(status, err)
    }

    /// Map the engine taxonomy onto HTTP statuses. Configuration and
    /// persistence problems deliberately collapse into a generic 500:
    /// the client shows "draw failed, please retry" either way.
    pub fn from_gacha(err: GachaError) -> Self {
        let status = match &err {
            GachaError::InsufficientBalance { .. } => StatusCode::FORBIDDEN,
            GachaError::InvalidPool(_) | GachaError::InvalidDrawCount(_) => {
                StatusCode::BAD_REQUEST
            }
            GachaError::ConcurrentDrawConflict => StatusCode::CONFLICT,
            GachaError::Configuration(_) | GachaError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self(status, err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("CODE: {}, MESSAGE: {}", self.0.as_u16(), self.1);
        GenericResponse::new(self.0, &self.1.to_string(), json!({})).into_response()
    }
}

// Lets handlers use `?` on anything convertible to `anyhow::Error`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(StatusCode::BAD_REQUEST, err.into())
    }
}
