//! Error handling

use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::charts::ChartError;
use crate::gateway::ClassificationError;
use crate::report::ReportError;
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Validation errors
    ValidationError(String),

    // Classification service errors
    Classification(ClassificationError),

    // Record store errors
    Store(StoreError),

    // Rendering errors
    Chart(ChartError),
    Report(ReportError),

    // Background task failures
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Classification(err) => {
                tracing::error!("Classification error: {}", err);
                let status = match err {
                    ClassificationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, format!("Analysis failed: {}", err))
            }
            AppError::Store(err) => {
                tracing::error!("Record store error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Analysis history unavailable: {}", err))
            }
            AppError::Chart(err) => {
                tracing::error!("Chart error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Chart rendering failed".to_string())
            }
            AppError::Report(err) => {
                tracing::error!("Report error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "PDF creation failed".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ClassificationError> for AppError {
    fn from(err: ClassificationError) -> Self {
        AppError::Classification(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Chart(err)
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Report(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::ValidationError(format!("Invalid upload: {}", err.body_text()))
    }
}
