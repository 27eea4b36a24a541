use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

/// Outcome taxonomy for the intake pipeline. Every rejection reaching the
/// HTTP boundary is one of these; internal detail never leaks to the caller.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("Rate limit exceeded")]
    RateLimited {
        limit: u32,
        reset_at: DateTime<Utc>,
    },

    #[display("Validation failed")]
    ValidationError(Vec<FieldError>),

    #[display("Message appears to be spam")]
    SpamDetected,

    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("Storage failure: {_0}")]
    StorageFailure(String),

    #[display("Internal server error: {_0}")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());

        let body = match self {
            AppError::RateLimited { limit, reset_at } => {
                builder
                    .insert_header(("X-RateLimit-Limit", limit.to_string()))
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("X-RateLimit-Reset", reset_at.timestamp_millis().to_string()));
                serde_json::json!({
                    "message": "Too many requests. Please try again later."
                })
            }
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "message": "Validation failed",
                    "details": errors
                })
            }
            AppError::SpamDetected => {
                serde_json::json!({"message": "Message appears to be spam"})
            }
            AppError::NotFound(msg) => {
                serde_json::json!({"message": msg})
            }
            AppError::StorageFailure(msg) | AppError::InternalError(msg) => {
                tracing::error!("Internal failure: {}", msg);
                serde_json::json!({"message": "Internal server error"})
            }
        };

        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::SpamDetected => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::StorageFailure(format!("Database error: {}", err)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
