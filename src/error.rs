use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid card: {0}")]
    Validation(#[from] ValidationError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),
}

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Failed to load background image: {0}")]
    ImageLoad(String),

    #[error("Failed to encode image: {0}")]
    ImageEncoding(String),

    #[error("Drawing surface unavailable for {width}x{height}")]
    DrawingSurfaceUnavailable { width: u32, height: u32 },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<tera::Error> for CardError {
    fn from(e: tera::Error) -> Self {
        CardError::Template(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Card(CardError::ImageLoad(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Card(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
