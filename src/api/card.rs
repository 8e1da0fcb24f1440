use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{CardRequest, RenderedCard};
use crate::server::AppState;
use crate::services::RequestOrigin;

/// Error response for card endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct CardErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}

/// Render a story card for download
///
/// Returns the 1080x1920 PNG as an attachment named after the title.
#[utoipa::path(
    post,
    path = "/api/card",
    request_body = CardRequest,
    responses(
        (status = 200, description = "Story card PNG", content_type = "image/png"),
        (status = 422, description = "Invalid card request", body = CardErrorResponse),
        (status = 502, description = "Background image could not be loaded", body = CardErrorResponse),
        (status = 500, description = "Rendering error", body = CardErrorResponse),
    ),
    tag = "Card"
)]
pub async fn handle_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CardRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let origin = request_origin(&headers, &state);

    let card = state.card_service.render(&request, &origin).await?;
    Ok(png_response(card, true))
}

/// Render a quarter-size preview of a story card
///
/// Returns a 270x480 PNG shown inline.
#[utoipa::path(
    post,
    path = "/api/card/preview",
    request_body = CardRequest,
    responses(
        (status = 200, description = "Preview PNG", content_type = "image/png"),
        (status = 422, description = "Invalid card request", body = CardErrorResponse),
        (status = 502, description = "Background image could not be loaded", body = CardErrorResponse),
        (status = 500, description = "Rendering error", body = CardErrorResponse),
    ),
    tag = "Card"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CardRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let origin = request_origin(&headers, &state);

    let card = state.card_service.preview(&request, &origin).await?;
    Ok(png_response(card, false))
}

fn request_origin(headers: &HeaderMap, state: &AppState) -> RequestOrigin {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    RequestOrigin::new(host, state.config.origin_host.clone())
}

fn png_response(card: RenderedCard, attachment: bool) -> Response {
    let disposition = content_disposition(&card.filename, attachment);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, card.png_bytes.len().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(card.png_bytes),
    )
        .into_response()
}

/// Build a `Content-Disposition` value with a header-safe filename
pub fn content_disposition(filename: &str, attachment: bool) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let kind = if attachment { "attachment" } else { "inline" };
    format!("{kind}; filename=\"{safe}\"")
}
