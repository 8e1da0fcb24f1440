//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use storycard::models::StorySpec;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a PNG image of the given size
pub fn assert_png(response: &TestResponse, spec: StorySpec) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
    spec.validate_png(&response.body)
        .unwrap_or_else(|e| panic!("Unexpected PNG: {e}"));
}

/// Assert JSON error body carries the HTTP status and mentions `fragment`
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, fragment: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    let error = json["error"].as_str().unwrap_or_default();
    assert!(
        error.contains(fragment),
        "Expected error containing {fragment:?}, got {error:?}"
    );
}

/// Decode a PNG into RGBA8 pixels
pub fn decode_rgba(png_bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png_bytes)
        .expect("Failed to decode PNG")
        .to_rgba8()
}
