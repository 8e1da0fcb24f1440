//! Mock HTTP server for background image fetching.

use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockImageServer {
    pub server: MockServer,
}

impl MockImageServer {
    /// Start a new mock HTTP server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get URL for a specific path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Mock a GET endpoint returning image bytes
    pub async fn mock_image(&self, endpoint: &str, bytes: Vec<u8>, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .insert_header("content-type", content_type),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an image endpoint that must be fetched exactly `times` times
    pub async fn mock_image_expect(&self, endpoint: &str, bytes: Vec<u8>, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .insert_header("content-type", "image/png"),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mock an image endpoint that answers after a delay
    pub async fn mock_slow_image(&self, endpoint: &str, bytes: Vec<u8>, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an endpoint that returns an error
    pub async fn mock_error(&self, endpoint: &str, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.server)
            .await;
    }
}

/// Serve one chunked response (no Content-Length) that sends `chunk_len`
/// bytes and then stalls without finishing the body.
///
/// Returns the URL to fetch.
pub async fn serve_chunked_then_stall(chunk_len: usize) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind chunked server");
    let addr = listener.local_addr().expect("Chunked server address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: image/png\r\n\
                    Transfer-Encoding: chunked\r\n\r\n";
        let mut response = head.as_bytes().to_vec();
        response.extend_from_slice(format!("{chunk_len:x}\r\n").as_bytes());
        response.extend(std::iter::repeat(0u8).take(chunk_len));
        response.extend_from_slice(b"\r\n");
        let _ = socket.write_all(&response).await;
        let _ = socket.flush().await;

        // Keep the connection open without finishing the body
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    format!("http://{addr}/big.png")
}
