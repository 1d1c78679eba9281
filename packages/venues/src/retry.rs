//! HTTP retry helper for venue lookups.
//!
//! Every live lookup goes through [`send_json`] so that timeouts,
//! connection resets, rate limiting (HTTP 429) and server errors (5xx)
//! are retried with exponential backoff before the city run is failed.

use std::time::Duration;

use crate::VenueError;

/// Maximum number of retry attempts for transient failures.
///
/// Backoff doubles from 1s (1s, 2s, 4s), so a district gives up after
/// roughly 7 seconds of waiting plus the request timeouts.
const MAX_RETRIES: u32 = 3;

/// Maximum length of the response body preview included in errors.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends a request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt, since
/// [`reqwest::RequestBuilder`] is consumed by `.send()`.
///
/// Does **not** retry HTTP 4xx other than 429. Foursquare reports
/// invalid credentials and quota exhaustion as 400/401/403, which no
/// amount of waiting fixes.
///
/// # Errors
///
/// Returns [`VenueError`] if every attempt fails, the server answers
/// with a permanent error status, or the body is not valid JSON.
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, VenueError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut last_error: Option<VenueError> = None;

    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if is_transient(&e) => {
                log::warn!("  transient error: {e}");
                last_error = Some(VenueError::Http(e));
                continue;
            }
            Err(e) => return Err(VenueError::Http(e)),
        };

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            log::warn!("  HTTP {status}");
            last_error = Some(VenueError::Response {
                message: format!("HTTP {status} after {MAX_RETRIES} retries"),
            });
            continue;
        }

        // reqwest reports a body cut short as a decode error, so every
        // failure while reading the body counts as transient.
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("  failed reading response body: {e}");
                last_error = Some(VenueError::Http(e));
                continue;
            }
        };
        if status.is_client_error() {
            return Err(VenueError::Response {
                message: format!("HTTP {status}: {}", preview(&text)),
            });
        }

        return serde_json::from_str(&text).map_err(|e| VenueError::Response {
            message: format!("invalid JSON ({e}): {}", preview(&text)),
        });
    }

    Err(last_error.unwrap_or_else(|| VenueError::Response {
        message: "request failed after all retries".to_string(),
    }))
}

/// Delay before retry `attempt` (1-based): 1s, 2s, 4s, ...
const fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << (attempt - 1))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = "é".repeat(BODY_PREVIEW_LEN);
        let cut = preview(&text);
        assert!(cut.len() <= BODY_PREVIEW_LEN);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn preview_keeps_short_bodies() {
        assert_eq!(preview("{}"), "{}");
    }

    /// Serves one response per connection from `responses`, in order.
    async fn serve(responses: Vec<&'static str>) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn truncated_body_is_retried() {
        let addr = serve(vec![
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"ok\"",
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"ok\":true}",
        ])
        .await;
        let client = reqwest::Client::new();
        let url = format!("http://{addr}/explore");

        let value = send_json(|| client.get(&url)).await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let addr = serve(vec![
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 12\r\nConnection: close\r\n\r\nbad token!!!",
        ])
        .await;
        let client = reqwest::Client::new();
        let url = format!("http://{addr}/explore");

        let err = send_json(|| client.get(&url)).await.unwrap_err();
        match err {
            VenueError::Response { message } => {
                assert!(message.contains("401"), "{message}");
                assert!(message.contains("bad token"), "{message}");
            }
            other => panic!("expected response error, got {other:?}"),
        }
    }
}
