//! HTTP client wrapper - executes requests and formats responses

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::error::TransportError;
use crate::models::{ExecResult, RequestSpec};

/// Build the reqwest request for an assembled spec
fn build_request(client: &reqwest::Client, request: &RequestSpec) -> reqwest::RequestBuilder {
    let mut req_builder = client.request(request.method.to_reqwest(), &request.url);

    for (key, value) in &request.headers {
        if !value.trim().is_empty() {
            req_builder = req_builder.header(key, value);
        }
    }

    if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    req_builder
}

/// Execute an HTTP request and return the buffered response
pub async fn execute(
    client: &reqwest::Client,
    request: &RequestSpec,
    timeout: Duration,
) -> Result<ExecResult, TransportError> {
    let start = Instant::now();
    let resp = build_request(client, request)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| TransportError::from_reqwest(e, timeout))?;

    let status = resp.status();
    let headers: BTreeMap<String, String> = resp
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = resp.text().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else {
            TransportError::ReadBody(e)
        }
    })?;
    let elapsed = start.elapsed();

    Ok(ExecResult {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        elapsed,
        headers,
        body: pretty_body(body),
    })
}

/// Pretty-print JSON payloads, leave everything else untouched
fn pretty_body(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(body),
        Err(_) => body,
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use mockito::Matcher;

    fn spec(method: HttpMethod, url: String) -> RequestSpec {
        RequestSpec {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn json_responses_are_pretty_printed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users/1")
            .with_status(200)
            .with_header("Content-Type", "application/json")
            .with_header("X-Request-Id", "abc")
            .with_body(r#"{"id":1}"#)
            .create_async()
            .await;

        let client = create_client();
        let result = execute(
            &client,
            &spec(HttpMethod::GET, format!("{}/users/1", server.url())),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(result.status_line(), "200 OK");
        assert_eq!(result.body, "{\n  \"id\": 1\n}");
        assert_eq!(result.content_type(), Some("application/json"));
        assert_eq!(result.headers.get("x-request-id").map(String::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn headers_and_body_are_sent_and_blank_headers_skipped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/users")
            .match_header("authorization", "Bearer abc")
            .match_header("x-blank", Matcher::Missing)
            .match_body(r#"{"name":"Ada"}"#)
            .with_status(201)
            .with_body("created")
            .create_async()
            .await;

        let mut request = spec(HttpMethod::POST, format!("{}/users", server.url()));
        request.headers.insert("Authorization".into(), "Bearer abc".into());
        request.headers.insert("X-Blank".into(), "  ".into());
        request.body = Some(r#"{"name":"Ada"}"#.into());

        let client = create_client();
        let result = execute(&client, &request, Duration::from_secs(5)).await.unwrap();
        assert_eq!(result.status, 201);
        assert_eq!(result.reason, "Created");
        assert_eq!(result.body, "created");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let client = create_client();
        // Port 9 (discard) is closed on test machines
        let err = execute(
            &client,
            &spec(HttpMethod::GET, "http://127.0.0.1:9/".into()),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_) | TransportError::Request(_)));
    }

    /// Accepts connections and never answers
    async fn silent_server() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        addr
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let addr = silent_server().await;
        let client = create_client();
        let err = execute(
            &client,
            &spec(HttpMethod::GET, format!("http://{}/", addr)),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(t) if t == Duration::from_millis(200)));
    }
}
