use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use crate::domain::cache::{AssetRequest, AssetResponse};
use crate::domain::network::NetworkFetcher;
use crate::domain::DomainError;

/// Connection-level headers that must not be forwarded in either direction
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_forwardable(name: &str) -> bool {
    !HOP_BY_HOP_HEADERS
        .iter()
        .any(|hop| hop.eq_ignore_ascii_case(name))
}

/// Live network fetcher using reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkFetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, DomainError> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            DomainError::validation(format!("Invalid method '{}': {}", request.method, e))
        })?;

        let mut builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            if is_forwardable(name) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::network(&request.url, format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| is_forwardable(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            DomainError::network(&request.url, format!("Failed to read body: {}", e))
        })?;

        Ok(AssetResponse {
            status,
            headers,
            body,
            url: request.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_status_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html>hello</html>", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/index.html", server.uri());
        let response = HttpFetcher::new()
            .fetch(&AssetRequest::get(&url))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.body.as_ref(), b"<html>hello</html>");
        assert_eq!(response.url, url);
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.js"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let response = HttpFetcher::new()
            .fetch(&AssetRequest::get(format!("{}/missing.js", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.body.as_ref(), b"not found");
    }

    #[tokio::test]
    async fn test_forwards_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets"))
            .and(header("x-request-id", "abc"))
            .and(body_string("{\"seats\":2}"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let request = AssetRequest::new("POST", format!("{}/api/tickets", server.uri()))
            .with_header("x-request-id", "abc")
            .with_header("connection", "keep-alive")
            .with_body("{\"seats\":2}");

        let response = HttpFetcher::new().fetch(&request).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let url = format!("http://127.0.0.1:{}/index.html", port);

        let result = HttpFetcher::with_timeout(Duration::from_secs(2))
            .unwrap()
            .fetch(&AssetRequest::get(&url))
            .await;

        assert!(matches!(result, Err(ref e) if e.is_network()));
    }

    #[tokio::test]
    async fn test_invalid_method_is_rejected() {
        let result = HttpFetcher::new()
            .fetch(&AssetRequest::new("BAD METHOD", "http://127.0.0.1:9/"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_hop_by_hop_headers_are_filtered() {
        assert!(!is_forwardable("Connection"));
        assert!(!is_forwardable("transfer-encoding"));
        assert!(!is_forwardable("Host"));
        assert!(is_forwardable("content-type"));
        assert!(is_forwardable("etag"));
    }
}
