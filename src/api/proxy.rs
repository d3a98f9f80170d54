//! Fallback handler routing every request through the interceptor

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};
use url::Url;

use crate::domain::cache::{AssetRequest, AssetResponse};
use crate::domain::DomainError;

use super::state::AppState;

const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Answers every non-reserved request, from cache or network.
///
/// A failed network fetch becomes an empty 502; no substitute content is served.
pub async fn intercept(State(state): State<AppState>, request: Request) -> Response {
    let asset_request = match to_asset_request(&state.origin, request).await {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match state.lifecycle.on_fetch(&asset_request).await {
        Ok(intercepted) => to_http_response(intercepted.response),
        Err(e) => {
            warn!(url = %asset_request.url, error = %e, "resource load failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// Maps an incoming path and query onto the upstream origin
pub fn upstream_url(origin: &Url, uri: &Uri) -> Result<Url, DomainError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    // "./" keeps segments such as "a:b" from being read as a scheme
    let relative = format!("./{}", path_and_query.trim_start_matches('/'));

    origin
        .join(&relative)
        .map_err(|e| DomainError::validation(format!("Invalid request path '{}': {}", uri, e)))
}

async fn to_asset_request(origin: &Url, request: Request) -> Result<AssetRequest, DomainError> {
    let (parts, body) = request.into_parts();
    let url = upstream_url(origin, &parts.uri)?;

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = to_bytes(body, MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|e| DomainError::validation(format!("Failed to read request body: {}", e)))?;

    Ok(AssetRequest {
        method: parts.method.as_str().to_string(),
        url: url.to_string(),
        headers,
        body,
    })
}

fn to_http_response(response: AssetResponse) -> Response {
    let Ok(status) = StatusCode::from_u16(response.status) else {
        warn!(status = response.status, url = %response.url, "invalid response status");
        return StatusCode::BAD_GATEWAY.into_response();
    };

    let mut builder = Response::builder().status(status);

    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => builder = builder.header(name, value),
            _ => debug!(header = %name, "dropping invalid response header"),
        }
    }

    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}
