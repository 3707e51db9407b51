use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use rackipam_core::error::Error;
use tracing::error;

use crate::AppState;

/// Convert an internal error into a generic 500 response, logging the real error.
pub fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    error!("internal error: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}

/// Map a store or service error onto the HTTP status a client can act on.
/// Anything unexpected is masked through [`internal_error`].
pub fn error_response(e: Error) -> (StatusCode, String) {
    match e {
        Error::SubnetNotFound(_) | Error::VlanNotFound(_) | Error::IpNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        Error::DuplicateSubnet(_)
        | Error::DuplicateVlan(_)
        | Error::DuplicateIp(_)
        | Error::SubnetOverlap { .. }
        | Error::AddressUnavailable(_) => (StatusCode::CONFLICT, e.to_string()),
        Error::InvalidCidr(_) | Error::InvalidVlanNumber(_) | Error::AddressOutOfRange { .. } => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        other => internal_error(other),
    }
}

/// Middleware: enforce API key authentication when configured.
/// Skips auth for the health endpoint.
pub async fn api_key_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected_key = match &state.api_key {
        Some(key) => key,
        None => return Ok(next.run(request).await),
    };

    if request.uri().path() == "/api/v1/health" {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == expected_key.as_str() => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Pagination query parameters for list endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

impl Pagination {
    /// Apply pagination to a Vec. A subnet can hold 4096 records, so the
    /// page size is capped there.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.min(rackipam_cidr::FULL_ENUMERATION_LIMIT as usize);
        items.into_iter().skip(self.offset).take(limit).collect()
    }
}
