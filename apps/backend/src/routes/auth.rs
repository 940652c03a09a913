//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::{ApiError, Result};
use crate::AppState;

/// Header carrying the shared secret
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// The configured password, kept only as a digest
#[derive(Clone)]
pub struct AccessKey {
    digest: [u8; 32],
}

impl AccessKey {
    pub fn new(password: &str) -> Self {
        Self {
            digest: Self::hash(password),
        }
    }

    /// Compares SHA-256 digests byte by byte without an early exit.
    pub fn verify(&self, token: &str) -> bool {
        digests_match(&Self::hash(token), &self.digest)
    }

    fn hash(value: &str) -> [u8; 32] {
        Sha256::digest(value.as_bytes()).into()
    }
}

fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessKey(..)")
    }
}

/// Auth middleware - rejects requests whose x-access-token does not match
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Missing access token");
            ApiError::Forbidden("missing access token".to_string())
        })?;

    if !state.access.verify(token) {
        tracing::warn!(path = %request.uri().path(), "Wrong access token");
        return Err(ApiError::Forbidden("wrong password".to_string()));
    }

    Ok(next.run(request).await)
}
