// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body returned by the gate for every rejected request.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Body returned when a token cannot be minted during login.
pub const TOKEN_ISSUANCE_FAILED: &str = "It was not possible to issue a token";

/// Body returned when a password cannot be hashed.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Authentication error type.
///
/// The variants are distinct for logging and tests. Over HTTP every
/// request-side failure collapses into the same 403 response, so a client
/// cannot tell a bad signature from an unknown user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing header, non-UTF-8 value, or not exactly `<scheme> <token>`
    #[error("authorization header is missing or malformed")]
    MalformedAuthHeader,

    /// Token cannot be decoded or its claims do not have the expected shape
    #[error("token is malformed")]
    MalformedToken,

    /// Header `alg` is not one of RS256, RS384, RS512
    #[error("token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    TokenExpired,

    /// Key material could not be parsed
    #[error("key could not be loaded: {0}")]
    KeyLoad(String),

    #[error("token could not be signed: {0}")]
    Signing(String),

    /// Valid token whose user no longer exists
    #[error("user referenced by the token does not exist")]
    UserNotFound,

    #[error("password could not be hashed: {0}")]
    PasswordHash(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Get the error code for this error, used in log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedAuthHeader => "malformed_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnexpectedAlgorithm => "unexpected_algorithm",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::KeyLoad(_) => "key_load",
            AuthError::Signing(_) => "signing",
            AuthError::UserNotFound => "user_not_found",
            AuthError::PasswordHash(_) => "password_hash",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        if self.is_server_side() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::FORBIDDEN
        }
    }

    fn is_server_side(&self) -> bool {
        matches!(
            self,
            AuthError::KeyLoad(_) | AuthError::Signing(_) | AuthError::PasswordHash(_)
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let error = self.public_message();
        (self.status_code(), Json(AuthErrorBody { error })).into_response()
    }
}

impl AuthError {
    /// Log server-side failures and pick the body shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::PasswordHash(_) => {
                tracing::error!(error_code = self.error_code(), error = %self, "password hashing failed");
                INTERNAL_ERROR
            }
            AuthError::KeyLoad(_) | AuthError::Signing(_) => {
                tracing::error!(error_code = self.error_code(), error = %self, "token issuance failed");
                TOKEN_ISSUANCE_FAILED
            }
            _ => AUTHENTICATION_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AuthError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body_bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn request_side_errors_share_one_response() {
        let expected = (
            StatusCode::FORBIDDEN,
            r#"{"error":"Authentication failed"}"#.to_string(),
        );
        for err in [
            AuthError::MalformedAuthHeader,
            AuthError::MalformedToken,
            AuthError::UnexpectedAlgorithm,
            AuthError::SignatureInvalid,
            AuthError::TokenExpired,
            AuthError::UserNotFound,
        ] {
            assert_eq!(body_of(err).await, expected);
        }
    }

    #[tokio::test]
    async fn issuance_errors_return_500() {
        let (status, body) = body_of(AuthError::Signing("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"It was not possible to issue a token"}"#);

        let (status, _) = body_of(AuthError::KeyLoad("bad pem".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn hashing_failure_is_not_reported_as_token_issuance() {
        let (status, body) = body_of(AuthError::PasswordHash("bad cost".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AuthError::SignatureInvalid.error_code(), "signature_invalid");
        assert_eq!(AuthError::UnexpectedAlgorithm.error_code(), "unexpected_algorithm");
    }
}
