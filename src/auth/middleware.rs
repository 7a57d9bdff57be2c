// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Apply to a router subtree with `route_layer` so unmatched paths still
//! answer 404 instead of 403:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/user", get(get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extract_claims, AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::UserRepository;

/// Resolve the request's identity: verify the bearer token, then confirm
/// the user still exists with a single primary-key lookup.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
    let claims = extract_claims(headers, &state.tokens)?;

    match UserRepository::new(&state.db).get(claims.id) {
        Ok(Some(user)) => Ok(AuthenticatedUser { user_id: user.id }),
        Ok(None) => Err(AuthError::UserNotFound),
        Err(e) => {
            tracing::error!(error = %e, user_id = %claims.id, "user lookup failed during authentication");
            Err(AuthError::UserNotFound)
        }
    }
}

/// Gate middleware. Rejected requests never reach the inner service.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()) {
        Ok(user) => {
            // Add authenticated user to request extensions
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), "authentication rejected");
            e.into_response()
        }
    }
}
