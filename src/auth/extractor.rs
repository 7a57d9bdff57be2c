// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and the `Auth` extractor.
//!
//! Use the `Auth` extractor in handlers behind the gate:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{middleware::authenticate, AuthError, AuthenticatedUser, Claims, TokenService};
use crate::state::AppState;

/// Read `Authorization: <scheme> <token>` and verify the token.
///
/// The value must split on a single space into exactly two fields. The
/// scheme word itself is not inspected.
pub fn extract_claims(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MalformedAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    let mut fields = value.split(' ');
    let token = match (fields.next(), fields.next(), fields.next()) {
        (Some(_scheme), Some(token), None) => token,
        _ => return Err(AuthError::MalformedAuthHeader),
    };

    tokens.verify(token)
}

/// Extractor for the authenticated user.
///
/// Reads the identity the gate stored in request extensions. Used on a route
/// without the gate, it runs the same authentication itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_current_user(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<User>, ApiError> {
///     // user.user_id is known to exist
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().copied() {
            return Ok(Auth(user));
        }

        let user = authenticate(state, &parts.headers)?;
        Ok(Auth(user))
    }
}
