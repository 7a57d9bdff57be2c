// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::User,
    state::AppState,
    storage::UserRepository,
};

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = User),
        (status = 403, description = "Authentication failed"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let stored = UserRepository::new(&state.db)
        .get(user.user_id)?
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    Ok(Json(stored.to_user()))
}
