// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup and login.

use axum::{extract::State, http::StatusCode, Json};

use super::extract::ValidatedJson;
use crate::{
    auth::MAX_PASSWORD_BYTES,
    error::ApiError,
    models::{Credentials, SignupRequest, TokenResponse, User},
    state::AppState,
    storage::{NewUser, UserRepository},
};

/// Body of every failed login, whether the email or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Run bcrypt work on the blocking pool so it does not hold up a runtime
/// worker.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "password task failed");
        ApiError::internal("Internal server error")
    })
}

fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("The field '{field}' is required")));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    tag = "Accounts",
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require("email", &request.email)?;
    require("first_name", &request.first_name)?;
    require("last_name", &request.last_name)?;
    require("password", &request.password)?;
    if request.password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::bad_request(format!(
            "The password must be at most {MAX_PASSWORD_BYTES} bytes long"
        )));
    }

    let passwords = state.passwords.clone();
    let password = request.password;
    let password_hash = run_blocking(move || passwords.hash(&password)).await??;

    let user = UserRepository::new(&state.db).create(NewUser {
        email: &request.email,
        first_name: request.first_name.trim(),
        last_name: request.last_name.trim(),
        password_hash: &password_hash,
    })?;

    Ok((StatusCode::CREATED, Json(user.to_user())))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    tag = "Accounts",
    responses(
        (status = 200, description = "Signed bearer token", body = TokenResponse),
        (status = 400, description = "Body is not valid credentials JSON"),
        (status = 403, description = "Invalid credentials"),
        (status = 500, description = "Token could not be issued")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let candidate = match UserRepository::new(&state.db).find_by_email(&credentials.email) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "login lookup failed");
            None
        }
    };

    // Unknown emails still pay for one bcrypt verification
    let passwords = state.passwords.clone();
    let password = credentials.password;
    let user = run_blocking(move || match candidate {
        Some(user) => passwords
            .verify(&password, &user.password_hash)
            .then_some(user),
        None => {
            passwords.verify_decoy(&password);
            None
        }
    })
    .await?;

    let Some(user) = user else {
        tracing::debug!("login rejected");
        return Err(ApiError::forbidden(INVALID_CREDENTIALS));
    };

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(Json(TokenResponse { token }))
}
