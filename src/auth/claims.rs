// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Claims carried by an access token.
///
/// The user id travels under the key `"id"`. `exp` is only present when the
/// server is configured with a token lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    pub fn new(id: UserId) -> Self {
        Self { id, exp: None }
    }
}

/// Authenticated user information resolved by the gate.
///
/// Only constructed after the token verified and the user row was found, so
/// handlers can trust `user_id` without another lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}
