// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::storage::DietDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DietDatabase>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(db: DietDatabase, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            passwords,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::auth::tokens::tests::{PRIMARY_KEY, PRIMARY_PUB};

    /// State backed by a fresh on-disk database and the fixture key pair.
    /// Keep the returned directory alive for the duration of the test.
    pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
        test_state_with_cost(4)
    }

    /// Like [`test_state`] with an explicit bcrypt cost.
    pub(crate) fn test_state_with_cost(cost: u32) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = DietDatabase::open(&dir.path().join("test.redb")).unwrap();
        let tokens = TokenService::from_pem(PRIMARY_KEY, PRIMARY_PUB).unwrap();
        let passwords = PasswordHasher::new(cost).unwrap();
        (AppState::new(db, tokens, passwords), dir)
    }
}
