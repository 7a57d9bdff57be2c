// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with bcrypt.

use std::sync::Arc;

use super::AuthError;

/// bcrypt only reads the first 72 bytes of its input. Longer passwords are
/// rejected at signup instead of being silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted bcrypt hasher with a configurable cost.
///
/// Holds a decoy hash at the same cost so that a login for an unknown email
/// spends as long in bcrypt as one with a wrong password.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    decoy: Arc<str>,
}

impl PasswordHasher {
    /// Build a hasher for `cost`, computing the decoy hash once.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let decoy = bcrypt::hash("relational-diet-decoy", cost)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Self {
            cost,
            decoy: decoy.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Check `plaintext` against a stored hash. A malformed hash never
    /// matches.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// Run a full verification against the decoy hash. Used when there is
    /// no stored hash to check; the outcome is discarded.
    pub fn verify_decoy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.decoy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let hash = hasher().hash("correct horse").unwrap();
        assert!(hasher().verify("correct horse", &hash));
        assert!(!hasher().verify("wrong horse", &hash));
    }

    #[test]
    fn salts_differ_between_calls() {
        let a = hasher().hash("same").unwrap();
        let b = hasher().hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher().verify("same", &a));
        assert!(hasher().verify("same", &b));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!hasher().verify("anything", "not-a-bcrypt-hash"));
        assert!(!hasher().verify("anything", ""));
    }

    #[test]
    fn decoy_is_a_real_hash_at_the_configured_cost() {
        for cost in [4, 6] {
            let hasher = PasswordHasher::new(cost).unwrap();
            let parts: bcrypt::HashParts = hasher.decoy.parse().unwrap();
            assert_eq!(parts.get_cost(), cost);
            assert!(hasher.verify("relational-diet-decoy", &hasher.decoy));
        }
    }

    #[test]
    fn invalid_cost_is_rejected_up_front() {
        assert!(matches!(
            PasswordHasher::new(2),
            Err(AuthError::PasswordHash(_))
        ));
    }
}
