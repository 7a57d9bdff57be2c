// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for per-user records.
//!
//! A record owned by someone else is reported exactly like a missing one,
//! so callers cannot probe for the existence of other users' data.

use crate::models::{FoodItem, UserId};

use super::{StoreError, StoreResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner(&self) -> UserId;
}

impl OwnedResource for FoodItem {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// Verify ownership and return the resource if the caller owns it.
pub trait OwnershipCheck<T> {
    /// `what` names the resource in the resulting `NotFound` error.
    fn verify_owner(self, user_id: UserId, what: &str) -> StoreResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, user_id: UserId, what: &str) -> StoreResult<T> {
        match self {
            Some(resource) if resource.owner() == user_id => Ok(resource),
            _ => Err(StoreError::NotFound(what.to_string())),
        }
    }
}

impl<T: OwnedResource> OwnershipCheck<T> for StoreResult<Option<T>> {
    fn verify_owner(self, user_id: UserId, what: &str) -> StoreResult<T> {
        self?.verify_owner(user_id, what)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: UserId,
    }

    impl OwnedResource for TestResource {
        fn owner(&self) -> UserId {
            self.owner
        }
    }

    #[test]
    fn ownership_check_passes_for_owner() {
        let option = Some(TestResource { owner: UserId(1) });
        assert!(option.verify_owner(UserId(1), "Food item 1").is_ok());
    }

    #[test]
    fn non_owner_sees_not_found() {
        let option = Some(TestResource { owner: UserId(1) });
        let result = option.verify_owner(UserId(2), "Food item 1");
        assert!(matches!(result, Err(StoreError::NotFound(ref what)) if what == "Food item 1"));
    }

    #[test]
    fn missing_resource_is_not_found() {
        let option: Option<TestResource> = None;
        let result = option.verify_owner(UserId(1), "Food item 9");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn store_errors_pass_through() {
        let result: StoreResult<Option<TestResource>> = Err(StoreError::Corrupt("x".into()));
        assert!(matches!(
            result.verify_owner(UserId(1), "Food item 1"),
            Err(StoreError::Corrupt(_))
        ));
    }
}
