// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users, the food catalog and food items, kept in a
//! single embedded redb file under the configured data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   diet.redb    # all tables, see `database` for the layout
//! ```
//!
//! ## Important Notes
//!
//! - Password hashes live only in the `users` table and never leave this module
//!   except through `UserRepository::find_by_email` for login verification
//! - Food items are always read through an ownership check

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{DietDatabase, StoreError, StoreResult};
pub use ownership::{OwnedResource, OwnershipCheck};
pub use repository::{
    FoodItemRepository, FoodRepository, NewUser, StoredUser, UserRepository, EMAIL_NOT_AVAILABLE,
};
