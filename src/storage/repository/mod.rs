// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the diet database.
//!
//! Each repository borrows the [`DietDatabase`](super::DietDatabase) and
//! provides the operations for a single entity type.

pub mod food_items;
pub mod foods;
pub mod users;

pub use food_items::FoodItemRepository;
pub use foods::FoodRepository;
pub use users::{normalize_email, NewUser, StoredUser, UserRepository, EMAIL_NOT_AVAILABLE};
