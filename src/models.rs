// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. Every type derives
//! `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Users**: signup payload, login credentials, public user view
//! - **Foods**: the shared catalog
//! - **Food Items**: personal consumption entries and the joined read model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Identifiers
// =============================================================================

/// Primary key of a user, and the value of the `id` token claim.
///
/// Deserialization accepts any JSON number that is a non-negative integer,
/// including integral floats such as `1.0`, so tokens minted by clients that
/// encode numbers as doubles still resolve to the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        UserId(value)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UserIdVisitor)
    }
}

struct UserIdVisitor;

impl Visitor<'_> for UserIdVisitor {
    type Value = UserId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer user id")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<UserId, E> {
        Ok(UserId(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<UserId, E> {
        u64::try_from(value)
            .map(UserId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<UserId, E> {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
            Ok(UserId(value as u64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }
}

pub type FoodId = u64;
pub type FoodItemId = u64;

// =============================================================================
// User Models
// =============================================================================

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Plaintext password; hashed before storage and never echoed back.
    pub password: String,
}

/// Login credentials.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// RS256-signed bearer token.
    pub token: String,
}

/// A user as returned by the API. The password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

// =============================================================================
// Food Models
// =============================================================================

/// An entry of the shared food catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    /// Calories per portion.
    pub calories: i64,
    /// Portion size in grams.
    pub portion: i64,
}

/// A catalog entry to be inserted (seed files use this shape).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NewFood {
    pub name: String,
    pub calories: i64,
    pub portion: i64,
}

// =============================================================================
// Food Item Models
// =============================================================================

/// A logged consumption entry owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FoodItem {
    pub id: FoodItemId,
    pub user_id: UserId,
    pub food_id: FoodId,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}

/// A food item joined with its catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct JoinedFoodItem {
    pub id: FoodItemId,
    pub user_id: UserId,
    pub food_id: FoodId,
    pub name: String,
    pub calories: i64,
    pub portion: i64,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}

impl JoinedFoodItem {
    pub fn new(item: FoodItem, food: &Food) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            food_id: item.food_id,
            name: food.name.clone(),
            calories: food.calories,
            portion: food.portion,
            quantity: item.quantity,
            timestamp: item.timestamp,
        }
    }
}

/// Request to log a food item for the authenticated user.
///
/// The owner is always the caller; any `user_id` in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFoodItemRequest {
    pub food_id: FoodId,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}

/// Request to change quantity and time of an existing food item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateFoodItemRequest {
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}
