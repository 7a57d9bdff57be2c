// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors that reject with the API's `{"error": ...}` body.

use std::ops::Deref;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor whose rejections are 400 responses in the API's
/// error shape instead of axum's plain-text ones.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                tracing::debug!(error = %message, "rejected request body");
                Err(ApiError::bad_request(message))
            }
        }
    }
}

/// Numeric `{id}` path segment. Anything that is not a `u64` cannot name an
/// existing row, so it is answered with the route's not-found message.
#[derive(Debug, Clone, Copy)]
pub struct NumericId<const FOOD_CATALOG: bool>(pub u64);

/// `{id}` of a catalog food; not-found body is `"Not Found"`.
pub type FoodPathId = NumericId<true>;
/// `{id}` of a food item; not-found body is `"Not found"`.
pub type FoodItemPathId = NumericId<false>;

pub const FOOD_NOT_FOUND: &str = "Not Found";
pub const FOOD_ITEM_NOT_FOUND: &str = "Not found";

impl<const FOOD_CATALOG: bool> NumericId<FOOD_CATALOG> {
    pub fn not_found() -> ApiError {
        ApiError::not_found(if FOOD_CATALOG {
            FOOD_NOT_FOUND
        } else {
            FOOD_ITEM_NOT_FOUND
        })
    }
}

impl<S, const FOOD_CATALOG: bool> FromRequestParts<S> for NumericId<FOOD_CATALOG>
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Self::not_found())?;
        raw.parse::<u64>()
            .map(NumericId)
            .map_err(|_| Self::not_found())
    }
}
