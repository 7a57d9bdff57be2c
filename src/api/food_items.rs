// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Food log endpoints. All of them sit behind the gate and only ever touch
//! the caller's own items.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::{FoodItemPathId, NumericId, ValidatedJson};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateFoodItemRequest, FoodItem, JoinedFoodItem, UpdateFoodItemRequest},
    state::AppState,
    storage::{FoodItemRepository, StoreError},
};

pub const BAD_TIMESTAMP: &str = "The timestamp query string is formatted badly";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DayQuery {
    /// RFC 3339 start of the window; defaults to today 00:00 UTC.
    pub timestamp: Option<String>,
}

fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn parse_window_start(raw: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    match raw {
        None => Ok(start_of_today()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| ApiError::bad_request(BAD_TIMESTAMP)),
    }
}

fn require_quantity(quantity: u64) -> Result<(), ApiError> {
    if quantity == 0 {
        return Err(ApiError::bad_request("The field 'quantity' is required"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/user/food",
    params(DayQuery),
    tag = "Food Items",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Items logged within one day of `timestamp`", body = [JoinedFoodItem]),
        (status = 400, description = "The timestamp query string is formatted badly"),
        (status = 403, description = "Authentication failed")
    )
)]
pub async fn list_food_items(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<JoinedFoodItem>>, ApiError> {
    let from = parse_window_start(query.timestamp.as_deref())?;
    let to = from + Duration::days(1);
    let items = FoodItemRepository::new(&state.db).list_for_user_between(user.user_id, from, to)?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/user/food/{id}",
    params(("id" = u64, Path, description = "Identifier of the food item")),
    tag = "Food Items",
    security(("bearer" = [])),
    responses(
        (status = 200, body = JoinedFoodItem),
        (status = 403, description = "Authentication failed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_food_item(
    Auth(user): Auth,
    NumericId(id): FoodItemPathId,
    State(state): State<AppState>,
) -> Result<Json<JoinedFoodItem>, ApiError> {
    let item = FoodItemRepository::new(&state.db).get_owned(id, user.user_id)?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/user/food",
    request_body = CreateFoodItemRequest,
    tag = "Food Items",
    security(("bearer" = [])),
    responses(
        (status = 201, body = FoodItem),
        (status = 400, description = "Missing field or unknown food"),
        (status = 403, description = "Authentication failed")
    )
)]
pub async fn create_food_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFoodItemRequest>,
) -> Result<(StatusCode, Json<FoodItem>), ApiError> {
    if request.food_id == 0 {
        return Err(ApiError::bad_request("The field 'food_id' is required"));
    }
    require_quantity(request.quantity)?;

    let item = FoodItemRepository::new(&state.db)
        .create(user.user_id, request.food_id, request.quantity, request.timestamp)
        .map_err(|e| match e {
            StoreError::NotFound(_) => {
                ApiError::bad_request(format!("The food {} does not exist", request.food_id))
            }
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/user/food/{id}",
    params(("id" = u64, Path, description = "Identifier of the food item")),
    request_body = UpdateFoodItemRequest,
    tag = "Food Items",
    security(("bearer" = [])),
    responses(
        (status = 200, body = FoodItem),
        (status = 400, description = "Missing field"),
        (status = 403, description = "Authentication failed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_food_item(
    Auth(user): Auth,
    NumericId(id): FoodItemPathId,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateFoodItemRequest>,
) -> Result<Json<FoodItem>, ApiError> {
    require_quantity(request.quantity)?;
    let item = FoodItemRepository::new(&state.db).update_owned(
        id,
        user.user_id,
        request.quantity,
        request.timestamp,
    )?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/user/food/{id}",
    params(("id" = u64, Path, description = "Identifier of the food item")),
    tag = "Food Items",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Authentication failed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_food_item(
    Auth(user): Auth,
    NumericId(id): FoodItemPathId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    FoodItemRepository::new(&state.db).delete_owned(id, user.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::models::{NewFood, UserId};
    use crate::state::test_support::test_state;
    use crate::storage::FoodRepository;
    use chrono::TimeZone;

    fn auth(id: u64) -> Auth {
        Auth(AuthenticatedUser {
            user_id: UserId(id),
        })
    }

    fn seed_food(state: &AppState) -> u64 {
        FoodRepository::new(&state.db)
            .create(&NewFood {
                name: "Apple".into(),
                calories: 52,
                portion: 100,
            })
            .unwrap()
            .id
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    async fn create(state: &AppState, user: u64, food_id: u64, ts: DateTime<Utc>) -> FoodItem {
        let (_, Json(item)) = create_food_item(
            auth(user),
            State(state.clone()),
            ValidatedJson(CreateFoodItemRequest {
                food_id,
                quantity: 2,
                timestamp: ts,
            }),
        )
        .await
        .unwrap();
        item
    }

    #[test]
    fn window_start_parses_rfc3339_and_defaults_to_midnight() {
        let parsed = parse_window_start(Some("2024-05-02T10:00:00+02:00")).unwrap();
        assert_eq!(parsed, at(2, 8));

        let default = parse_window_start(None).unwrap();
        assert_eq!(default.time(), NaiveTime::MIN);

        let err = parse_window_start(Some("yesterday")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, BAD_TIMESTAMP);
    }

    #[tokio::test]
    async fn create_assigns_caller_as_owner() {
        let (state, _dir) = test_state();
        let food_id = seed_food(&state);
        let item = create(&state, 3, food_id, at(1, 9)).await;
        assert_eq!(item.user_id, UserId(3));
        assert_eq!(item.food_id, food_id);
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let (state, _dir) = test_state();
        let food_id = seed_food(&state);

        for (food_id, quantity) in [(0, 1), (food_id, 0), (999, 1)] {
            let err = create_food_item(
                auth(1),
                State(state.clone()),
                ValidatedJson(CreateFoodItemRequest {
                    food_id,
                    quantity,
                    timestamp: at(1, 9),
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{food_id}/{quantity}");
        }
    }

    #[tokio::test]
    async fn list_returns_one_day_window() {
        let (state, _dir) = test_state();
        let food_id = seed_food(&state);
        let inside = create(&state, 1, food_id, at(2, 9)).await;
        create(&state, 1, food_id, at(4, 9)).await;

        let Json(items) = list_food_items(
            auth(1),
            State(state),
            Query(DayQuery {
                timestamp: Some("2024-05-02T00:00:00Z".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, inside.id);
        assert_eq!(items[0].name, "Apple");
    }

    #[tokio::test]
    async fn foreign_items_are_not_found() {
        let (state, _dir) = test_state();
        let food_id = seed_food(&state);
        let item = create(&state, 1, food_id, at(1, 9)).await;

        let err = get_food_item(auth(2), NumericId(item.id), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Not found");

        let err = delete_food_item(auth(2), NumericId(item.id), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = update_food_item(
            auth(2),
            NumericId(item.id),
            State(state),
            ValidatedJson(UpdateFoodItemRequest {
                quantity: 9,
                timestamp: at(1, 10),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_then_delete() {
        let (state, _dir) = test_state();
        let food_id = seed_food(&state);
        let item = create(&state, 1, food_id, at(1, 9)).await;

        let Json(updated) = update_food_item(
            auth(1),
            NumericId(item.id),
            State(state.clone()),
            ValidatedJson(UpdateFoodItemRequest {
                quantity: 9,
                timestamp: at(1, 10),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.quantity, 9);
        assert_eq!(updated.timestamp, at(1, 10));

        let status = delete_food_item(auth(1), NumericId(item.id), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_food_item(auth(1), NumericId(item.id), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
