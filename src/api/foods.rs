// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public food catalog endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::{FoodPathId, NumericId};
use crate::{error::ApiError, models::Food, state::AppState, storage::FoodRepository};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FoodQuery {
    /// Case-insensitive substring of the food name. Omit to list everything.
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/food",
    params(FoodQuery),
    tag = "Foods",
    responses((status = 200, body = [Food]))
)]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodQuery>,
) -> Result<Json<Vec<Food>>, ApiError> {
    let foods = FoodRepository::new(&state.db).search(query.name.as_deref().unwrap_or(""))?;
    Ok(Json(foods))
}

#[utoipa::path(
    get,
    path = "/food/{id}",
    params(("id" = u64, Path, description = "Identifier of the food")),
    tag = "Foods",
    responses(
        (status = 200, body = Food),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_food(
    NumericId(id): FoodPathId,
    State(state): State<AppState>,
) -> Result<Json<Food>, ApiError> {
    FoodRepository::new(&state.db)
        .get(id)?
        .map(Json)
        .ok_or_else(FoodPathId::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewFood;
    use crate::state::test_support::test_state;
    use axum::http::StatusCode;

    fn seed(state: &AppState) {
        FoodRepository::new(&state.db)
            .seed(&[
                NewFood {
                    name: "Tomato Sauce".into(),
                    calories: 34,
                    portion: 100,
                },
                NewFood {
                    name: "Bread".into(),
                    calories: 265,
                    portion: 100,
                },
            ])
            .unwrap();
    }

    #[tokio::test]
    async fn list_filters_by_name() {
        let (state, _dir) = test_state();
        seed(&state);

        let Json(all) = list_foods(State(state.clone()), Query(FoodQuery::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let Json(found) = list_foods(
            State(state),
            Query(FoodQuery {
                name: Some("tomato".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Tomato Sauce");
    }

    #[tokio::test]
    async fn get_food_by_id() {
        let (state, _dir) = test_state();
        seed(&state);

        let Json(food) = get_food(NumericId(2), State(state)).await.unwrap();
        assert_eq!(food.name, "Bread");
    }

    #[tokio::test]
    async fn unknown_food_is_not_found() {
        let (state, _dir) = test_state();
        let err = get_food(NumericId(9), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Not Found");
    }
}
