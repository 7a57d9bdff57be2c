// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        CreateFoodItemRequest, Credentials, Food, FoodItem, JoinedFoodItem, SignupRequest,
        TokenResponse, UpdateFoodItemRequest, User, UserId,
    },
    state::AppState,
};

pub mod accounts;
pub mod extract;
pub mod food_items;
pub mod foods;
pub mod health;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    // Per-user routes; the gate runs only for paths that matched here
    let protected = Router::new()
        .route("/user", get(users::get_current_user))
        .route(
            "/user/food",
            get(food_items::list_food_items).post(food_items::create_food_item),
        )
        .route(
            "/user/food/{id}",
            get(food_items::get_food_item)
                .put(food_items::update_food_item)
                .delete(food_items::delete_food_item),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public = Router::new()
        .route("/login", post(accounts::login))
        .route("/signup", post(accounts::signup))
        .route("/food", get(foods::list_foods))
        .route("/food/{id}", get(foods::get_food))
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by the gated paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::signup,
        accounts::login,
        users::get_current_user,
        foods::list_foods,
        foods::get_food,
        food_items::list_food_items,
        food_items::get_food_item,
        food_items::create_food_item,
        food_items::update_food_item,
        food_items::delete_food_item,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            UserId,
            User,
            SignupRequest,
            Credentials,
            TokenResponse,
            Food,
            FoodItem,
            JoinedFoodItem,
            CreateFoodItemRequest,
            UpdateFoodItemRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Signup and login"),
        (name = "Users", description = "Current user profile"),
        (name = "Foods", description = "Shared food catalog"),
        (name = "Food Items", description = "Personal food log"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewFood;
    use crate::state::test_support::test_state;
    use crate::storage::FoodRepository;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn every_registered_route_is_reachable() {
        let (state, _dir) = test_state();
        let food = FoodRepository::new(&state.db)
            .create(&NewFood {
                name: "Apple".into(),
                calories: 52,
                portion: 100,
            })
            .unwrap();
        let app = router(state);
        let food_uri = format!("/food/{}", food.id);

        let cases = [
            ("POST", "/login", StatusCode::BAD_REQUEST),
            ("POST", "/signup", StatusCode::BAD_REQUEST),
            ("GET", "/food", StatusCode::OK),
            ("GET", food_uri.as_str(), StatusCode::OK),
            ("GET", "/health", StatusCode::OK),
            ("GET", "/health/ready", StatusCode::OK),
            ("GET", "/api-doc/openapi.json", StatusCode::OK),
            // Gated routes answer 403 only when they matched
            ("GET", "/user", StatusCode::FORBIDDEN),
            ("GET", "/user/food", StatusCode::FORBIDDEN),
            ("POST", "/user/food", StatusCode::FORBIDDEN),
            ("GET", "/user/food/1", StatusCode::FORBIDDEN),
            ("PUT", "/user/food/1", StatusCode::FORBIDDEN),
            ("DELETE", "/user/food/1", StatusCode::FORBIDDEN),
        ];
        for (method, uri, expected) in cases {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{method} {uri}");
        }
    }

    #[test]
    fn openapi_declares_bearer_scheme_and_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["components"]["securitySchemes"]["bearer"].is_object());
        for path in ["/login", "/signup", "/user", "/food/{id}", "/user/food/{id}"] {
            assert!(json["paths"][path].is_object(), "{path}");
        }
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn unknown_paths_are_404_not_403() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(Request::builder().uri("/user/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
