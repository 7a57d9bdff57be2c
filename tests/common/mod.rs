// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use relational_diet_server::{
    api::router,
    auth::{PasswordHasher, TokenService},
    models::NewFood,
    state::AppState,
    storage::{DietDatabase, FoodRepository},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PRIMARY_KEY: &str = include_str!("../fixtures/keys/primary.key");
pub const PRIMARY_PUB: &str = include_str!("../fixtures/keys/primary.pub");
pub const SECONDARY_KEY: &str = include_str!("../fixtures/keys/secondary.key");
pub const SECONDARY_PUB: &str = include_str!("../fixtures/keys/secondary.pub");

/// A router over a throwaway database. Keep `_dir` alive while using it.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = DietDatabase::open(&dir.path().join("diet.redb")).unwrap();
        FoodRepository::new(&db)
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
        let tokens = TokenService::from_pem(PRIMARY_KEY, PRIMARY_PUB).unwrap();
        let state = AppState::new(db, tokens, PasswordHasher::new(4).unwrap());
        Self {
            router: router(state.clone()),
            state,
            _dir: dir,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send_request(builder.body(body).unwrap()).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Sign up and log in, returning `(user_id, token)`.
    pub async fn register(&self, email: &str, password: &str) -> (u64, String) {
        let (status, user) = self
            .send(
                "POST",
                "/signup",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "first_name": "Joe",
                    "last_name": "Doe",
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");

        let (status, body) = self
            .send(
                "POST",
                "/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        (
            user["id"].as_u64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}
