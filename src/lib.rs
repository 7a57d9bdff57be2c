// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Diet - Diet Tracking API Service
//!
//! Users sign up with email and password, browse a shared food catalog and
//! keep a personal log of what they ate. Requests to per-user routes carry
//! an RS256-signed bearer token.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, tokens and the authentication gate
//! - `config` - Environment configuration
//! - `storage` - Embedded database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
