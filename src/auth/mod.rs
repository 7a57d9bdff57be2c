// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password hashing, RS256 bearer tokens and the gate protecting per-user
//! routes.
//!
//! ## Auth Flow
//!
//! 1. `POST /login` checks the password against the stored bcrypt hash
//! 2. On success the server signs a token with claims `{"id": <user id>}`
//! 3. Clients send `Authorization: Bearer <token>`
//! 4. The gate:
//!    - Verifies the header `alg` and the RSA signature
//!    - Looks the user up once by primary key
//!    - Stores `AuthenticatedUser` in request extensions
//!
//! ## Security
//!
//! - Every gate failure returns the same 403 body
//! - Tokens are stateless; there is no revocation list
//! - Tokens only expire when a lifetime is configured

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::{extract_claims, Auth};
pub use middleware::{authenticate, require_auth};
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use tokens::TokenService;
