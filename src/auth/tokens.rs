// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 token issuing and verification.
//!
//! ## Key Material
//!
//! Keys are given as PEM. A value holding only the base64 body (as is common
//! when keys are passed through environment variables) is framed with the
//! `RSA PRIVATE KEY` / `PUBLIC KEY` labels before parsing. Literal `\n`
//! sequences are accepted as line breaks.
//!
//! ## Verification
//!
//! The header `alg` is checked before anything else and must be one of
//! RS256, RS384 or RS512. This rejects `none` and HMAC tokens forged with
//! the public key as secret.

use std::time::Duration;

use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::Deserialize;

use super::{AuthError, Claims};
use crate::models::UserId;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Signs and verifies access tokens with an RSA key pair.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build the service from PEM (or bare base64 body) key material.
    ///
    /// A probe token is signed and verified so that unusable keys, including
    /// a private key that does not match the public key, fail here instead
    /// of on the first login.
    pub fn from_pem(private_key: &str, public_key: &str) -> Result<Self, AuthError> {
        let private_pem = frame_pem(private_key, PRIVATE_KEY_LABEL)?;
        let public_pem = frame_pem(public_key, PUBLIC_KEY_LABEL)?;

        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| AuthError::KeyLoad(format!("private key: {e}")))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| AuthError::KeyLoad(format!("public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let service = Self {
            encoding,
            decoding,
            validation,
            ttl: None,
        };

        let probe = service
            .issue(UserId(0))
            .map_err(|e| AuthError::KeyLoad(format!("private key unusable: {e}")))?;
        service.verify(&probe).map_err(|e| match e {
            AuthError::SignatureInvalid => {
                AuthError::KeyLoad("private and public keys do not match".to_string())
            }
            other => AuthError::KeyLoad(format!("public key unusable: {other}")),
        })?;

        Ok(service)
    }

    /// Issue tokens carrying an `exp` claim `ttl` from now.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign a token for `user_id`.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let claims = Claims {
            id: user_id,
            exp: self
                .ttl
                .map(|ttl| get_current_timestamp().saturating_add(ttl.as_secs())),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        check_algorithm(token)?;

        let token_data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    #[serde(default)]
    alg: Option<String>,
}

/// Inspect the header `alg` before handing the token to `jsonwebtoken`,
/// which cannot represent `none` and would report it as a parse error.
fn check_algorithm(token: &str) -> Result<(), AuthError> {
    let (header_b64, _) = token.split_once('.').ok_or(AuthError::MalformedToken)?;
    let header_json =
        Base64UrlUnpadded::decode_vec(header_b64).map_err(|_| AuthError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&header_json).map_err(|_| AuthError::MalformedToken)?;

    match header.alg.as_deref() {
        Some("RS256" | "RS384" | "RS512") => Ok(()),
        _ => Err(AuthError::UnexpectedAlgorithm),
    }
}

/// Normalize configured key material into a PEM document.
fn frame_pem(value: &str, label: &str) -> Result<String, AuthError> {
    let value = value.replace("\\n", "\n");
    let value = value.trim();

    if value.starts_with("-----BEGIN") {
        let parsed = pem::parse(value).map_err(|e| AuthError::KeyLoad(e.to_string()))?;
        return Ok(pem::encode(&parsed));
    }

    let body: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if body.is_empty() {
        return Err(AuthError::KeyLoad(format!("{label} is empty")));
    }
    let der = Base64::decode_vec(&body)
        .map_err(|_| AuthError::KeyLoad(format!("{label} body is not valid base64")))?;
    Ok(pem::encode(&pem::Pem::new(label, der)))
}
