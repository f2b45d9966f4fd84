// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session tokens: HS256 JWTs carrying the user id, with a fixed lifetime.
//!
//! Tokens travel in the `auth-token` HTTP-only cookie, or as a bearer token in
//! the `Authorization` header for non-browser clients.

use crate::config::Config;
use crate::error::AppError;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "auth-token";

/// Longest session lifetime accepted, in days.
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from a session token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl SessionService {
    pub fn new(signing_key: &[u8], ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            ttl_secs: ttl_days.clamp(1, MAX_SESSION_TTL_DAYS) as u64 * 24 * 60 * 60,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.session_signing_key, config.session_ttl_days)
    }

    /// Token lifetime, also used as the cookie `Max-Age`.
    pub fn ttl(&self) -> time::Duration {
        time::Duration::seconds(self.ttl_secs as i64)
    }

    /// Create a session token for a user.
    pub fn issue(&self, user_id: &str) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now as usize,
            exp: (now + self.ttl_secs) as usize,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::InvalidToken
        })?;

        if data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(data.claims)
    }

    /// Resolve the acting user from the session cookie or bearer header.
    ///
    /// The cookie is tried first; a cookie that fails verification falls
    /// through to the bearer header. No token is `Unauthorized`; no valid
    /// token is `InvalidToken`.
    pub fn authenticate(&self, jar: &CookieJar, headers: &HeaderMap) -> Result<AuthUser, AppError> {
        let cookie = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        let bearer = bearer_token(headers);
        if cookie.is_none() && bearer.is_none() {
            return Err(AppError::Unauthorized);
        }

        let claims = cookie
            .into_iter()
            .chain(bearer)
            .find_map(|token| self.verify(&token).ok())
            .ok_or(AppError::InvalidToken)?;
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
