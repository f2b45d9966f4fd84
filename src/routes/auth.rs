// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: signup, signin, signout and the current-user probe.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuthUser;
use crate::models::{NewUser, User, UserProfile};
use crate::services::password::{hash_password, verify_password};
use crate::services::session::SESSION_COOKIE;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/signout", post(signout))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserEnvelope {
    pub user: Option<UserProfile>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Session cookie with the attributes shared by set and clear.
fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure())
        .build()
}

fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar> {
    let token = state
        .sessions
        .issue(&user.id)
        .map_err(|e| AppError::Internal(e.context("session token creation failed")))?;

    let mut cookie = session_cookie(&state.config, token);
    cookie.set_max_age(state.sessions.ttl());
    Ok(jar.add(cookie))
}

/// Current user, or `{"user": null}`. Never fails: a broken session or a
/// store error both read as "signed out".
async fn me(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(auth): OptionalAuthUser,
) -> Json<UserEnvelope> {
    let Some(auth) = auth else {
        return Json(UserEnvelope { user: None });
    };

    let user = match state.db.get_user(&auth.user_id).await {
        Ok(user) => user.map(|u| u.profile()),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %auth.user_id, "Session user lookup failed");
            None
        }
    };

    Json(UserEnvelope { user })
}

/// Create an account and sign it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<UserEnvelope>)> {
    let Json(req) = payload?;
    req.validate()?;

    let email = normalize_email(&req.email);
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = state
        .db
        .create_user(&NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    let jar = start_session(&state, jar, &user)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserEnvelope {
            user: Some(user.profile()),
        }),
    ))
}

/// Verify credentials and start a session.
async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<SigninRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserEnvelope>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .db
        .find_user_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        tracing::info!(user_id = %user.id, "Sign-in rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let jar = start_session(&state, jar, &user)?;
    Ok((
        jar,
        Json(UserEnvelope {
            user: Some(user.profile()),
        }),
    ))
}

/// Clear the session cookie.
async fn signout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(session_cookie(&state.config, String::new()));
    (
        jar,
        Json(MessageResponse {
            message: "Signed out".to_string(),
        }),
    )
}
