// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware and extractors.

use crate::error::AppError;
use crate::services::AuthUser;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use std::sync::Arc;

/// Middleware that requires a valid session.
///
/// Inserts the [`AuthUser`] into request extensions for the handler.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = state.sessions.authenticate(&jar, request.headers())?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for handlers on routes without the middleware that still need a user.
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        state.sessions.authenticate(&jar, &parts.headers)
    }
}

/// The acting user if the request carries a valid session, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<Arc<AppState>> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
