// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User credit lookup.

use crate::error::{AppError, Result};
use crate::ids::require_well_formed;
use crate::models::UserCredits;
use crate::services::AuthUser;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", get(get_user_credits))
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    id: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserCreditsEnvelope {
    pub user: UserCredits,
}

/// Credits for the signed-in user. Other users' ids read as not found.
async fn get_user_credits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserCreditsEnvelope>> {
    let Query(query) = query?;
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("Missing 'id'".to_string()))?;
    require_well_formed("id", &id)?;

    if id != user.user_id {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let credits = state
        .db
        .get_user_credits(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserCreditsEnvelope { user: credits }))
}
