// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community listing of published plans.

use crate::error::{AppError, Result};
use crate::models::Plan;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_LIMIT: u32 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/community-plans", get(list_community_plans))
}

#[derive(Debug, Deserialize)]
struct CommunityQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Plans per page
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    12
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CommunityPlansResponse {
    pub plans: Vec<Plan>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: i64,
    pub has_more: bool,
}

/// Validate paging parameters and turn them into `(limit, offset)`.
fn page_window(page: u32, limit: u32) -> Result<(i64, i64)> {
    if page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    if limit < 1 || limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "Limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let offset = (page as i64 - 1) * limit as i64;
    Ok((limit as i64, offset))
}

/// Page through published plans, newest first.
async fn list_community_plans(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<CommunityQuery>, QueryRejection>,
) -> Result<Json<CommunityPlansResponse>> {
    let Query(params) = query?;
    let (limit, offset) = page_window(params.page, params.limit)?;

    tracing::debug!(page = params.page, limit, "Fetching community plans");

    let page = state.db.list_published_plans(limit, offset).await?;
    let has_more = offset + (page.plans.len() as i64) < page.total;

    Ok(Json(CommunityPlansResponse {
        plans: page.plans,
        total: page.total,
        has_more,
    }))
}
