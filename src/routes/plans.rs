// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan routes.
//!
//! `GET /api/plans/{planId}` is reachable without a session in public mode,
//! so this router is mounted without the auth middleware and each handler
//! asks for the user it needs.

use crate::error::{AppError, Result};
use crate::ids::require_well_formed;
use crate::middleware::OptionalAuthUser;
use crate::models::{NewPlan, Plan, PlanUpdate};
use crate::routes::SuccessResponse;
use crate::services::plan_access::{self, PlanAccess};
use crate::services::AuthUser;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", get(list_plans).post(create_plan))
        .route(
            "/api/plans/{plan_id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanEnvelope {
    pub plan: Plan,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlansResponse {
    pub plans: Vec<Plan>,
}

#[derive(Debug, Deserialize)]
struct PlanQuery {
    /// Restrict to published plans, no session needed
    #[serde(default)]
    public: bool,
}

/// List the caller's own plans.
async fn list_plans(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<PlansResponse>> {
    let plans = state.db.list_plans_for_user(&user.user_id).await?;
    Ok(Json(PlansResponse { plans }))
}

/// Create a plan owned by the caller.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: std::result::Result<Json<NewPlan>, JsonRejection>,
) -> Result<(StatusCode, Json<PlanEnvelope>)> {
    let Json(new_plan) = payload?;
    new_plan.validate()?;

    let plan = state.db.create_plan(&user.user_id, &new_plan).await?;
    tracing::info!(plan_id = %plan.id, user_id = %user.user_id, "Plan created");

    Ok((StatusCode::CREATED, Json(PlanEnvelope { plan })))
}

/// Fetch one plan.
///
/// With `?public=true` only published plans are returned and no session is
/// needed. Otherwise the caller must be signed in and sees their own plans
/// plus published ones.
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
    query: std::result::Result<Query<PlanQuery>, QueryRejection>,
    OptionalAuthUser(auth): OptionalAuthUser,
) -> Result<Json<PlanEnvelope>> {
    require_well_formed("planId", &plan_id)?;
    let Query(query) = query?;

    let plan = if query.public {
        plan_access::get_plan(&state.db, &plan_id, PlanAccess::Public).await?
    } else {
        let auth = auth.ok_or(AppError::Unauthorized)?;
        plan_access::get_plan(
            &state.db,
            &plan_id,
            PlanAccess::Member {
                user_id: &auth.user_id,
            },
        )
        .await?
    };

    Ok(Json(PlanEnvelope { plan }))
}

/// Owner update of title, destination, content or publication flag.
async fn update_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(plan_id): Path<String>,
    payload: std::result::Result<Json<PlanUpdate>, JsonRejection>,
) -> Result<Json<PlanEnvelope>> {
    require_well_formed("planId", &plan_id)?;
    let Json(update) = payload?;
    update.validate()?;
    if update.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let plan = state
        .db
        .update_plan(&plan_id, &user.user_id, &update)
        .await?
        .ok_or_else(AppError::plan_not_visible)?;

    tracing::info!(
        plan_id = %plan.id,
        is_published = plan.is_published,
        "Plan updated"
    );
    Ok(Json(PlanEnvelope { plan }))
}

/// Owner delete; the store cascades to the plan's expenses.
async fn delete_plan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    require_well_formed("planId", &plan_id)?;

    if !state.db.delete_plan(&plan_id, &user.user_id).await? {
        return Err(AppError::plan_not_visible());
    }

    tracing::info!(plan_id = %plan_id, user_id = %user.user_id, "Plan deleted");
    Ok(SuccessResponse::ok())
}
