// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan visibility.
//!
//! A plan is readable by its owner, or by anyone once published. Every
//! rejection is the same 404 so private plans cannot be probed for.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::Plan;

/// How a plan is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAccess<'a> {
    /// Anonymous community view: published plans only.
    Public,
    /// A signed-in user: their own plans, plus anything published.
    Member { user_id: &'a str },
}

/// Whether `access` may read `plan`.
pub fn authorize(plan: &Plan, access: PlanAccess<'_>) -> bool {
    match access {
        PlanAccess::Public => plan.is_published,
        PlanAccess::Member { user_id } => plan.is_published || is_owner(plan, user_id),
    }
}

pub fn is_owner(plan: &Plan, user_id: &str) -> bool {
    plan.user_id == user_id
}

/// Owner-only precondition for anything that touches a plan's expenses or
/// changes the plan itself. Published plans get no exemption.
pub fn require_owner(plan: &Plan, user_id: &str) -> Result<()> {
    if is_owner(plan, user_id) {
        Ok(())
    } else {
        Err(AppError::plan_not_visible())
    }
}

/// Fetch a plan if `access` may read it.
pub async fn get_plan(db: &Db, plan_id: &str, access: PlanAccess<'_>) -> Result<Plan> {
    let plan = match access {
        PlanAccess::Public => db.get_published_plan(plan_id).await?,
        PlanAccess::Member { .. } => db.get_plan(plan_id).await?,
    };

    match plan {
        Some(plan) if authorize(&plan, access) => Ok(plan),
        _ => {
            tracing::debug!(plan_id, ?access, "Plan not visible");
            Err(AppError::plan_not_visible())
        }
    }
}

/// Fetch a plan that `user_id` owns.
pub async fn get_owned_plan(db: &Db, plan_id: &str, user_id: &str) -> Result<Plan> {
    let plan = db
        .get_plan(plan_id)
        .await?
        .ok_or_else(AppError::plan_not_visible)?;
    require_owner(&plan, user_id)?;
    Ok(plan)
}
