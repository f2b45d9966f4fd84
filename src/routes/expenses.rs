// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense routes. Mounted behind `require_auth`; every operation is scoped
//! to plans the caller owns.

use crate::error::{AppError, Result};
use crate::ids::{is_well_formed, require_well_formed};
use crate::models::{Expense, ExpenseSummary, NewExpense};
use crate::routes::SuccessResponse;
use crate::services::plan_access;
use crate::services::AuthUser;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Upper bound on ids accepted by one bulk delete.
const MAX_BULK_DELETE: usize = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/plans/expenses/delete-multiple",
            post(delete_multiple),
        )
        .route(
            "/api/plans/{plan_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/api/plans/{plan_id}/expenses/{expense_id}",
            delete(delete_expense),
        )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpensesResponse {
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub count: usize,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpenseEnvelope {
    pub expense: Expense,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMultipleRequest {
    ids: Vec<String>,
}

/// Check a bulk-delete id list before anything reaches the store.
fn validate_delete_ids(ids: &[String]) -> Result<()> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("No expense ids provided".to_string()));
    }
    if ids.len() > MAX_BULK_DELETE {
        return Err(AppError::BadRequest(format!(
            "At most {} expense ids per request",
            MAX_BULK_DELETE
        )));
    }
    if let Some(bad) = ids.iter().position(|id| !is_well_formed(id)) {
        return Err(AppError::BadRequest(format!("Invalid expense id at index {}", bad)));
    }
    Ok(())
}

/// List a plan's expenses with their total.
async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> Result<Json<ExpensesResponse>> {
    require_well_formed("planId", &plan_id)?;
    plan_access::get_owned_plan(&state.db, &plan_id, &user.user_id).await?;

    let expenses = state.db.list_expenses_for_plan(&plan_id).await?;
    let summary = ExpenseSummary::from_expenses(&expenses);

    Ok(Json(ExpensesResponse {
        expenses,
        total: summary.total,
        count: summary.count,
    }))
}

/// Record an expense against a plan.
async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<String>,
    payload: std::result::Result<Json<NewExpense>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseEnvelope>)> {
    require_well_formed("planId", &plan_id)?;
    let Json(new_expense) = payload?;
    new_expense.validate()?;

    plan_access::get_owned_plan(&state.db, &plan_id, &user.user_id).await?;
    let expense = state.db.create_expense(&plan_id, &new_expense).await?;

    tracing::debug!(expense_id = %expense.id, plan_id = %plan_id, "Expense created");
    Ok((StatusCode::CREATED, Json(ExpenseEnvelope { expense })))
}

/// Delete one expense of a plan.
async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((plan_id, expense_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    require_well_formed("planId", &plan_id)?;
    require_well_formed("expenseId", &expense_id)?;

    plan_access::get_owned_plan(&state.db, &plan_id, &user.user_id).await?;
    if !state.db.delete_expense(&plan_id, &expense_id).await? {
        return Err(AppError::NotFound("Expense not found".to_string()));
    }

    Ok(SuccessResponse::ok())
}

/// Delete several expenses in one statement.
///
/// Ids outside the caller's plans, or already gone, are skipped silently;
/// the response does not report how many rows were removed.
async fn delete_multiple(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<DeleteMultipleRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let Json(req) = payload?;
    validate_delete_ids(&req.ids)?;

    let deleted = state.db.delete_expenses(&req.ids, &user.user_id).await?;
    tracing::info!(
        user_id = %user.user_id,
        requested = req.ids.len(),
        deleted,
        "Deleted expenses"
    );

    Ok(SuccessResponse::ok())
}
