// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense operations, always scoped to a single plan or to the plans of one owner.

use super::{db_err, Db};
use crate::error::AppError;
use crate::ids::new_id;
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str = "id, plan_id, amount, label, category, spent_at, created_at";

impl Db {
    /// All expenses of one plan, most recent first.
    pub async fn list_expenses_for_plan(&self, plan_id: &str) -> Result<Vec<Expense>, AppError> {
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE plan_id = $1 \
             ORDER BY spent_at DESC, id"
        ))
        .bind(plan_id)
        .fetch_all(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// Record an expense against a plan.
    pub async fn create_expense(
        &self,
        plan_id: &str,
        expense: &NewExpense,
    ) -> Result<Expense, AppError> {
        let spent_at = expense.spent_at.unwrap_or_else(chrono::Utc::now);

        sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses (id, plan_id, amount, label, category, spent_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(new_id())
        .bind(plan_id)
        .bind(expense.amount)
        .bind(&expense.label)
        .bind(&expense.category)
        .bind(spent_at)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| {
            // Plan deleted between the ownership check and the insert.
            if let sqlx::Error::Database(db) = &e {
                if db.is_foreign_key_violation() {
                    return AppError::plan_not_visible();
                }
            }
            db_err(e)
        })
    }

    /// Delete one expense of a plan. Returns whether a row was removed.
    pub async fn delete_expense(&self, plan_id: &str, expense_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND plan_id = $2")
            .bind(expense_id)
            .bind(plan_id)
            .execute(self.pool()?)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every listed expense that belongs to a plan owned by `owner_id`.
    ///
    /// One statement: either all matching rows go or none do. Ids that no
    /// longer exist are ignored, so repeating a request is a no-op.
    pub async fn delete_expenses(&self, ids: &[String], owner_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM expenses e USING plans p \
             WHERE e.plan_id = p.id AND p.user_id = $2 AND e.id = ANY($1)",
        )
        .bind(ids)
        .bind(owner_id)
        .execute(self.pool()?)
        .await
        .map_err(db_err)?;

        tracing::debug!(
            requested = ids.len(),
            deleted = result.rows_affected(),
            "Bulk expense delete"
        );
        Ok(result.rows_affected())
    }
}
