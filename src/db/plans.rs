// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan operations.

use super::{db_err, Db};
use crate::error::AppError;
use crate::ids::new_id;
use crate::models::{NewPlan, Plan, PlanUpdate};

const PLAN_COLUMNS: &str =
    "id, user_id, title, destination, content, is_published, created_at, updated_at";

/// One page of published plans plus the total number published.
#[derive(Debug, Clone)]
pub struct PublishedPage {
    pub plans: Vec<Plan>,
    pub total: i64,
}

#[derive(sqlx::FromRow)]
struct PublishedRow {
    #[sqlx(flatten)]
    plan: Plan,
    total_count: i64,
}

impl Db {
    /// Get a plan by id with no visibility filter.
    ///
    /// Callers must run the result through `plan_access::authorize`.
    pub async fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>, AppError> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
            .bind(plan_id)
            .fetch_optional(self.pool()?)
            .await
            .map_err(db_err)
    }

    /// Get a plan only if it is published.
    pub async fn get_published_plan(&self, plan_id: &str) -> Result<Option<Plan>, AppError> {
        sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1 AND is_published = TRUE"
        ))
        .bind(plan_id)
        .fetch_optional(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// All plans owned by a user, most recently updated first.
    pub async fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>, AppError> {
        sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// Create a plan owned by `user_id`.
    pub async fn create_plan(&self, user_id: &str, plan: &NewPlan) -> Result<Plan, AppError> {
        sqlx::query_as::<_, Plan>(&format!(
            "INSERT INTO plans (id, user_id, title, destination, content, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(new_id())
        .bind(user_id)
        .bind(&plan.title)
        .bind(&plan.destination)
        .bind(&plan.content)
        .bind(plan.is_published)
        .fetch_one(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// Apply an update to a plan owned by `user_id`.
    ///
    /// Returns `None` when the plan does not exist or belongs to someone else.
    pub async fn update_plan(
        &self,
        plan_id: &str,
        user_id: &str,
        update: &PlanUpdate,
    ) -> Result<Option<Plan>, AppError> {
        sqlx::query_as::<_, Plan>(&format!(
            "UPDATE plans SET \
                 title = COALESCE($3, title), \
                 destination = CASE WHEN $4 THEN $5 ELSE destination END, \
                 content = COALESCE($6, content), \
                 is_published = COALESCE($7, is_published), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(user_id)
        .bind(&update.title)
        .bind(update.destination.is_some())
        .bind(update.destination.clone().flatten())
        .bind(&update.content)
        .bind(update.is_published)
        .fetch_optional(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// Delete a plan owned by `user_id`; its expenses go with it.
    ///
    /// Returns whether a row was removed.
    pub async fn delete_plan(&self, plan_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(self.pool()?)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    /// Page through published plans, newest first.
    ///
    /// `total` is the number of published plans, whichever page is asked for.
    /// A page past the end costs a second statement to count them.
    pub async fn list_published_plans(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<PublishedPage, AppError> {
        let rows = sqlx::query_as::<_, PublishedRow>(&format!(
            "SELECT {PLAN_COLUMNS}, \
                 (SELECT COUNT(*) FROM plans WHERE is_published = TRUE) AS total_count \
             FROM plans WHERE is_published = TRUE \
             ORDER BY created_at DESC, id \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool()?)
        .await
        .map_err(db_err)?;

        let total = match rows.first() {
            Some(row) => row.total_count,
            None if offset == 0 => 0,
            None => self.count_published_plans().await?,
        };
        Ok(PublishedPage {
            plans: rows.into_iter().map(|r| r.plan).collect(),
            total,
        })
    }

    /// Number of published plans.
    pub async fn count_published_plans(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plans WHERE is_published = TRUE")
            .fetch_one(self.pool()?)
            .await
            .map_err(db_err)
    }
}
