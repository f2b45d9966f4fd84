// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback operations (insert only).

use super::{db_err, Db};
use crate::error::AppError;
use crate::ids::new_id;
use crate::models::{Feedback, NewFeedback};

impl Db {
    /// Store a feedback entry.
    pub async fn create_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, AppError> {
        sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedback (id, plan_id, label, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, plan_id, label, message, created_at",
        )
        .bind(new_id())
        .bind(&feedback.plan_id)
        .bind(&feedback.label)
        .bind(&feedback.message)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_foreign_key_violation() {
                    return AppError::BadRequest("Unknown 'planId'".to_string());
                }
            }
            db_err(e)
        })
    }
}
