// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User operations.

use super::{db_err, Db};
use crate::error::AppError;
use crate::ids::new_id;
use crate::models::{NewUser, User, UserCredits};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, credits, credits_used, created_at";

impl Db {
    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(self.pool()?)
            .await
            .map_err(db_err)
    }

    /// Get a user by email (case-insensitive).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(self.pool()?)
        .await
        .map_err(db_err)
    }

    /// Insert a new user.
    ///
    /// A concurrent signup that wins the race trips the unique email
    /// constraint; that surfaces as `Conflict`, same as the existence check.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict("Email already registered".to_string());
                }
            }
            db_err(e)
        })
    }

    /// Get the credit counters for a user.
    pub async fn get_user_credits(&self, user_id: &str) -> Result<Option<UserCredits>, AppError> {
        sqlx::query_as::<_, UserCredits>(
            "SELECT id, credits, credits_used FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool()?)
        .await
        .map_err(db_err)
    }
}
