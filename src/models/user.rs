// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Full user row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string; never leaves the server
    pub password_hash: String,
    /// Plan-generation credits granted to the user
    pub credits: i32,
    /// Credits already spent
    pub credits_used: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user at signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User profile safe to send to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub credits: i32,
    pub credits_used: i32,
    pub created_at: DateTime<Utc>,
}

/// Credit counters for `/api/users`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserCredits {
    pub id: String,
    pub credits: i32,
    pub credits_used: i32,
}

impl User {
    /// Project into the client-facing profile (drops the password hash).
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            credits: self.credits,
            credits_used: self.credits_used,
            created_at: self.created_at,
        }
    }
}
