// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip plan model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A user-owned travel itinerary, optionally published for the community.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Plan {
    pub id: String,
    /// Owner
    pub user_id: String,
    pub title: String,
    pub destination: Option<String>,
    /// Free-form itinerary body
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub content: serde_json::Value,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/plans`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 200))]
    pub destination: Option<String>,
    #[serde(default = "empty_content")]
    pub content: serde_json::Value,
    #[serde(default)]
    pub is_published: bool,
}

/// Body of `PUT /api/plans/{planId}`. Absent fields are left unchanged.
///
/// `destination` distinguishes absent (`None`) from an explicit `null`
/// (`Some(None)`), which clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 200))]
    pub destination: Option<Option<String>>,
    pub content: Option<serde_json::Value>,
    pub is_published: Option<bool>,
}

impl PlanUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.destination.is_none()
            && self.content.is_none()
            && self.is_published.is_none()
    }
}

fn empty_content() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// A field that is present in the body, possibly as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
