// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback submission.

use crate::error::Result;
use crate::ids::require_well_formed;
use crate::models::{Feedback, NewFeedback};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/feedback", post(submit_feedback))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeedbackEnvelope {
    pub feedback: Feedback,
}

async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewFeedback>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackEnvelope>)> {
    let Json(feedback) = payload?;
    feedback.validate()?;
    if let Some(plan_id) = &feedback.plan_id {
        require_well_formed("planId", plan_id)?;
    }

    let feedback = state.db.create_feedback(&feedback).await?;
    tracing::info!(
        feedback_id = %feedback.id,
        label = %feedback.label,
        "Feedback received"
    );

    Ok((StatusCode::CREATED, Json(FeedbackEnvelope { feedback })))
}
