// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather lookup for a destination.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_PLACE_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/weather", get(get_weather))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    place: Option<String>,
}

async fn get_weather(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(query) = query?;
    let place = query
        .place
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'place'".to_string()))?;

    if place.chars().count() > MAX_PLACE_LEN {
        return Err(AppError::BadRequest("'place' is too long".to_string()));
    }

    tracing::debug!(place, "Fetching weather");
    Ok(Json(state.weather.current(place).await?))
}
