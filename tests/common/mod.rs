// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::response::Response;
use std::sync::Arc;
use trip_planner::config::Config;
use trip_planner::db::Db;
use trip_planner::routes::create_router;
use trip_planner::services::{SessionService, WeatherService};
use trip_planner::AppState;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database and apply migrations.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
    let db = Db::connect(&url, 5)
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to apply migrations");
    db
}

/// Build the router around a given database handle.
#[allow(dead_code)]
pub fn create_test_app_with(db: Db, config: Config) -> (axum::Router, Arc<AppState>) {
    let sessions = SessionService::from_config(&config);
    let weather = WeatherService::new(&config).expect("weather client");

    let state = Arc::new(AppState {
        config,
        db,
        sessions,
        weather,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an offline database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Db::new_mock(), Config::test_default())
}

/// Offline test app whose cookies follow the given frontend URL.
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with(Db::new_mock(), config)
}

/// Session token for `user_id` signed with the app's key.
#[allow(dead_code)]
pub fn create_test_token(state: &AppState, user_id: &str) -> String {
    state.sessions.issue(user_id).expect("token")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
