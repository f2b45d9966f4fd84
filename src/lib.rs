// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip Planner: plan trips, track what they cost, share them with the community.
//!
//! This crate provides the backend API: accounts and sessions, plan storage
//! with owner/public visibility, plan-scoped expense tracking, feedback and a
//! weather lookup for destinations.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{SessionService, WeatherService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub sessions: SessionService,
    pub weather: WeatherService,
}
