// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;
pub mod plan_access;
pub mod session;
pub mod weather;

pub use plan_access::PlanAccess;
pub use session::{AuthUser, SessionService};
pub use weather::WeatherService;
