// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod expense;
pub mod feedback;
pub mod plan;
pub mod user;

pub use expense::{Expense, ExpenseSummary, NewExpense};
pub use feedback::{Feedback, NewFeedback};
pub use plan::{NewPlan, Plan, PlanUpdate};
pub use user::{NewUser, User, UserCredits, UserProfile};
