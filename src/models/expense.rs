// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense model: a monetary entry scoped to exactly one plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Expense {
    pub id: String,
    pub plan_id: String,
    pub amount: f64,
    pub label: String,
    pub category: Option<String>,
    pub spent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/plans/{planId}/expenses`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    /// Defaults to now
    pub spent_at: Option<DateTime<Utc>>,
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount"))
    }
}

/// Totals over one plan's expenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
}

impl ExpenseSummary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            total: expenses.iter().map(|e| e.amount).sum(),
            count: expenses.len(),
        }
    }
}
