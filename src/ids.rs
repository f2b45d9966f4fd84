// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row identifiers.
//!
//! Identifiers are opaque text. New rows get a UUIDv4; anything supplied by a
//! client must be 1-64 characters of `[A-Za-z0-9_-]`.

use crate::error::AppError;

const MAX_ID_LEN: usize = 64;

/// Generate a fresh identifier for a new row.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether a client-supplied identifier is well-formed.
pub fn is_well_formed(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Reject a malformed identifier with a 400 naming the offending field.
pub fn require_well_formed(field: &str, id: &str) -> Result<(), AppError> {
    if is_well_formed(id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid '{}'", field)))
    }
}
