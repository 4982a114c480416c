// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tier policy: the single capability gate used by every report surface.

use rusqlite::Connection;

use crate::error::ApiError;
use crate::models::{Tier, User};
use crate::store;

/// Access holds iff the caller's tier ranks at or above the requirement.
pub fn has_access(user_tier: Tier, required: Tier) -> bool {
    user_tier.rank() >= required.rank()
}

/// Gate a feature behind a tier. Checked before any aggregation runs.
pub fn require_tier(user: &User, required: Tier) -> Result<(), ApiError> {
    if has_access(user.tier, required) {
        Ok(())
    } else {
        Err(ApiError::InsufficientTier {
            required,
            actual: user.tier,
        })
    }
}

/// Resolve the caller identity. A missing identity is distinct from an
/// unknown one: the former is a 401-class failure, the latter 404.
pub fn authenticate(conn: &Connection, email: Option<&str>) -> Result<User, ApiError> {
    let email = email.ok_or(ApiError::Unauthenticated)?;
    store::find_user_by_email(conn, email)?
        .ok_or_else(|| ApiError::NotFound(format!("user '{}'", email)))
}
