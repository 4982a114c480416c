// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Tier;
use thiserror::Error;

/// User-visible failure classes. Enrichment failures (delegated anomaly or
/// forecast calls) never appear here: they degrade to empty results at the
/// advisor boundary and the primary report still succeeds.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no caller identity provided")]
    Unauthenticated,

    #[error("requires the {required:?} tier (caller is {actual:?})")]
    InsufficientTier { required: Tier, actual: Tier },

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("record store failure: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl ApiError {
    /// HTTP status class the hosting API layer maps this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::InsufficientTier { .. } => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRange(_) => 400,
            ApiError::Conflict(_) => 409,
            ApiError::Persistence(_) => 500,
        }
    }
}
