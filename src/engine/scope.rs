// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Scope resolver: individual vs shared-group data visibility.

use rusqlite::Connection;

use crate::error::ApiError;
use crate::models::Scope;
use crate::store;

/// Resolve the query scope for a user. Membership in any group shifts the
/// scope to that group's shared pool; the lowest-id group wins when the user
/// belongs to several. Resolution runs on every request so membership
/// changes take effect immediately.
pub fn resolve_scope(conn: &Connection, user_id: i64) -> Result<Scope, ApiError> {
    let groups = store::find_groups_for(conn, user_id)?;
    Ok(match groups.first() {
        Some(g) => Scope::Group(g.id),
        None => Scope::User(user_id),
    })
}
