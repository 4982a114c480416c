// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod categories;
pub mod config;
pub mod expenses;
pub mod exporter;
pub mod groups;
pub mod importer;
pub mod reports;
pub mod rules;
pub mod users;

use anyhow::Result;
use rusqlite::Connection;

use crate::engine::{access, scope};
use crate::models::{Scope, User};

/// Resolve the acting user (from the global `--user` flag) and the scope
/// their records live in. Group membership wins over the personal scope.
pub(crate) fn acting_context(conn: &Connection, m: &clap::ArgMatches) -> Result<(User, Scope)> {
    let email = m.get_one::<String>("user").map(|s| s.as_str());
    let user = access::authenticate(conn, email)?;
    let scope = scope::resolve_scope(conn, user.id)?;
    Ok((user, scope))
}
