// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

use crate::engine::access;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("add-member", sub)) => add_member(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn acting_user_id(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let email = sub.get_one::<String>("user").map(|s| s.as_str());
    Ok(access::authenticate(conn, email)?.id)
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let owner_id = acting_user_id(conn, sub)?;
    let id = store::create_group(conn, name, owner_id)?;
    // Owners are members too, so their records land in the group scope.
    store::add_group_member(conn, id, owner_id)?;
    println!("Created group '{}' (id {})", name, id);
    Ok(())
}

fn add_member(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group = sub.get_one::<String>("group").unwrap();
    let email = sub.get_one::<String>("email").unwrap();
    let group_id = store::group_id_by_name(conn, group)?;
    let member = store::find_user_by_email(conn, email)?
        .ok_or_else(|| anyhow!("No user with email '{}'", email))?;
    store::add_group_member(conn, group_id, member.id)?;
    println!("Added '{}' to group '{}'", email, group);
    Ok(())
}

#[derive(Serialize)]
struct GroupRow {
    id: i64,
    name: String,
    members: usize,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = acting_user_id(conn, sub)?;
    let data: Vec<GroupRow> = store::find_groups_for(conn, user_id)?
        .into_iter()
        .map(|g| GroupRow {
            id: g.id,
            name: g.name,
            members: g.members.len(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| vec![g.id.to_string(), g.name.clone(), g.members.to_string()])
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Members"], rows));
    }
    Ok(())
}
