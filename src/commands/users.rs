// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::models::Tier;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("set-tier", sub)) => set_tier(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_tier(s: &str) -> Result<Tier> {
    match Tier::parse(s) {
        Some(t) => Ok(t),
        None => bail!("Unknown tier '{}', expected free|premium|business", s),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let tier = parse_tier(sub.get_one::<String>("tier").unwrap())?;
    let id = store::create_user(conn, email, tier)?;
    println!("Added user '{}' (id {}, tier {})", email, id, tier.as_str());
    Ok(())
}

fn set_tier(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let tier = parse_tier(sub.get_one::<String>("tier").unwrap())?;
    store::set_user_tier(conn, email, tier)?;
    println!("User '{}' is now on the {} tier", email, tier.as_str());
    Ok(())
}

#[derive(Serialize)]
struct UserRow {
    email: String,
    tier: String,
    verified: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<UserRow> = store::list_users(conn)?
        .into_iter()
        .map(|u| UserRow {
            email: u.email,
            tier: u.tier.as_str().to_string(),
            verified: u.email_verified,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|u| {
                vec![
                    u.email.clone(),
                    u.tier.clone(),
                    if u.verified { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Email", "Tier", "Verified"], rows));
    }
    Ok(())
}
