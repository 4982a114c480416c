// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::collections::{HashMap, hash_map::Entry};

use crate::engine::{access, scope};
use crate::models::Scope;
use crate::store;
use crate::utils::{apply_category_rules, parse_date, parse_decimal};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => import_expenses(conn, sub),
        _ => Ok(()),
    }
}

/// Bank CSV layout: date, description, amount, optional category name.
/// Rows without a category fall back to the regex rules; still-unmatched
/// rows abort the whole import so a partial file never lands.
fn import_expenses(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").map(|s| s.as_str());
    let user = access::authenticate(conn, email)?;
    let owner = scope::resolve_scope(conn, user.id)?;

    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let description = rec.get(1).context("description missing")?.trim();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let category = rec.get(3).unwrap_or("").trim();

        let date =
            parse_date(date_raw).with_context(|| format!("Invalid date '{}'", date_raw))?;
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' for '{}'", amount_raw, description))?;

        let category_id = if category.is_empty() {
            apply_category_rules(&tx, description)?
                .ok_or_else(|| anyhow!("No rule matched '{}' and no category given", description))?
        } else {
            match category_cache.entry(category.to_string()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = store::category_id_by_name(&tx, owner, category)?;
                    *entry.insert(fetched)
                }
            }
        };

        insert_expense(&tx, owner, &amount.to_string(), description, &date.to_string(), category_id)?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} expense(s) from {}", imported, path);
    Ok(())
}

fn insert_expense(
    tx: &Connection,
    owner: Scope,
    amount: &str,
    description: &str,
    occurred_on: &str,
    category_id: i64,
) -> Result<()> {
    tx.execute(
        &format!(
            "INSERT INTO expenses(amount, description, occurred_on, category_id, {})
             VALUES (?1,?2,?3,?4,?5)",
            owner.column()
        ),
        params![amount, description, occurred_on, category_id, owner.id()],
    )?;
    Ok(())
}
