// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::acting_context;
use crate::engine::access::require_tier;
use crate::models::Tier;
use crate::store;
use crate::utils::{
    apply_category_rules, maybe_print_json, parse_date, parse_decimal, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, scope) = acting_context(conn, sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();

    let tags: Vec<String> = sub
        .get_one::<String>("tags")
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if !tags.is_empty() {
        require_tier(&user, Tier::Business)?;
    }

    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => store::category_id_by_name(conn, scope, cat)?,
        None => match apply_category_rules(conn, description)? {
            Some(id) => id,
            None => bail!("No category given and no rule matched '{}'", description),
        },
    };

    let id = store::create_expense(conn, scope, amount, description, date, category_id, &tags)?;
    println!("Recorded {} on {} (id {})", amount, date, id);
    Ok(())
}

#[derive(Serialize)]
struct ExpenseRow {
    id: i64,
    date: String,
    description: String,
    amount: String,
    category: String,
    tags: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_, scope) = acting_context(conn, sub)?;
    let start = parse_date(sub.get_one::<String>("from").unwrap())?;
    let end = parse_date(sub.get_one::<String>("to").unwrap())?;
    let names: std::collections::HashMap<i64, String> = store::find_categories(conn, scope)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let data: Vec<ExpenseRow> = store::find_expenses(conn, scope, start, end)?
        .into_iter()
        .map(|e| ExpenseRow {
            id: e.id,
            date: e.occurred_on.to_string(),
            description: e.description,
            amount: format!("{:.2}", e.amount),
            category: names.get(&e.category_id).cloned().unwrap_or_default(),
            tags: e.tags.join(","),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.clone(),
                    e.description.clone(),
                    e.amount.clone(),
                    e.category.clone(),
                    e.tags.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Amount", "Category", "Tags"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_, scope) = acting_context(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_expense(conn, scope, id)?;
    println!("Deleted expense {}", id);
    Ok(())
}
