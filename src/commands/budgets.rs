// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::acting_context;
use crate::models::BudgetPeriod;
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_, scope) = acting_context(conn, sub)?;
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let period_s = sub.get_one::<String>("period").unwrap();
    let period = match BudgetPeriod::parse(period_s) {
        Some(p) => p,
        None => bail!(
            "Unknown period '{}', expected weekly|monthly|yearly",
            period_s
        ),
    };
    let cat = sub.get_one::<String>("category").unwrap();
    let category_id = store::category_id_by_name(conn, scope, cat)?;
    store::create_budget(conn, scope, name, amount, period, category_id)?;
    println!(
        "Budget '{}' set: {} {} for '{}'",
        name,
        amount,
        period.as_str(),
        cat
    );
    Ok(())
}

#[derive(Serialize)]
struct BudgetRow {
    name: String,
    amount: String,
    period: String,
    category: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_, scope) = acting_context(conn, sub)?;
    let names: std::collections::HashMap<i64, String> = store::find_categories(conn, scope)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let data: Vec<BudgetRow> = store::find_budgets(conn, scope, None)?
        .into_iter()
        .map(|b| BudgetRow {
            name: b.name,
            amount: format!("{:.2}", b.amount),
            period: b.period.as_str().to_string(),
            category: names.get(&b.category_id).cloned().unwrap_or_default(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.name.clone(),
                    b.amount.clone(),
                    b.period.clone(),
                    b.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Amount", "Period", "Category"], rows)
        );
    }
    Ok(())
}
