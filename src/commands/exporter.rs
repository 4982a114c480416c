// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::acting_context;
use crate::engine::access::require_tier;
use crate::engine::report::build_monthly_report;
use crate::models::Tier;
use crate::store;
use crate::utils::{month_window, parse_month};

/// Write a monthly report to CSV with Summary, Category Breakdown and
/// Expenses sections. Business tier only.
pub fn export_monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, scope) = acting_context(conn, sub)?;
    require_tier(&user, Tier::Business)?;

    let (year, month) = parse_month(sub.get_one::<String>("month").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap();

    let report = build_monthly_report(conn, &user, scope, year, month)?;
    let (start, end) = month_window(year, month)?;
    let expenses = store::find_expenses(conn, scope, start, end)?;
    let names: std::collections::HashMap<i64, String> = store::find_categories(conn, scope)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(out)?;

    wtr.write_record(["Summary"])?;
    wtr.write_record(["month", &format!("{}-{:02}", year, month)])?;
    wtr.write_record(["total_spent", &format!("{:.2}", report.total_spent)])?;
    wtr.write_record([""])?;

    wtr.write_record(["Category Breakdown"])?;
    wtr.write_record(["category", "spent", "budget", "status"])?;
    for line in &report.category_data {
        wtr.write_record([
            line.category.as_str(),
            &format!("{:.2}", line.spent),
            &format!("{:.2}", line.budget),
            line.status.as_str(),
        ])?;
    }
    wtr.write_record([""])?;

    wtr.write_record(["Expenses"])?;
    wtr.write_record(["date", "description", "amount", "category"])?;
    for e in &expenses {
        wtr.write_record([
            &e.occurred_on.to_string(),
            e.description.as_str(),
            &format!("{:.2}", e.amount),
            names.get(&e.category_id).map(String::as_str).unwrap_or(""),
        ])?;
    }
    wtr.flush()?;

    println!("Exported {}-{:02} report to {}", year, month, out);
    Ok(())
}
