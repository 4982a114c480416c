// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::{acting_context, exporter};
use crate::engine::report::{build_monthly_report, build_range_report, build_yearly_report};
use crate::models::{Anomaly, CategoryReportLine};
use crate::utils::{maybe_print_json, parse_date, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("yearly", sub)) => yearly(conn, sub)?,
        Some(("range", sub)) => range(conn, sub)?,
        Some(("export", sub)) => exporter::export_monthly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn category_rows(lines: &[CategoryReportLine]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|l| {
            vec![
                l.category.clone(),
                format!("{:.2}", l.spent),
                format!("{:.2}", l.budget),
                l.status.as_str().to_string(),
            ]
        })
        .collect()
}

fn print_anomalies(anomalies: &[Anomaly]) {
    if anomalies.is_empty() {
        return;
    }
    println!("Unusual expenses:");
    for a in anomalies {
        println!("  #{}: {}", a.expense_id, a.explanation);
    }
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, scope) = acting_context(conn, sub)?;
    let (year, month) = parse_month(sub.get_one::<String>("month").unwrap())?;
    let report = build_monthly_report(conn, &user, scope, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "Report for {}-{:02} — total spent {:.2}",
            report.year, report.month, report.total_spent
        );
        println!(
            "{}",
            pretty_table(
                &["Category", "Spent", "Budget", "Status"],
                category_rows(&report.category_data),
            )
        );
        print_anomalies(&report.anomalies);
    }
    Ok(())
}

fn yearly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, scope) = acting_context(conn, sub)?;
    let year = *sub.get_one::<i32>("year").unwrap();
    let report = build_yearly_report(conn, &user, scope, year)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "Report for {} — total spent {:.2} (prior year {:.2}, change {:.1}%)",
            report.year, report.total_spent, report.prev_year_total, report.year_over_year_change
        );
        println!(
            "{}",
            pretty_table(
                &["Category", "Spent", "Budget", "Status"],
                category_rows(&report.category_data),
            )
        );
        let months: Vec<Vec<String>> = report
            .monthly_data
            .iter()
            .map(|m| vec![format!("{}-{:02}", report.year, m.month), format!("{:.2}", m.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Spent"], months));
        println!(
            "Forecast: {:.2} over the next year ({})",
            report.forecast.predicted_total, report.forecast.explanation
        );
        for risk in &report.forecast.risks {
            println!("  risk: {}", risk);
        }
    }
    Ok(())
}

fn range(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, scope) = acting_context(conn, sub)?;
    let start = parse_date(sub.get_one::<String>("from").unwrap())?;
    let end = parse_date(sub.get_one::<String>("to").unwrap())?;
    let report = build_range_report(conn, &user, scope, start, end)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "Report for [{}, {}) — total spent {:.2}",
            report.start, report.end, report.total_spent
        );
        println!(
            "{}",
            pretty_table(
                &["Category", "Spent", "Budget", "Status"],
                category_rows(&report.category_data),
            )
        );
        let days: Vec<Vec<String>> = report
            .daily_data
            .iter()
            .map(|d| vec![d.date.to_string(), format!("{:.2}", d.total)])
            .collect();
        println!("{}", pretty_table(&["Date", "Spent"], days));
        print_anomalies(&report.anomalies);
    }
    Ok(())
}
