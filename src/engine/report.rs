// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report assembler: composes aggregation, budget comparison, anomaly
//! detection and forecasting into the monthly/yearly/custom-range report
//! shapes. Stateless; every call works over a snapshot fetched here.

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::advisor::{self, Advisor};
use crate::engine::access::require_tier;
use crate::engine::aggregate::{aggregate_by_category, total_spent};
use crate::engine::anomaly::{self, AnomalyMode};
use crate::engine::budget::{PeriodMode, compare_to_budgets};
use crate::engine::forecast::{forecast_from_series, zero_forecast};
use crate::error::ApiError;
use crate::models::{
    Anomaly, DayTotal, Expense, Forecast, MonthTotal, MonthlyReport, RangeReport, Scope, Tier,
    User, YearlyReport,
};
use crate::store;
use crate::utils::{month_window, year_window};

fn category_names(conn: &Connection, scope: Scope) -> Result<HashMap<i64, String>, ApiError> {
    Ok(store::find_categories(conn, scope)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

fn anomaly_mode(conn: &Connection) -> AnomalyMode {
    store::get_setting(conn, advisor::SETTING_ANOMALY_MODE)
        .ok()
        .flatten()
        .and_then(|s| AnomalyMode::parse(&s))
        .unwrap_or(AnomalyMode::Stats)
}

/// Run the configured anomaly strategy. Delegation failures degrade to an
/// empty list inside the advisor; a delegated mode with no advisor
/// configured falls back to the statistical pass.
fn detect(conn: &Connection, expenses: &[Expense]) -> Vec<Anomaly> {
    match anomaly_mode(conn) {
        AnomalyMode::Stats => anomaly::detect_anomalies(expenses),
        AnomalyMode::Delegated => match Advisor::from_settings(conn) {
            Some(a) => a.detect_anomalies(expenses),
            None => anomaly::detect_anomalies(expenses),
        },
    }
}

fn monthly_series(expenses: &[Expense], year: i32) -> Vec<Decimal> {
    let mut series = vec![Decimal::ZERO; 12];
    for e in expenses {
        if e.occurred_on.year() == year {
            series[e.occurred_on.month0() as usize] += e.amount;
        }
    }
    series
}

fn estimate(conn: &Connection, series: &[Decimal]) -> Forecast {
    let delegated = store::get_setting(conn, advisor::SETTING_FORECAST_MODE)
        .ok()
        .flatten()
        .map(|s| s.eq_ignore_ascii_case("delegated"))
        .unwrap_or(false);
    if delegated {
        if let Some(a) = Advisor::from_settings(conn) {
            return a
                .forecast(series)
                .unwrap_or_else(|| zero_forecast("delegated forecast unavailable"));
        }
    }
    forecast_from_series(series)
}

pub fn build_monthly_report(
    conn: &Connection,
    user: &User,
    scope: Scope,
    year: i32,
    month: u32,
) -> Result<MonthlyReport, ApiError> {
    require_tier(user, Tier::Premium)?;
    let (start, end) =
        month_window(year, month).map_err(|e| ApiError::InvalidRange(e.to_string()))?;

    let names = category_names(conn, scope)?;
    let expenses = store::find_expenses(conn, scope, start, end)?;
    let budgets = store::find_budgets(conn, scope, None)?;

    let totals = aggregate_by_category(&expenses, start, end, &names);
    let category_data = compare_to_budgets(&totals, &budgets, PeriodMode::Monthly, &names);
    let anomalies = detect(conn, &expenses);

    Ok(MonthlyReport {
        month,
        year,
        total_spent: total_spent(&totals),
        category_data,
        anomalies,
    })
}

pub fn build_yearly_report(
    conn: &Connection,
    user: &User,
    scope: Scope,
    year: i32,
) -> Result<YearlyReport, ApiError> {
    require_tier(user, Tier::Premium)?;
    let (start, end) = year_window(year).map_err(|e| ApiError::InvalidRange(e.to_string()))?;
    let (prev_start, prev_end) =
        year_window(year - 1).map_err(|e| ApiError::InvalidRange(e.to_string()))?;

    let names = category_names(conn, scope)?;
    let expenses = store::find_expenses(conn, scope, start, end)?;
    let prev_expenses = store::find_expenses(conn, scope, prev_start, prev_end)?;
    let budgets = store::find_budgets(conn, scope, None)?;

    let totals = aggregate_by_category(&expenses, start, end, &names);
    let total = total_spent(&totals);
    let prev_total: Decimal = prev_expenses.iter().map(|e| e.amount).sum();

    // Defined as 0 against an empty prior year; a flat lower bound, not a
    // real growth figure.
    let year_over_year_change = if prev_total.is_zero() {
        Decimal::ZERO
    } else {
        (total - prev_total) / prev_total * Decimal::from(100)
    };

    let monthly_data: Vec<MonthTotal> = monthly_series(&expenses, year)
        .iter()
        .enumerate()
        .map(|(i, t)| MonthTotal {
            month: i as u32 + 1,
            total: *t,
        })
        .collect();

    // Trend input: prior year then current year, month by month.
    let mut series = monthly_series(&prev_expenses, year - 1);
    series.extend(monthly_series(&expenses, year));
    let forecast = estimate(conn, &series);

    let category_data = compare_to_budgets(&totals, &budgets, PeriodMode::Yearly, &names);

    Ok(YearlyReport {
        year,
        total_spent: total,
        prev_year_total: prev_total,
        year_over_year_change,
        category_data,
        monthly_data,
        forecast,
    })
}

pub fn build_range_report(
    conn: &Connection,
    user: &User,
    scope: Scope,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeReport, ApiError> {
    require_tier(user, Tier::Premium)?;
    if start >= end {
        return Err(ApiError::InvalidRange(format!(
            "start {} must precede end {}",
            start, end
        )));
    }

    let names = category_names(conn, scope)?;
    let expenses = store::find_expenses(conn, scope, start, end)?;
    let budgets = store::find_budgets(conn, scope, None)?;

    let totals = aggregate_by_category(&expenses, start, end, &names);
    let category_data = compare_to_budgets(&totals, &budgets, PeriodMode::Monthly, &names);

    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in &expenses {
        *days.entry(e.occurred_on).or_insert(Decimal::ZERO) += e.amount;
    }
    let daily_data = days
        .into_iter()
        .map(|(date, total)| DayTotal { date, total })
        .collect();

    let anomalies = detect(conn, &expenses);

    Ok(RangeReport {
        start,
        end,
        total_spent: total_spent(&totals),
        category_data,
        daily_data,
        anomalies,
    })
}
