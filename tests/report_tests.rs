// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;

use spendtrack::engine::report::{build_monthly_report, build_range_report, build_yearly_report};
use spendtrack::error::ApiError;
use spendtrack::models::{BudgetPeriod, BudgetStatus, Scope, Tier, User};
use spendtrack::store;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    spendtrack::db::init_schema(&mut conn).unwrap();
    conn
}

fn premium_user(conn: &Connection, email: &str) -> User {
    store::create_user(conn, email, Tier::Premium).unwrap();
    store::find_user_by_email(conn, email).unwrap().unwrap()
}

fn day(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn add_expense(conn: &Connection, scope: Scope, amount: &str, date: &str, cat: i64) {
    store::create_expense(
        conn,
        scope,
        amount.parse::<Decimal>().unwrap(),
        "test expense",
        day(date),
        cat,
        &[],
    )
    .unwrap();
}

#[test]
fn monthly_report_stays_under_budget() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Groceries").unwrap();
    store::create_budget(
        &conn,
        scope,
        "food",
        Decimal::from(400),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();
    add_expense(&conn, scope, "100", "2025-08-05", cat);
    add_expense(&conn, scope, "300", "2025-08-20", cat);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.total_spent, Decimal::from(400));
    assert_eq!(report.category_data.len(), 1);
    let line = &report.category_data[0];
    assert_eq!(line.spent, Decimal::from(400));
    assert_eq!(line.budget, Decimal::from(400));
    // Exactly on the budget counts as under.
    assert_eq!(line.status, BudgetStatus::Under);
}

#[test]
fn one_cent_past_the_budget_is_over() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Dining").unwrap();
    store::create_budget(
        &conn,
        scope,
        "dining",
        Decimal::from(300),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();
    add_expense(&conn, scope, "300.01", "2025-08-10", cat);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.category_data[0].status, BudgetStatus::Over);
}

#[test]
fn spend_without_budget_reports_no_budget() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Travel").unwrap();
    add_expense(&conn, scope, "50", "2025-08-10", cat);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.category_data[0].status, BudgetStatus::NoBudget);
    assert_eq!(report.category_data[0].budget, Decimal::ZERO);
}

#[test]
fn budgeted_category_with_no_spend_still_gets_a_line() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Rent").unwrap();
    store::create_budget(
        &conn,
        scope,
        "rent",
        Decimal::from(1000),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.total_spent, Decimal::ZERO);
    assert_eq!(report.category_data.len(), 1);
    assert_eq!(report.category_data[0].status, BudgetStatus::Under);
}

#[test]
fn multiple_budget_rows_for_one_category_are_summed() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Groceries").unwrap();
    store::create_budget(
        &conn,
        scope,
        "base",
        Decimal::from(200),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();
    store::create_budget(
        &conn,
        scope,
        "top-up",
        Decimal::from(100),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();
    add_expense(&conn, scope, "250", "2025-08-10", cat);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.category_data[0].budget, Decimal::from(300));
    assert_eq!(report.category_data[0].status, BudgetStatus::Under);
}

#[test]
fn expenses_outside_the_month_are_excluded() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "10", "2025-07-31", cat);
    add_expense(&conn, scope, "20", "2025-08-01", cat);
    add_expense(&conn, scope, "30", "2025-08-31", cat);
    add_expense(&conn, scope, "40", "2025-09-01", cat);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.total_spent, Decimal::from(50));
}

#[test]
fn free_tier_cannot_run_reports() {
    let conn = setup();
    store::create_user(&conn, "f@example.com", Tier::Free).unwrap();
    let user = store::find_user_by_email(&conn, "f@example.com")
        .unwrap()
        .unwrap();
    let scope = Scope::User(user.id);

    let err = build_yearly_report(&conn, &user, scope, 2025).unwrap_err();
    assert!(matches!(err, ApiError::InsufficientTier { .. }));
    assert_eq!(err.status_code(), 403);

    let err = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn yearly_report_annualizes_monthly_budgets() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Groceries").unwrap();
    store::create_budget(
        &conn,
        scope,
        "food",
        Decimal::from(100),
        BudgetPeriod::Monthly,
        cat,
    )
    .unwrap();
    add_expense(&conn, scope, "500", "2025-03-10", cat);

    let report = build_yearly_report(&conn, &user, scope, 2025).unwrap();
    assert_eq!(report.category_data[0].budget, Decimal::from(1200));
    assert_eq!(report.category_data[0].status, BudgetStatus::Under);
}

#[test]
fn year_over_year_change_is_zero_against_an_empty_prior_year() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "500", "2025-06-01", cat);

    let report = build_yearly_report(&conn, &user, scope, 2025).unwrap();
    assert_eq!(report.total_spent, Decimal::from(500));
    assert_eq!(report.prev_year_total, Decimal::ZERO);
    assert_eq!(report.year_over_year_change, Decimal::ZERO);
}

#[test]
fn year_over_year_change_against_real_history() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "200", "2024-06-01", cat);
    add_expense(&conn, scope, "300", "2025-06-01", cat);

    let report = build_yearly_report(&conn, &user, scope, 2025).unwrap();
    assert_eq!(report.year_over_year_change, Decimal::from(50));
}

#[test]
fn yearly_monthly_series_has_twelve_buckets() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "10", "2025-01-15", cat);
    add_expense(&conn, scope, "20", "2025-12-15", cat);

    let report = build_yearly_report(&conn, &user, scope, 2025).unwrap();
    assert_eq!(report.monthly_data.len(), 12);
    assert_eq!(report.monthly_data[0].total, Decimal::from(10));
    assert_eq!(report.monthly_data[11].total, Decimal::from(20));
    let mid: Decimal = report.monthly_data[1..11].iter().map(|m| m.total).sum();
    assert_eq!(mid, Decimal::ZERO);
}

#[test]
fn range_report_rejects_inverted_windows() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);

    let err =
        build_range_report(&conn, &user, scope, day("2025-08-10"), day("2025-08-01")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidRange(_)));
    assert_eq!(err.status_code(), 400);

    let err =
        build_range_report(&conn, &user, scope, day("2025-08-10"), day("2025-08-10")).unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn range_report_buckets_daily_totals() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "10", "2025-08-02", cat);
    add_expense(&conn, scope, "15", "2025-08-02", cat);
    add_expense(&conn, scope, "5", "2025-08-04", cat);

    let report =
        build_range_report(&conn, &user, scope, day("2025-08-01"), day("2025-08-10")).unwrap();
    assert_eq!(report.total_spent, Decimal::from(30));
    // Only days with spend appear.
    assert_eq!(report.daily_data.len(), 2);
    assert_eq!(report.daily_data[0].date, day("2025-08-02"));
    assert_eq!(report.daily_data[0].total, Decimal::from(25));
    assert_eq!(report.daily_data[1].total, Decimal::from(5));
}

#[test]
fn unreachable_advisor_degrades_to_no_anomalies() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let cat = store::create_category(&conn, scope, "Misc").unwrap();
    add_expense(&conn, scope, "20", "2025-08-01", cat);
    add_expense(&conn, scope, "20", "2025-08-02", cat);
    store::set_setting(&conn, "anomaly_mode", "delegated").unwrap();
    // Nothing listens here; the connection is refused immediately.
    store::set_setting(&conn, "advisor_url", "http://127.0.0.1:9").unwrap();

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    assert_eq!(report.total_spent, Decimal::from(40));
    assert!(report.anomalies.is_empty());
}

#[test]
fn report_total_conserves_category_sums() {
    let conn = setup();
    let user = premium_user(&conn, "a@example.com");
    let scope = Scope::User(user.id);
    let groceries = store::create_category(&conn, scope, "Groceries").unwrap();
    let travel = store::create_category(&conn, scope, "Travel").unwrap();
    add_expense(&conn, scope, "12.34", "2025-08-01", groceries);
    add_expense(&conn, scope, "56.78", "2025-08-15", groceries);
    add_expense(&conn, scope, "90.12", "2025-08-20", travel);

    let report = build_monthly_report(&conn, &user, scope, 2025, 8).unwrap();
    let by_category: Decimal = report.category_data.iter().map(|l| l.spent).sum();
    assert_eq!(report.total_spent, by_category);
}
