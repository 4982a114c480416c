// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendtrack::engine::anomaly::detect_anomalies;
use spendtrack::models::{Expense, Owner};

fn expense(id: i64, amount: &str) -> Expense {
    Expense {
        id,
        amount: amount.parse::<Decimal>().unwrap(),
        description: format!("expense {}", id),
        occurred_on: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        category_id: 1,
        owner: Owner::User(1),
        tags: Vec::new(),
    }
}

#[test]
fn fewer_than_two_expenses_yield_nothing() {
    assert!(detect_anomalies(&[]).is_empty());
    assert!(detect_anomalies(&[expense(1, "5000")]).is_empty());
}

#[test]
fn equal_amounts_have_no_spread_to_flag() {
    let data: Vec<Expense> = (1..=5).map(|i| expense(i, "25")).collect();
    assert!(detect_anomalies(&data).is_empty());
}

#[test]
fn a_clear_outlier_is_flagged() {
    let mut data: Vec<Expense> = (1..=10).map(|i| expense(i, "20")).collect();
    data.push(expense(99, "2000"));
    let flagged = detect_anomalies(&data);
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].expense_id, 99);
    assert!(flagged[0].explanation.contains("standard deviations"));
}

#[test]
fn mild_variation_is_not_flagged() {
    let data = vec![
        expense(1, "18"),
        expense(2, "22"),
        expense(3, "20"),
        expense(4, "21"),
        expense(5, "19"),
    ];
    assert!(detect_anomalies(&data).is_empty());
}
