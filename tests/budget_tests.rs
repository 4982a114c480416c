// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use spendtrack::engine::aggregate::{aggregate_by_category, total_spent};
use spendtrack::engine::budget::{PeriodMode, compare_to_budgets};
use spendtrack::models::{
    Budget, BudgetPeriod, BudgetStatus, CategoryTotal, Expense, Owner,
};

fn expense(id: i64, amount: &str, date: &str, cat: i64) -> Expense {
    Expense {
        id,
        amount: amount.parse::<Decimal>().unwrap(),
        description: String::new(),
        occurred_on: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category_id: cat,
        owner: Owner::User(1),
        tags: Vec::new(),
    }
}

fn budget(id: i64, amount: &str, period: BudgetPeriod, cat: i64) -> Budget {
    Budget {
        id,
        name: format!("budget {}", id),
        amount: amount.parse::<Decimal>().unwrap(),
        period,
        category_id: cat,
        owner: Owner::User(1),
    }
}

fn names(pairs: &[(i64, &str)]) -> HashMap<i64, String> {
    pairs.iter().map(|(id, n)| (*id, n.to_string())).collect()
}

fn window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
    )
}

#[test]
fn aggregation_conserves_the_total() {
    let (start, end) = window();
    let expenses = vec![
        expense(1, "12.34", "2025-08-01", 1),
        expense(2, "0.01", "2025-08-10", 1),
        expense(3, "99.99", "2025-08-20", 2),
    ];
    let totals = aggregate_by_category(&expenses, start, end, &names(&[(1, "A"), (2, "B")]));
    let direct: Decimal = expenses.iter().map(|e| e.amount).sum();
    assert_eq!(total_spent(&totals), direct);
    assert_eq!(totals[&1].expenses.len(), 2);
}

#[test]
fn window_edges_are_half_open() {
    let (start, end) = window();
    let expenses = vec![
        expense(1, "10", "2025-07-31", 1),
        expense(2, "20", "2025-08-01", 1),
        expense(3, "30", "2025-08-31", 1),
        expense(4, "40", "2025-09-01", 1),
    ];
    let totals = aggregate_by_category(&expenses, start, end, &names(&[(1, "A")]));
    assert_eq!(totals[&1].spent, Decimal::from(50));
}

#[test]
fn unknown_category_keeps_a_placeholder_name() {
    let (start, end) = window();
    let expenses = vec![expense(1, "10", "2025-08-05", 77)];
    let totals = aggregate_by_category(&expenses, start, end, &HashMap::new());
    assert_eq!(totals[&77].category_name, "(uncategorized)");
}

#[test]
fn spending_exactly_the_budget_is_under() {
    let mut totals: BTreeMap<i64, CategoryTotal> = BTreeMap::new();
    totals.insert(
        1,
        CategoryTotal {
            category_id: 1,
            category_name: "Groceries".into(),
            spent: Decimal::from(400),
            expenses: Vec::new(),
        },
    );
    let budgets = vec![budget(1, "400", BudgetPeriod::Monthly, 1)];
    let lines = compare_to_budgets(&totals, &budgets, PeriodMode::Monthly, &HashMap::new());
    assert_eq!(lines[0].status, BudgetStatus::Under);

    totals.get_mut(&1).unwrap().spent = Decimal::new(40001, 2); // 400.01
    let lines = compare_to_budgets(&totals, &budgets, PeriodMode::Monthly, &HashMap::new());
    assert_eq!(lines[0].status, BudgetStatus::Over);
}

#[test]
fn monthly_mode_ignores_weekly_and_yearly_budgets() {
    let mut totals: BTreeMap<i64, CategoryTotal> = BTreeMap::new();
    totals.insert(
        1,
        CategoryTotal {
            category_id: 1,
            category_name: "Dining".into(),
            spent: Decimal::from(50),
            expenses: Vec::new(),
        },
    );
    let budgets = vec![
        budget(1, "100", BudgetPeriod::Weekly, 1),
        budget(2, "1200", BudgetPeriod::Yearly, 1),
    ];
    let lines = compare_to_budgets(&totals, &budgets, PeriodMode::Monthly, &HashMap::new());
    // No applicable budget for the month, so the line reads no-budget.
    assert_eq!(lines[0].budget, Decimal::ZERO);
    assert_eq!(lines[0].status, BudgetStatus::NoBudget);
}

#[test]
fn yearly_mode_annualizes_monthly_and_keeps_the_rest() {
    let mut totals: BTreeMap<i64, CategoryTotal> = BTreeMap::new();
    totals.insert(
        1,
        CategoryTotal {
            category_id: 1,
            category_name: "Dining".into(),
            spent: Decimal::from(1000),
            expenses: Vec::new(),
        },
    );
    let monthly = vec![budget(1, "100", BudgetPeriod::Monthly, 1)];
    let lines = compare_to_budgets(&totals, &monthly, PeriodMode::Yearly, &HashMap::new());
    assert_eq!(lines[0].budget, Decimal::from(1200));

    let yearly = vec![budget(1, "900", BudgetPeriod::Yearly, 1)];
    let lines = compare_to_budgets(&totals, &yearly, PeriodMode::Yearly, &HashMap::new());
    assert_eq!(lines[0].budget, Decimal::from(900));
    assert_eq!(lines[0].status, BudgetStatus::Over);
}

#[test]
fn lines_come_back_sorted_by_category_name() {
    let mut totals: BTreeMap<i64, CategoryTotal> = BTreeMap::new();
    for (id, name, amount) in [(3i64, "Zoo", 10i64), (1, "Apples", 20), (2, "Milk", 30)] {
        totals.insert(
            id,
            CategoryTotal {
                category_id: id,
                category_name: name.into(),
                spent: Decimal::from(amount),
                expenses: Vec::new(),
            },
        );
    }
    let lines = compare_to_budgets(&totals, &[], PeriodMode::Monthly, &HashMap::new());
    let got: Vec<&str> = lines.iter().map(|l| l.category.as_str()).collect();
    assert_eq!(got, vec!["Apples", "Milk", "Zoo"]);
}
