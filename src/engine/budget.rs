// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget comparison with period normalization.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Budget, BudgetPeriod, BudgetStatus, CategoryReportLine, CategoryTotal};

/// Reporting window the budgets are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodMode {
    Monthly,
    Yearly,
}

/// A budget's contribution to the report window, or None when it does not
/// apply. Monthly reports consider monthly budgets only; yearly reports
/// annualize monthly budgets and take the rest at face value.
fn normalized_amount(budget: &Budget, mode: PeriodMode) -> Option<Decimal> {
    match mode {
        PeriodMode::Monthly => match budget.period {
            BudgetPeriod::Monthly => Some(budget.amount),
            _ => None,
        },
        PeriodMode::Yearly => match budget.period {
            BudgetPeriod::Monthly => Some(budget.amount * Decimal::from(12)),
            _ => Some(budget.amount),
        },
    }
}

/// Classify each category as over/under/no-budget. Several budget rows for
/// the same category are summed before comparison; a category with a budget
/// but no spend still gets a line. Boundary is exact: spent equal to the
/// budget is "under".
pub fn compare_to_budgets(
    totals: &BTreeMap<i64, CategoryTotal>,
    budgets: &[Budget],
    mode: PeriodMode,
    category_names: &HashMap<i64, String>,
) -> Vec<CategoryReportLine> {
    let mut budget_sums: BTreeMap<i64, Decimal> = BTreeMap::new();
    for b in budgets {
        if let Some(amount) = normalized_amount(b, mode) {
            *budget_sums.entry(b.category_id).or_insert(Decimal::ZERO) += amount;
        }
    }

    let mut category_ids: Vec<i64> = totals.keys().copied().collect();
    for id in budget_sums.keys() {
        if !totals.contains_key(id) {
            category_ids.push(*id);
        }
    }

    let mut lines = Vec::with_capacity(category_ids.len());
    for id in category_ids {
        let spent = totals.get(&id).map(|t| t.spent).unwrap_or(Decimal::ZERO);
        let budget = budget_sums.get(&id).copied().unwrap_or(Decimal::ZERO);
        let status = if budget.is_zero() {
            BudgetStatus::NoBudget
        } else if spent > budget {
            BudgetStatus::Over
        } else {
            BudgetStatus::Under
        };
        let category = totals
            .get(&id)
            .map(|t| t.category_name.clone())
            .or_else(|| category_names.get(&id).cloned())
            .unwrap_or_else(|| "(uncategorized)".to_string());
        lines.push(CategoryReportLine {
            category,
            spent,
            budget,
            status,
        });
    }
    lines.sort_by(|a, b| a.category.cmp(&b.category));
    lines
}
