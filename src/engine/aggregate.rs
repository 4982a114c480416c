// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category rollups over a date window. Pure functions, no I/O.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::{CategoryTotal, Expense};

/// Sum expense amounts per category over the half-open window `[start, end)`.
/// Display names come from the supplied category map; an unmatched id keeps a
/// placeholder name rather than dropping the spend. An empty input yields an
/// empty map, never an error.
pub fn aggregate_by_category(
    expenses: &[Expense],
    start: NaiveDate,
    end: NaiveDate,
    category_names: &HashMap<i64, String>,
) -> BTreeMap<i64, CategoryTotal> {
    let mut out: BTreeMap<i64, CategoryTotal> = BTreeMap::new();
    for e in expenses {
        if e.occurred_on < start || e.occurred_on >= end {
            continue;
        }
        let entry = out.entry(e.category_id).or_insert_with(|| CategoryTotal {
            category_id: e.category_id,
            category_name: category_names
                .get(&e.category_id)
                .cloned()
                .unwrap_or_else(|| "(uncategorized)".to_string()),
            spent: Decimal::ZERO,
            expenses: Vec::new(),
        });
        entry.spent += e.amount;
        entry.expenses.push(e.clone());
    }
    out
}

/// Total across all rollups; conserves the sum of the windowed expenses.
pub fn total_spent(totals: &BTreeMap<i64, CategoryTotal>) -> Decimal {
    totals.values().map(|t| t.spent).sum()
}
