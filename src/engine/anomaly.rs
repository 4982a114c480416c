// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outlier flagging over an expense set.
//!
//! Two interchangeable strategies produce the same `Anomaly` shape: a local
//! statistical pass (this module) and a delegated advisor call
//! (`advisor::detect_anomalies`). The report assembler is strategy-agnostic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{Anomaly, Expense};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyMode {
    Stats,
    Delegated,
}

impl AnomalyMode {
    pub fn parse(s: &str) -> Option<AnomalyMode> {
        match s.to_ascii_lowercase().as_str() {
            "stats" => Some(AnomalyMode::Stats),
            "delegated" => Some(AnomalyMode::Delegated),
            _ => None,
        }
    }
}

/// Flag expenses whose amount sits more than two population standard
/// deviations from the mean. With fewer than two expenses, or all amounts
/// equal, there is no spread to measure and the result is empty.
pub fn detect_anomalies(expenses: &[Expense]) -> Vec<Anomaly> {
    let n = expenses.len();
    if n < 2 {
        return Vec::new();
    }

    let sum: Decimal = expenses.iter().map(|e| e.amount).sum();
    let mean = sum / Decimal::from(n as u64);

    // Population variance; the square root needs f64 but the flag decision
    // compares deviations computed from the Decimal amounts.
    let variance: f64 = expenses
        .iter()
        .map(|e| {
            let d = (e.amount - mean).to_f64().unwrap_or(0.0);
            d * d
        })
        .sum::<f64>()
        / n as f64;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for e in expenses {
        let deviation = (e.amount - mean).abs().to_f64().unwrap_or(0.0);
        if deviation > 2.0 * stddev {
            let z = deviation / stddev;
            out.push(Anomaly {
                expense_id: e.id,
                explanation: format!(
                    "'{}' ({:.2}) is {:.1} standard deviations from the period mean {:.2}",
                    e.description,
                    e.amount.round_dp(2),
                    z,
                    mean.round_dp(2)
                ),
            });
        }
    }
    out
}
