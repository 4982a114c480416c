// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trend-based spending projection from monthly aggregates.

use rust_decimal::Decimal;

use crate::models::Forecast;

/// Forecast with no signal in it, used when history is too thin or a
/// delegated estimate failed.
pub fn zero_forecast(explanation: &str) -> Forecast {
    Forecast {
        predicted_total: Decimal::ZERO,
        predicted_monthly: vec![Decimal::ZERO; 12],
        explanation: explanation.to_string(),
        risks: Vec::new(),
    }
}

/// Project next-period spending from a series of monthly totals.
///
/// The trailing growth rate is averaged over adjacent months with spend;
/// the next month is `avg_recent * (1 + growth)` and the annual estimate is
/// spread evenly over twelve months. Fewer than two months with spend yields
/// a zero forecast with an explanatory message rather than an error.
pub fn forecast_from_series(monthly_totals: &[Decimal]) -> Forecast {
    let points: Vec<Decimal> = monthly_totals
        .iter()
        .copied()
        .filter(|t| !t.is_zero())
        .collect();
    if points.len() < 2 {
        return zero_forecast("not enough spending history to project a trend (need at least two months)");
    }

    let mut growth_sum = Decimal::ZERO;
    let mut growth_count = 0u32;
    for w in points.windows(2) {
        if !w[0].is_zero() {
            growth_sum += (w[1] - w[0]) / w[0];
            growth_count += 1;
        }
    }
    let growth = if growth_count > 0 {
        growth_sum / Decimal::from(growth_count)
    } else {
        Decimal::ZERO
    };

    // Average of up to the last three months with spend.
    let recent = &points[points.len().saturating_sub(3)..];
    let avg_recent: Decimal =
        recent.iter().copied().sum::<Decimal>() / Decimal::from(recent.len() as u64);

    let next_month = avg_recent * (Decimal::ONE + growth);
    let next_month = if next_month < Decimal::ZERO {
        Decimal::ZERO
    } else {
        next_month
    };
    let predicted_total = next_month * Decimal::from(12);
    let predicted_monthly = vec![next_month; 12];

    let mut risks = Vec::new();
    let one_fifth = Decimal::new(2, 1); // 0.2
    if growth > one_fifth {
        risks.push("month-over-month spending is trending up sharply".to_string());
    }

    Forecast {
        predicted_total,
        predicted_monthly,
        explanation: format!(
            "projected from {} month(s) of history at an average growth rate of {:.1}% per month",
            points.len(),
            (growth * Decimal::from(100)).round_dp(1)
        ),
        risks,
    }
}
