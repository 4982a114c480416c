// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Delegated anomaly/forecast service client.
//!
//! Fail-open by contract: a timeout, a non-2xx status, or an unparseable
//! body degrades to an empty result. Enrichment must never fail the primary
//! report, so nothing in here returns an error to the caller.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::models::{Anomaly, Expense, Forecast};
use crate::store;
use crate::utils::http_client;

pub const SETTING_URL: &str = "advisor_url";
pub const SETTING_ANOMALY_MODE: &str = "anomaly_mode";
pub const SETTING_FORECAST_MODE: &str = "forecast_mode";

pub struct Advisor {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Advisor {
    /// Build a client from the `advisor_url` setting; None when unset.
    pub fn from_settings(conn: &Connection) -> Option<Advisor> {
        let base_url = store::get_setting(conn, SETTING_URL).ok().flatten()?;
        let client = match http_client() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("advisor client unavailable: {}", e);
                return None;
            }
        };
        Some(Advisor { base_url, client })
    }

    /// Ask the advisor to flag unusual expenses. Expects a JSON array of
    /// `{id, explanation}`; anything else is an empty result.
    pub fn detect_anomalies(&self, expenses: &[Expense]) -> Vec<Anomaly> {
        #[derive(Deserialize)]
        struct Flagged {
            id: i64,
            explanation: String,
        }

        let body = json!({
            "instructions": "Review these expenses and return a JSON array of \
                             {id, explanation} for any that look unusual.",
            "expenses": expenses,
        });
        let url = format!("{}/analyze", self.base_url.trim_end_matches('/'));
        let flagged: Vec<Flagged> = match self
            .client
            .post(url)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
        {
            Ok(v) => v,
            Err(e) => {
                eprintln!("delegated anomaly detection unavailable: {}", e);
                return Vec::new();
            }
        };
        flagged
            .into_iter()
            .map(|f| Anomaly {
                expense_id: f.id,
                explanation: f.explanation,
            })
            .collect()
    }

    /// Ask the advisor for a next-period projection. None on any failure;
    /// the caller substitutes a zero forecast.
    pub fn forecast(&self, monthly_totals: &[Decimal]) -> Option<Forecast> {
        #[derive(Deserialize)]
        struct Projected {
            predicted_total: Decimal,
            #[serde(default)]
            predicted_monthly: Vec<Decimal>,
            #[serde(default)]
            explanation: String,
            #[serde(default)]
            risks: Vec<String>,
        }

        let body = json!({
            "instructions": "Project next-period spending from these monthly \
                             totals; reply with predicted_total, \
                             predicted_monthly[12], explanation and risks.",
            "monthly_totals": monthly_totals,
        });
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));
        let p: Projected = match self
            .client
            .post(url)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
        {
            Ok(v) => v,
            Err(e) => {
                eprintln!("delegated forecast unavailable: {}", e);
                return None;
            }
        };

        let mut monthly = p.predicted_monthly;
        monthly.truncate(12);
        while monthly.len() < 12 {
            monthly.push(Decimal::ZERO);
        }
        Some(Forecast {
            predicted_total: p.predicted_total,
            predicted_monthly: monthly,
            explanation: p.explanation,
            risks: p.risks,
        })
    }
}
