// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscription tier, totally ordered: FREE < PREMIUM < BUSINESS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
    Business,
}

impl Tier {
    pub fn rank(self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Premium => 1,
            Tier::Business => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Business => "business",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Some(Tier::Free),
            "premium" => Some(Tier::Premium),
            "business" => Some(Tier::Business),
            _ => None,
        }
    }
}

/// Recurrence unit of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<BudgetPeriod> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Some(BudgetPeriod::Weekly),
            "monthly" => Some(BudgetPeriod::Monthly),
            "yearly" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }
}

/// Owning entity of a record: exactly one of user or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Owner {
    User(i64),
    Group(i64),
}

/// Resolved query scope: the owning entity whose records a request sees.
/// Derived per request by the scope resolver, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Scope {
    User(i64),
    Group(i64),
}

impl Scope {
    /// Column the owner filter binds against.
    pub fn column(self) -> &'static str {
        match self {
            Scope::User(_) => "user_id",
            Scope::Group(_) => "group_id",
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Scope::User(id) | Scope::Group(id) => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub tier: Tier,
    pub email_verified: bool,
    pub email_reports_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub members: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub category_id: i64,
    pub owner: Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub category_id: i64,
    pub owner: Owner,
    pub tags: Vec<String>,
}

/// Per-category rollup, computed per request and discarded.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub category_name: String,
    pub spent: Decimal,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "over")]
    Over,
    #[serde(rename = "under")]
    Under,
    #[serde(rename = "no budget")]
    NoBudget,
}

impl BudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetStatus::Over => "over",
            BudgetStatus::Under => "under",
            BudgetStatus::NoBudget => "no budget",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReportLine {
    pub category: String,
    pub spent: Decimal,
    pub budget: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub expense_id: i64,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_total: Decimal,
    pub predicted_monthly: Vec<Decimal>,
    pub explanation: String,
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_spent: Decimal,
    pub category_data: Vec<CategoryReportLine>,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyReport {
    pub year: i32,
    pub total_spent: Decimal,
    pub prev_year_total: Decimal,
    pub year_over_year_change: Decimal,
    pub category_data: Vec<CategoryReportLine>,
    pub monthly_data: Vec<MonthTotal>,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_spent: Decimal,
    pub category_data: Vec<CategoryReportLine>,
    pub daily_data: Vec<DayTotal>,
    pub anomalies: Vec<Anomaly>,
}
