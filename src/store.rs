// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record-store boundary: typed query-by-filter access over SQLite.
//! Amounts are stored as TEXT and parsed into Decimal at this boundary,
//! never re-parsed mid-computation.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::models::{
    Budget, BudgetPeriod, Category, Expense, Owner, Scope, Tier, User, UserGroup,
};

type Result<T> = std::result::Result<T, ApiError>;

fn bad_column(idx: usize, why: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, why.into())
}

fn parse_amount(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|e| bad_column(idx, format!("invalid amount '{}': {}", s, e)))
}

fn parse_day(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| bad_column(idx, format!("invalid date '{}': {}", s, e)))
}

fn owner_from(idx: usize, user_id: Option<i64>, group_id: Option<i64>) -> rusqlite::Result<Owner> {
    match (user_id, group_id) {
        (Some(u), None) => Ok(Owner::User(u)),
        (None, Some(g)) => Ok(Owner::Group(g)),
        _ => Err(bad_column(idx, "owner must be user xor group".to_string())),
    }
}

// --- users ---

fn user_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let tier_s: String = r.get(2)?;
    let tier = Tier::parse(&tier_s)
        .ok_or_else(|| bad_column(2, format!("unknown tier '{}'", tier_s)))?;
    Ok(User {
        id: r.get(0)?,
        email: r.get(1)?,
        tier,
        email_verified: r.get::<_, i64>(3)? != 0,
        email_reports_enabled: r.get::<_, i64>(4)? != 0,
    })
}

const USER_COLS: &str = "id, email, tier, email_verified, email_reports_enabled";

pub fn find_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let u = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id=?1", USER_COLS),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(u)
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let u = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email=?1", USER_COLS),
            params![email],
            user_from_row,
        )
        .optional()?;
    Ok(u)
}

pub fn create_user(conn: &Connection, email: &str, tier: Tier) -> Result<i64> {
    conn.execute(
        "INSERT INTO users(email, tier) VALUES (?1, ?2)",
        params![email, tier.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_user_tier(conn: &Connection, email: &str, tier: Tier) -> Result<()> {
    let n = conn.execute(
        "UPDATE users SET tier=?1 WHERE email=?2",
        params![tier.as_str(), email],
    )?;
    if n == 0 {
        return Err(ApiError::NotFound(format!("user '{}'", email)));
    }
    Ok(())
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY email", USER_COLS))?;
    let rows = stmt.query_map([], user_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// --- groups ---

pub fn create_group(conn: &Connection, name: &str, owner_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO user_groups(name, owner_id) VALUES (?1, ?2)",
        params![name, owner_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn add_group_member(conn: &Connection, group_id: i64, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
        params![group_id, user_id],
    )?;
    Ok(())
}

pub fn group_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM user_groups WHERE name=?1",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| ApiError::NotFound(format!("group '{}'", name)))
}

/// Groups the user owns or belongs to, ordered by id so "first" is stable.
pub fn find_groups_for(conn: &Connection, user_id: i64) -> Result<Vec<UserGroup>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT g.id, g.name, g.owner_id
         FROM user_groups g
         LEFT JOIN group_members m ON m.group_id = g.id
         WHERE g.owner_id = ?1 OR m.user_id = ?1
         ORDER BY g.id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, i64>(2)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, owner_id) = row?;
        let mut mstmt =
            conn.prepare("SELECT user_id FROM group_members WHERE group_id=?1 ORDER BY user_id")?;
        let members = mstmt
            .query_map(params![id], |r| r.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        out.push(UserGroup {
            id,
            name,
            owner_id,
            members,
        });
    }
    Ok(out)
}

// --- categories ---

pub fn create_category(conn: &Connection, scope: Scope, name: &str) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO categories(name, {}) VALUES (?1, ?2)",
            scope.column()
        ),
        params![name, scope.id()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_categories(conn: &Connection, scope: Scope) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, user_id, group_id FROM categories WHERE {}=?1 ORDER BY name",
        scope.column()
    ))?;
    let rows = stmt.query_map(params![scope.id()], |r| {
        let owner = owner_from(2, r.get(2)?, r.get(3)?)?;
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            owner,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn category_id_by_name(conn: &Connection, scope: Scope, name: &str) -> Result<i64> {
    conn.query_row(
        &format!(
            "SELECT id FROM categories WHERE {}=?1 AND name=?2",
            scope.column()
        ),
        params![scope.id(), name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| ApiError::NotFound(format!("category '{}'", name)))
}

/// Deletion is refused while expenses or budgets still reference the
/// category, so report lines never lose their names.
pub fn delete_category(conn: &Connection, scope: Scope, name: &str) -> Result<()> {
    let id = category_id_by_name(conn, scope, name)?;
    let expenses: i64 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    let budgets: i64 = conn.query_row(
        "SELECT COUNT(*) FROM budgets WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if expenses > 0 || budgets > 0 {
        return Err(ApiError::Conflict(format!(
            "category '{}' still has {} expense(s) and {} budget(s)",
            name, expenses, budgets
        )));
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    Ok(())
}

// --- budgets ---

pub fn create_budget(
    conn: &Connection,
    scope: Scope,
    name: &str,
    amount: Decimal,
    period: BudgetPeriod,
    category_id: i64,
) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO budgets(name, amount, period, category_id, {}) VALUES (?1,?2,?3,?4,?5)",
            scope.column()
        ),
        params![
            name,
            amount.to_string(),
            period.as_str(),
            category_id,
            scope.id()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_budgets(
    conn: &Connection,
    scope: Scope,
    period: Option<BudgetPeriod>,
) -> Result<Vec<Budget>> {
    let mut sql = format!(
        "SELECT id, name, amount, period, category_id, user_id, group_id
         FROM budgets WHERE {}=?1",
        scope.column()
    );
    if period.is_some() {
        sql.push_str(" AND period=?2");
    }
    sql.push_str(" ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let map_row = |r: &rusqlite::Row<'_>| -> rusqlite::Result<Budget> {
        let amount_s: String = r.get(2)?;
        let period_s: String = r.get(3)?;
        let period = BudgetPeriod::parse(&period_s)
            .ok_or_else(|| bad_column(3, format!("unknown period '{}'", period_s)))?;
        let owner = owner_from(5, r.get(5)?, r.get(6)?)?;
        Ok(Budget {
            id: r.get(0)?,
            name: r.get(1)?,
            amount: parse_amount(2, &amount_s)?,
            period,
            category_id: r.get(4)?,
            owner,
        })
    };
    let mut out = Vec::new();
    if let Some(p) = period {
        let rows = stmt.query_map(params![scope.id(), p.as_str()], map_row)?;
        for row in rows {
            out.push(row?);
        }
    } else {
        let rows = stmt.query_map(params![scope.id()], map_row)?;
        for row in rows {
            out.push(row?);
        }
    }
    Ok(out)
}

// --- expenses ---

fn expense_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let amount_s: String = r.get(1)?;
    let date_s: String = r.get(3)?;
    let tags_s: Option<String> = r.get(6)?;
    let tags = match tags_s {
        Some(s) if !s.is_empty() => serde_json::from_str(&s)
            .map_err(|e| bad_column(6, format!("invalid tags '{}': {}", s, e)))?,
        _ => Vec::new(),
    };
    let owner = owner_from(4, r.get(4)?, r.get(5)?)?;
    Ok(Expense {
        id: r.get(0)?,
        amount: parse_amount(1, &amount_s)?,
        description: r.get(2)?,
        occurred_on: parse_day(3, &date_s)?,
        category_id: r.get(7)?,
        owner,
        tags,
    })
}

const EXPENSE_COLS: &str =
    "id, amount, description, occurred_on, user_id, group_id, tags, category_id";

pub fn create_expense(
    conn: &Connection,
    scope: Scope,
    amount: Decimal,
    description: &str,
    occurred_on: NaiveDate,
    category_id: i64,
    tags: &[String],
) -> Result<i64> {
    let tags_json = if tags.is_empty() {
        None
    } else {
        Some(serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string()))
    };
    conn.execute(
        &format!(
            "INSERT INTO expenses(amount, description, occurred_on, category_id, tags, {})
             VALUES (?1,?2,?3,?4,?5,?6)",
            scope.column()
        ),
        params![
            amount.to_string(),
            description,
            occurred_on.to_string(),
            category_id,
            tags_json,
            scope.id()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Expenses in the half-open window `[start, end)` for the given scope.
pub fn find_expenses(
    conn: &Connection,
    scope: Scope,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses
         WHERE {}=?1 AND occurred_on >= ?2 AND occurred_on < ?3
         ORDER BY occurred_on, id",
        EXPENSE_COLS,
        scope.column()
    ))?;
    let rows = stmt.query_map(
        params![scope.id(), start.to_string(), end.to_string()],
        expense_from_row,
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete_expense(conn: &Connection, scope: Scope, id: i64) -> Result<()> {
    let n = conn.execute(
        &format!("DELETE FROM expenses WHERE id=?1 AND {}=?2", scope.column()),
        params![id, scope.id()],
    )?;
    if n == 0 {
        return Err(ApiError::NotFound(format!("expense {}", id)));
    }
    Ok(())
}

// --- settings ---

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
