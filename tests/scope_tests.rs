// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;

use spendtrack::engine::scope::resolve_scope;
use spendtrack::models::{Scope, Tier};
use spendtrack::store;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    spendtrack::db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn users_without_groups_get_their_personal_scope() {
    let conn = setup();
    let uid = store::create_user(&conn, "solo@example.com", Tier::Free).unwrap();
    assert_eq!(resolve_scope(&conn, uid).unwrap(), Scope::User(uid));
}

#[test]
fn group_membership_shifts_the_scope() {
    let conn = setup();
    let owner = store::create_user(&conn, "owner@example.com", Tier::Premium).unwrap();
    let member = store::create_user(&conn, "member@example.com", Tier::Free).unwrap();
    let gid = store::create_group(&conn, "household", owner).unwrap();
    store::add_group_member(&conn, gid, member).unwrap();

    // Owners resolve to their group even without a membership row.
    assert_eq!(resolve_scope(&conn, owner).unwrap(), Scope::Group(gid));
    assert_eq!(resolve_scope(&conn, member).unwrap(), Scope::Group(gid));
}

#[test]
fn lowest_id_group_wins_with_several_memberships() {
    let conn = setup();
    let owner = store::create_user(&conn, "owner@example.com", Tier::Premium).unwrap();
    let member = store::create_user(&conn, "member@example.com", Tier::Free).unwrap();
    let first = store::create_group(&conn, "household", owner).unwrap();
    let second = store::create_group(&conn, "trip", owner).unwrap();
    store::add_group_member(&conn, second, member).unwrap();
    store::add_group_member(&conn, first, member).unwrap();

    assert!(first < second);
    assert_eq!(resolve_scope(&conn, member).unwrap(), Scope::Group(first));
}

#[test]
fn scope_is_re_resolved_after_membership_changes() {
    let conn = setup();
    let owner = store::create_user(&conn, "owner@example.com", Tier::Premium).unwrap();
    let member = store::create_user(&conn, "member@example.com", Tier::Free).unwrap();
    assert_eq!(resolve_scope(&conn, member).unwrap(), Scope::User(member));

    let gid = store::create_group(&conn, "household", owner).unwrap();
    store::add_group_member(&conn, gid, member).unwrap();
    assert_eq!(resolve_scope(&conn, member).unwrap(), Scope::Group(gid));
}

#[test]
fn group_scope_pools_member_expenses() {
    let conn = setup();
    let owner = store::create_user(&conn, "owner@example.com", Tier::Premium).unwrap();
    let gid = store::create_group(&conn, "household", owner).unwrap();
    store::add_group_member(&conn, gid, owner).unwrap();
    let scope = Scope::Group(gid);
    let cat = store::create_category(&conn, scope, "Groceries").unwrap();
    store::create_expense(
        &conn,
        scope,
        Decimal::from(42),
        "milk",
        chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        cat,
        &[],
    )
    .unwrap();

    // Personal scope sees nothing; the group scope sees the record.
    let start = chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let mine = store::find_expenses(&conn, Scope::User(owner), start, end).unwrap();
    assert!(mine.is_empty());
    let shared = store::find_expenses(&conn, scope, start, end).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].amount, Decimal::from(42));
}
