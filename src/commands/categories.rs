// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::acting_context;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let (_, scope) = acting_context(conn, sub)?;
            let name = sub.get_one::<String>("name").unwrap();
            store::create_category(conn, scope, name)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let (_, scope) = acting_context(conn, sub)?;
            let cats = store::find_categories(conn, scope)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats.iter().map(|c| vec![c.name.clone()]).collect();
                println!("{}", pretty_table(&["Category"], data));
            }
        }
        Some(("rm", sub)) => {
            let (_, scope) = acting_context(conn, sub)?;
            let name = sub.get_one::<String>("name").unwrap();
            store::delete_category(conn, scope, name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
