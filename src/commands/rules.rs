// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use regex::Regex;
use rusqlite::{Connection, params};

use crate::commands::acting_context;
use crate::store;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let (_, scope) = acting_context(conn, sub)?;
            let pattern = sub.get_one::<String>("pattern").unwrap().trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
            let cat = sub.get_one::<String>("category").unwrap();
            let cat_id = store::category_id_by_name(conn, scope, cat)?;
            conn.execute(
                "INSERT INTO rules(pattern, category_id) VALUES (?1,?2)",
                params![pattern, cat_id],
            )?;
            println!("Added rule: /{}/ -> '{}'", pattern, cat);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT id, pattern,
                        COALESCE((SELECT name FROM categories WHERE id=category_id),'')
                 FROM rules ORDER BY id DESC",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, pat, cat) = row?;
                data.push(vec![id.to_string(), pat, cat]);
            }
            println!("{}", pretty_table(&["ID", "Pattern", "Category"], data));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
