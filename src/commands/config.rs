// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::settings::{self, Settings};
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = required_arg(sub, "key")?;
            println!("{}", Settings::load(conn)?.value_of(key)?);
        }
        Some(("set", sub)) => {
            let key = required_arg(sub, "key")?;
            let value = settings::set(conn, key, required_arg(sub, "value")?)?;
            println!("{} = {}", key, value);
        }
        Some(("list", sub)) => {
            let s = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let mut rows = Vec::new();
                for key in settings::KEYS {
                    rows.push(vec![key.to_string(), s.value_of(key)?]);
                }
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
