// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::parse_installment;
use crate::models::{ExpenseKind, Transaction};
use crate::store;
use crate::utils::{parse_date, parse_decimal, required_arg};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = required_arg(sub, "path")?;
            let n = import_transactions(conn, path)?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let map: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        for required in ["date", "description", "amount", "direction"] {
            if !map.contains_key(required) {
                return Err(anyhow!("CSV header is missing the '{}' column", required));
            }
        }
        Ok(Columns(map))
    }

    /// Trimmed cell, `None` when the column is absent or the cell blank.
    fn get<'r>(&self, rec: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0
            .get(name)
            .and_then(|&i| rec.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn require<'r>(&self, rec: &'r StringRecord, name: &str) -> Result<&'r str> {
        self.get(rec, name)
            .ok_or_else(|| anyhow!("{} missing", name))
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "sim" => Ok(true),
        "false" | "0" | "no" | "não" | "nao" => Ok(false),
        _ => Err(anyhow!("Invalid boolean '{}'", s)),
    }
}

fn record_to_transaction(cols: &Columns, rec: &StringRecord) -> Result<Transaction> {
    let installment = match (
        cols.get(rec, "installment_current"),
        cols.get(rec, "installment_total"),
    ) {
        (Some(c), Some(t)) => Some(parse_installment(&format!("{}/{}", c, t))?),
        (None, None) => None,
        _ => {
            return Err(anyhow!(
                "installment_current and installment_total must be given together"
            ))
        }
    };
    Ok(Transaction {
        id: cols
            .get(rec, "id")
            .map(str::to_string)
            .unwrap_or_else(store::new_id),
        description: cols.require(rec, "description")?.to_string(),
        amount: parse_decimal(cols.require(rec, "amount")?)?,
        date: parse_date(cols.require(rec, "date")?)?,
        direction: cols.require(rec, "direction")?.parse()?,
        category: cols.get(rec, "category").unwrap_or("other").parse()?,
        payment_method: cols.get(rec, "payment_method").unwrap_or("other").parse()?,
        expense_kind: cols
            .get(rec, "expense_kind")
            .map(str::parse::<ExpenseKind>)
            .transpose()?,
        card_id: cols.get(rec, "card_id").map(str::to_string),
        recurring: cols
            .get(rec, "recurring")
            .map(parse_bool)
            .transpose()?
            .unwrap_or(false),
        installment,
        notes: cols.get(rec, "notes").map(str::to_string),
    })
}

/// Import every row of a CSV file in one database transaction. Any bad row
/// aborts the import and nothing is written.
pub fn import_transactions(conn: &mut Connection, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let cols = Columns::from_header(rdr.headers()?)?;

    let tx = conn.transaction()?;
    let mut count = 0;
    for (i, result) in rdr.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let rec = result?;
        let t = record_to_transaction(&cols, &rec).with_context(|| format!("line {}", line))?;
        store::insert_transaction(&tx, &t).with_context(|| format!("line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(count, path, "imported transactions");
    Ok(count)
}
