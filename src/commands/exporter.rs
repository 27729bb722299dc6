// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::store::{self, TransactionFilter};
use crate::utils::required_arg;
use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Column order shared by CSV export and import.
pub const CSV_HEADER: [&str; 13] = [
    "id",
    "date",
    "description",
    "amount",
    "direction",
    "category",
    "payment_method",
    "expense_kind",
    "card_id",
    "recurring",
    "installment_current",
    "installment_total",
    "notes",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

pub fn csv_record(t: &Transaction) -> [String; 13] {
    [
        t.id.clone(),
        t.date.to_string(),
        t.description.clone(),
        t.amount.to_string(),
        t.direction.as_str().to_string(),
        t.category.as_str().to_string(),
        t.payment_method.as_str().to_string(),
        t.expense_kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
        t.card_id.clone().unwrap_or_default(),
        t.recurring.to_string(),
        t.installment.map(|i| i.current.to_string()).unwrap_or_default(),
        t.installment.map(|i| i.total.to_string()).unwrap_or_default(),
        t.notes.clone().unwrap_or_default(),
    ]
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    // Oldest first reads naturally in a spreadsheet.
    let mut txs = store::list_transactions(conn, &TransactionFilter::default())?;
    txs.reverse();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(CSV_HEADER)?;
        for t in &txs {
            wtr.write_record(csv_record(t))?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&txs)?)?;
    }
    tracing::info!(count = txs.len(), format = %fmt, out, "exported transactions");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
