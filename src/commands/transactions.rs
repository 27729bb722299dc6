// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Direction, ExpenseKind, Installment, PaymentMethod, Transaction};
use crate::settings::Settings;
use crate::store::{self, TransactionFilter, TransactionPatch};
use crate::utils::{
    fmt_money, maybe_print_json, optional_arg, parse_date, parse_decimal, pretty_table,
    required_arg,
};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Parses `CURRENT/TOTAL`.
pub fn parse_installment(s: &str) -> Result<Installment> {
    let (current, total) = s
        .trim()
        .split_once('/')
        .ok_or_else(|| anyhow!("Invalid installment '{}', expected CURRENT/TOTAL", s))?;
    let current: u32 = current
        .trim()
        .parse()
        .with_context(|| format!("Invalid installment '{}'", s))?;
    let total: u32 = total
        .trim()
        .parse()
        .with_context(|| format!("Invalid installment '{}'", s))?;
    Ok(Installment { current, total })
}

/// Month/year narrowing shared by listing and dashboard commands.
/// `--month` takes `YYYY-MM` (which also fixes the year) or a bare `MM`.
pub fn period_filter(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter {
        year: sub.get_one::<i32>("year").copied(),
        ..Default::default()
    };
    if let Some(raw) = optional_arg(sub, "month") {
        let (year, month) = match raw.split_once('-') {
            Some((y, m)) => (
                Some(
                    y.parse::<i32>()
                        .with_context(|| format!("Invalid month '{}'", raw))?,
                ),
                m,
            ),
            None => (None, raw),
        };
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month '{}'", raw))?;
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Invalid month '{}'", raw));
        }
        filter.month = Some(month);
        if year.is_some() {
            filter.year = year;
        }
    }
    Ok(filter)
}

pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = period_filter(sub)?;
    filter.direction = optional_arg(sub, "direction")
        .map(str::parse::<Direction>)
        .transpose()?;
    filter.category = optional_arg(sub, "category")
        .map(str::parse::<Category>)
        .transpose()?;
    filter.payment_method = optional_arg(sub, "payment")
        .map(str::parse::<PaymentMethod>)
        .transpose()?;
    filter.card_id = optional_arg(sub, "card").map(str::to_string);
    filter.search = optional_arg(sub, "search").map(str::to_string);
    filter.limit = sub.get_one::<usize>("limit").copied();
    Ok(filter)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let direction: Direction = required_arg(sub, "direction")?.parse()?;
    let t = Transaction {
        id: store::new_id(),
        description: required_arg(sub, "description")?.to_string(),
        amount: parse_decimal(required_arg(sub, "amount")?)?,
        date: parse_date(required_arg(sub, "date")?)?,
        direction,
        category: required_arg(sub, "category")?.parse()?,
        payment_method: required_arg(sub, "payment")?.parse()?,
        expense_kind: optional_arg(sub, "kind")
            .map(str::parse::<ExpenseKind>)
            .transpose()?,
        card_id: optional_arg(sub, "card").map(str::to_string),
        recurring: sub.get_flag("recurring"),
        installment: optional_arg(sub, "installment")
            .map(parse_installment)
            .transpose()?,
        notes: optional_arg(sub, "notes").map(str::to_string),
    };
    store::insert_transaction(conn, &t).context("Could not record the transaction")?;
    let ccy = Settings::load(conn)?.currency;
    println!(
        "Recorded {} {} on {} '{}' (id: {})",
        t.direction.label().to_lowercase(),
        fmt_money(&t.amount, &ccy),
        t.date,
        t.description,
        t.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_matches(sub)?;
    let data = store::list_transactions(conn, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows: Vec<Vec<String>> = data.iter().map(|t| table_row(t, &ccy)).collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Description",
                    "Amount",
                    "Type",
                    "Category",
                    "Payment",
                    "Kind",
                    "Id"
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn table_row(t: &Transaction, ccy: &str) -> Vec<String> {
    vec![
        t.date.to_string(),
        t.description.clone(),
        fmt_money(&t.signed_amount(), ccy),
        t.direction.label().to_string(),
        t.category.label().to_string(),
        t.payment_method.label().to_string(),
        t.expense_kind
            .map(|k| k.label().to_string())
            .unwrap_or_default(),
        t.id.clone(),
    ]
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    let t = store::get_transaction(conn, id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let ccy = Settings::load(conn)?.currency;
    let rows = vec![
        vec!["Id".into(), t.id.clone()],
        vec!["Date".into(), t.date.to_string()],
        vec!["Description".into(), t.description.clone()],
        vec!["Amount".into(), fmt_money(&t.amount, &ccy)],
        vec!["Type".into(), t.direction.label().into()],
        vec!["Category".into(), t.category.label().into()],
        vec!["Payment".into(), t.payment_method.label().into()],
        vec![
            "Kind".into(),
            t.expense_kind.map(|k| k.label()).unwrap_or("-").into(),
        ],
        vec!["Card".into(), t.card_id.clone().unwrap_or_else(|| "-".into())],
        vec!["Recurring".into(), if t.recurring { "yes" } else { "no" }.into()],
        vec![
            "Installment".into(),
            t.installment
                .map(|i| format!("{}/{}", i.current, i.total))
                .unwrap_or_else(|| "-".into()),
        ],
        vec!["Notes".into(), t.notes.clone().unwrap_or_default()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

pub fn patch_from_matches(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    let mut patch = TransactionPatch {
        description: optional_arg(sub, "description").map(str::to_string),
        amount: optional_arg(sub, "amount").map(parse_decimal).transpose()?,
        date: optional_arg(sub, "date").map(parse_date).transpose()?,
        direction: optional_arg(sub, "direction")
            .map(str::parse::<Direction>)
            .transpose()?,
        category: optional_arg(sub, "category")
            .map(str::parse::<Category>)
            .transpose()?,
        payment_method: optional_arg(sub, "payment")
            .map(str::parse::<PaymentMethod>)
            .transpose()?,
        recurring: sub.get_one::<bool>("recurring").copied(),
        ..Default::default()
    };
    if sub.get_flag("clear-kind") {
        patch.expense_kind = Some(None);
    } else if let Some(k) = optional_arg(sub, "kind") {
        patch.expense_kind = Some(Some(k.parse()?));
    }
    if sub.get_flag("clear-card") {
        patch.card_id = Some(None);
    } else if let Some(c) = optional_arg(sub, "card") {
        patch.card_id = Some(Some(c.to_string()));
    }
    if sub.get_flag("clear-installment") {
        patch.installment = Some(None);
    } else if let Some(i) = optional_arg(sub, "installment") {
        patch.installment = Some(Some(parse_installment(i)?));
    }
    if sub.get_flag("clear-notes") {
        patch.notes = Some(None);
    } else if let Some(n) = optional_arg(sub, "notes") {
        patch.notes = Some(Some(n.to_string()));
    }
    Ok(patch)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    let patch = patch_from_matches(sub)?;
    if patch.is_empty() {
        println!("Nothing to change for {}", id);
        return Ok(());
    }
    let t = store::update_transaction(conn, id, &patch)
        .with_context(|| format!("Could not update transaction {}", id))?;
    println!("Updated '{}' (id: {})", t.description, t.id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    store::delete_transaction(conn, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
