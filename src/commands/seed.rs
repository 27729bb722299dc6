// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Demonstration records: two cards and a month of activity.

use crate::models::{Card, Category, Direction, ExpenseKind, PaymentMethod, Transaction};
use crate::store;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection) -> Result<()> {
    let (cards, txs) = seed(conn)?;
    println!("Seeded {} cards and {} transactions", cards, txs);
    Ok(())
}

fn day(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("invalid date {}-{}-{}", y, m, d))
}

fn card(id: &str, name: &str, brand: &str, limit: i64, closing: u32, due: u32, color: &str) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        limit: Decimal::from(limit),
        closing_day: closing,
        due_day: due,
        color: color.to_string(),
    }
}

pub fn demo_cards() -> Vec<Card> {
    vec![
        card("1", "Nubank", "Mastercard", 5000, 3, 10, "#8a05be"),
        card("2", "Itaú", "Visa", 8000, 25, 5, "#ec7000"),
    ]
}

pub fn demo_transactions() -> Result<Vec<Transaction>> {
    let base = |id: &str, description: &str, amount: i64, date: NaiveDate| Transaction {
        id: id.to_string(),
        description: description.to_string(),
        amount: Decimal::from(amount),
        date,
        direction: Direction::Expense,
        category: Category::Other,
        payment_method: PaymentMethod::WireTransfer,
        expense_kind: None,
        card_id: None,
        recurring: false,
        installment: None,
        notes: None,
    };
    Ok(vec![
        Transaction {
            direction: Direction::Income,
            recurring: true,
            ..base("1", "Salary", 5000, day(2025, 5, 5)?)
        },
        Transaction {
            category: Category::Housing,
            expense_kind: Some(ExpenseKind::Fixed),
            recurring: true,
            ..base("2", "Rent", 1200, day(2025, 5, 10)?)
        },
        Transaction {
            category: Category::Food,
            payment_method: PaymentMethod::Credit,
            expense_kind: Some(ExpenseKind::Variable),
            card_id: Some("1".into()),
            ..base("3", "Groceries", 500, day(2025, 5, 12)?)
        },
        Transaction {
            category: Category::Education,
            payment_method: PaymentMethod::Credit,
            expense_kind: Some(ExpenseKind::Fixed),
            card_id: Some("1".into()),
            recurring: true,
            ..base("4", "English course", 300, day(2025, 5, 15)?)
        },
        Transaction {
            direction: Direction::Income,
            payment_method: PaymentMethod::InstantTransfer,
            ..base("5", "Freelance", 1200, day(2025, 5, 18)?)
        },
    ])
}

/// Load the demonstration records. Refuses to touch a database that already
/// holds transactions or cards.
pub fn seed(conn: &mut Connection) -> Result<(usize, usize)> {
    let existing = store::count_transactions(conn)? + store::list_cards(conn)?.len() as i64;
    if existing > 0 {
        return Err(anyhow!("Database already has records; seed only works on an empty one"));
    }
    let cards = demo_cards();
    let txs = demo_transactions()?;
    let tx = conn.transaction()?;
    for c in &cards {
        store::insert_card(&tx, c)?;
    }
    for t in &txs {
        store::insert_transaction(&tx, t)?;
    }
    tx.commit()?;
    tracing::info!(cards = cards.len(), transactions = txs.len(), "seeded demo data");
    Ok((cards.len(), txs.len()))
}
