// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store for transactions and cards.
//!
//! Every write validates the record first; reads turn stored text back into
//! the typed model and report anything unparseable as [`StoreError::Corrupt`].

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Card, Category, Direction, ExpenseKind, Installment, PaymentMethod, Transaction,
};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn parse_column<T: FromStr>(column: &'static str, value: String) -> StoreResult<T> {
    match value.parse::<T>() {
        Ok(v) => Ok(v),
        Err(_) => Err(StoreError::Corrupt { column, value }),
    }
}

const TX_COLUMNS: &str = "id, description, amount, date, direction, category, payment_method, \
     expense_kind, card_id, recurring, installment_current, installment_total, notes";

fn transaction_from_row(r: &Row<'_>) -> StoreResult<Transaction> {
    let expense_kind: Option<String> = r.get(7)?;
    let installment_current: Option<u32> = r.get(10)?;
    let installment_total: Option<u32> = r.get(11)?;
    Ok(Transaction {
        id: r.get(0)?,
        description: r.get(1)?,
        amount: parse_column::<Decimal>("amount", r.get(2)?)?,
        date: parse_column::<NaiveDate>("date", r.get(3)?)?,
        direction: parse_column::<Direction>("direction", r.get(4)?)?,
        category: parse_column::<Category>("category", r.get(5)?)?,
        payment_method: parse_column::<PaymentMethod>("payment_method", r.get(6)?)?,
        expense_kind: expense_kind
            .map(|k| parse_column::<ExpenseKind>("expense_kind", k))
            .transpose()?,
        card_id: r.get(8)?,
        recurring: r.get(9)?,
        installment: match (installment_current, installment_total) {
            (Some(current), Some(total)) => Some(Installment { current, total }),
            _ => None,
        },
        notes: r.get(12)?,
    })
}

fn ensure_card_exists(conn: &Connection, card_id: Option<&str>) -> StoreResult<()> {
    let Some(id) = card_id else {
        return Ok(());
    };
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM cards WHERE id=?1", params![id], |r| r.get(0))
        .optional()?;
    if found.is_none() {
        return Err(StoreError::NotFound {
            kind: "card",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> StoreResult<()> {
    t.validate()?;
    ensure_card_exists(conn, t.card_id.as_deref())?;
    conn.execute(
        "INSERT INTO transactions(id, description, amount, date, direction, category, \
         payment_method, expense_kind, card_id, recurring, installment_current, \
         installment_total, notes) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            t.id,
            t.description.trim(),
            t.amount.to_string(),
            t.date.to_string(),
            t.direction.as_str(),
            t.category.as_str(),
            t.payment_method.as_str(),
            t.expense_kind.map(|k| k.as_str()),
            t.card_id,
            t.recurring,
            t.installment.map(|i| i.current),
            t.installment.map(|i| i.total),
            t.notes,
        ],
    )?;
    tracing::info!(id = %t.id, amount = %t.amount, direction = t.direction.as_str(), "transaction recorded");
    Ok(())
}

pub fn get_transaction(conn: &Connection, id: &str) -> StoreResult<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => transaction_from_row(r),
        None => Err(StoreError::NotFound {
            kind: "transaction",
            id: id.to_string(),
        }),
    }
}

/// Changes to apply to a stored transaction. `None` keeps the stored value;
/// the nested options on nullable fields allow clearing them.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub direction: Option<Direction>,
    pub category: Option<Category>,
    pub payment_method: Option<PaymentMethod>,
    pub expense_kind: Option<Option<ExpenseKind>>,
    pub card_id: Option<Option<String>>,
    pub recurring: Option<bool>,
    pub installment: Option<Option<Installment>>,
    pub notes: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.direction.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
            && self.expense_kind.is_none()
            && self.card_id.is_none()
            && self.recurring.is_none()
            && self.installment.is_none()
            && self.notes.is_none()
    }

    pub fn apply(&self, t: &mut Transaction) {
        if let Some(v) = &self.description {
            t.description = v.clone();
        }
        if let Some(v) = self.amount {
            t.amount = v;
        }
        if let Some(v) = self.date {
            t.date = v;
        }
        if let Some(v) = self.direction {
            t.direction = v;
            // turning an expense into income drops its kind unless set explicitly
            if v == Direction::Income && self.expense_kind.is_none() {
                t.expense_kind = None;
            }
        }
        if let Some(v) = self.category {
            t.category = v;
        }
        if let Some(v) = self.payment_method {
            t.payment_method = v;
        }
        if let Some(v) = self.expense_kind {
            t.expense_kind = v;
        }
        if let Some(v) = &self.card_id {
            t.card_id = v.clone();
        }
        if let Some(v) = self.recurring {
            t.recurring = v;
        }
        if let Some(v) = self.installment {
            t.installment = v;
        }
        if let Some(v) = &self.notes {
            t.notes = v.clone();
        }
    }
}

pub fn update_transaction(
    conn: &Connection,
    id: &str,
    patch: &TransactionPatch,
) -> StoreResult<Transaction> {
    let mut t = get_transaction(conn, id)?;
    patch.apply(&mut t);
    t.validate()?;
    ensure_card_exists(conn, t.card_id.as_deref())?;
    conn.execute(
        "UPDATE transactions SET description=?2, amount=?3, date=?4, direction=?5, category=?6, \
         payment_method=?7, expense_kind=?8, card_id=?9, recurring=?10, installment_current=?11, \
         installment_total=?12, notes=?13 WHERE id=?1",
        params![
            t.id,
            t.description.trim(),
            t.amount.to_string(),
            t.date.to_string(),
            t.direction.as_str(),
            t.category.as_str(),
            t.payment_method.as_str(),
            t.expense_kind.map(|k| k.as_str()),
            t.card_id,
            t.recurring,
            t.installment.map(|i| i.current),
            t.installment.map(|i| i.total),
            t.notes,
        ],
    )?;
    tracing::info!(id, "transaction updated");
    Ok(t)
}

pub fn delete_transaction(conn: &Connection, id: &str) -> StoreResult<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::NotFound {
            kind: "transaction",
            id: id.to_string(),
        });
    }
    tracing::info!(id, "transaction deleted");
    Ok(())
}

/// Narrowing applied when listing transactions. Empty means everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub direction: Option<Direction>,
    pub category: Option<Category>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<String>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// Transactions matching `filter`, newest first.
pub fn list_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> StoreResult<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TX_COLUMNS);
    let mut values: Vec<Value> = Vec::new();

    if let Some(d) = filter.direction {
        sql.push_str(" AND direction=?");
        values.push(Value::Text(d.as_str().into()));
    }
    if let Some(c) = filter.category {
        sql.push_str(" AND category=?");
        values.push(Value::Text(c.as_str().into()));
    }
    if let Some(p) = filter.payment_method {
        sql.push_str(" AND payment_method=?");
        values.push(Value::Text(p.as_str().into()));
    }
    if let Some(card) = &filter.card_id {
        sql.push_str(" AND card_id=?");
        values.push(Value::Text(card.clone()));
    }
    if let Some(m) = filter.month {
        sql.push_str(" AND substr(date,6,2)=?");
        values.push(Value::Text(format!("{:02}", m)));
    }
    if let Some(y) = filter.year {
        sql.push_str(" AND substr(date,1,4)=?");
        values.push(Value::Text(format!("{:04}", y)));
    }
    if let Some(q) = filter.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        sql.push_str(" AND lower(description) LIKE ?");
        values.push(Value::Text(format!("%{}%", q.to_lowercase())));
    }
    sql.push_str(" ORDER BY date DESC, seq DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        values.push(Value::Integer(limit as i64));
    }

    tracing::debug!(%sql, "listing transactions");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(values.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(transaction_from_row(r)?);
    }
    tracing::debug!(count = data.len(), "transactions loaded");
    Ok(data)
}

pub fn count_transactions(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?)
}

const CARD_COLUMNS: &str = "id, name, brand, credit_limit, closing_day, due_day, color";

fn card_from_row(r: &Row<'_>) -> StoreResult<Card> {
    Ok(Card {
        id: r.get(0)?,
        name: r.get(1)?,
        brand: r.get(2)?,
        limit: parse_column::<Decimal>("credit_limit", r.get(3)?)?,
        closing_day: r.get(4)?,
        due_day: r.get(5)?,
        color: r.get(6)?,
    })
}

pub fn insert_card(conn: &Connection, c: &Card) -> StoreResult<()> {
    c.validate()?;
    conn.execute(
        "INSERT INTO cards(id, name, brand, credit_limit, closing_day, due_day, color) \
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            c.id,
            c.name.trim(),
            c.brand.trim(),
            c.limit.to_string(),
            c.closing_day,
            c.due_day,
            c.color,
        ],
    )?;
    tracing::info!(id = %c.id, name = %c.name, "card added");
    Ok(())
}

pub fn get_card(conn: &Connection, id: &str) -> StoreResult<Card> {
    let sql = format!("SELECT {} FROM cards WHERE id=?1", CARD_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => card_from_row(r),
        None => Err(StoreError::NotFound {
            kind: "card",
            id: id.to_string(),
        }),
    }
}

pub fn list_cards(conn: &Connection) -> StoreResult<Vec<Card>> {
    let sql = format!("SELECT {} FROM cards ORDER BY name, id", CARD_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(card_from_row(r)?);
    }
    Ok(data)
}

#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub limit: Option<Decimal>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
    pub color: Option<String>,
}

impl CardPatch {
    pub fn apply(&self, c: &mut Card) {
        if let Some(v) = &self.name {
            c.name = v.clone();
        }
        if let Some(v) = &self.brand {
            c.brand = v.clone();
        }
        if let Some(v) = self.limit {
            c.limit = v;
        }
        if let Some(v) = self.closing_day {
            c.closing_day = v;
        }
        if let Some(v) = self.due_day {
            c.due_day = v;
        }
        if let Some(v) = &self.color {
            c.color = v.clone();
        }
    }
}

pub fn update_card(conn: &Connection, id: &str, patch: &CardPatch) -> StoreResult<Card> {
    let mut c = get_card(conn, id)?;
    patch.apply(&mut c);
    c.validate()?;
    conn.execute(
        "UPDATE cards SET name=?2, brand=?3, credit_limit=?4, closing_day=?5, due_day=?6, \
         color=?7 WHERE id=?1",
        params![
            c.id,
            c.name.trim(),
            c.brand.trim(),
            c.limit.to_string(),
            c.closing_day,
            c.due_day,
            c.color,
        ],
    )?;
    tracing::info!(id, "card updated");
    Ok(c)
}

/// Remove a card. Cards still referenced by transactions are kept.
pub fn delete_card(conn: &Connection, id: &str) -> StoreResult<()> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE card_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if count > 0 {
        tracing::warn!(id, count, "refusing to delete card in use");
        return Err(StoreError::CardInUse {
            id: id.to_string(),
            count,
        });
    }
    let n = conn.execute("DELETE FROM cards WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::NotFound {
            kind: "card",
            id: id.to_string(),
        });
    }
    tracing::info!(id, "card deleted");
    Ok(())
}
