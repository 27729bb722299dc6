// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::aggregate::{SummaryOptions, UnclassifiedExpense, DEFAULT_HIGH_UTILIZATION_PERCENT};

pub const CURRENCY: &str = "currency";
pub const UNCLASSIFIED_EXPENSE: &str = "unclassified_expense";
pub const HIGH_UTILIZATION_PERCENT: &str = "high_utilization_percent";

pub const KEYS: [&str; 3] = [CURRENCY, UNCLASSIFIED_EXPENSE, HIGH_UTILIZATION_PERCENT];

const DEFAULT_CURRENCY: &str = "BRL";

/// Preferences handed to the aggregation and formatting code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub unclassified_expense: UnclassifiedExpense,
    pub high_utilization_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            unclassified_expense: UnclassifiedExpense::Exclude,
            high_utilization_percent: DEFAULT_HIGH_UTILIZATION_PERCENT,
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_raw(conn, CURRENCY)? {
            s.currency = v;
        }
        if let Some(v) = get_raw(conn, UNCLASSIFIED_EXPENSE)? {
            s.unclassified_expense = parse_policy(&v)?;
        }
        if let Some(v) = get_raw(conn, HIGH_UTILIZATION_PERCENT)? {
            s.high_utilization_percent = parse_percent(&v)?;
        }
        Ok(s)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            unclassified_expense: self.unclassified_expense,
        }
    }

    /// Current value of `key` as text.
    pub fn value_of(&self, key: &str) -> Result<String> {
        match key {
            CURRENCY => Ok(self.currency.clone()),
            UNCLASSIFIED_EXPENSE => Ok(policy_str(self.unclassified_expense).to_string()),
            HIGH_UTILIZATION_PERCENT => Ok(self.high_utilization_percent.to_string()),
            _ => Err(unknown_key(key)),
        }
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!("Unknown setting '{}' (expected one of: {})", key, KEYS.join(", "))
}

fn policy_str(p: UnclassifiedExpense) -> &'static str {
    match p {
        UnclassifiedExpense::Exclude => "exclude",
        UnclassifiedExpense::Variable => "variable",
    }
}

fn parse_policy(s: &str) -> Result<UnclassifiedExpense> {
    match s.trim().to_lowercase().as_str() {
        "exclude" => Ok(UnclassifiedExpense::Exclude),
        "variable" => Ok(UnclassifiedExpense::Variable),
        other => Err(anyhow!(
            "Invalid unclassified expense policy '{}', expected exclude|variable",
            other
        )),
    }
}

fn parse_percent(s: &str) -> Result<f64> {
    let v: f64 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid percentage '{}'", s))?;
    if !(0.0..=100.0).contains(&v) {
        return Err(anyhow!("Percentage must be between 0 and 100 (got {})", v));
    }
    Ok(v)
}

fn get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validate and store one setting, returning the normalised value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let key = key.trim();
    let value = value.trim();
    let normalized = match key {
        CURRENCY => {
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid currency code '{}'", value));
            }
            value.to_uppercase()
        }
        UNCLASSIFIED_EXPENSE => policy_str(parse_policy(value)?).to_string(),
        HIGH_UTILIZATION_PERCENT => parse_percent(value)?.to_string(),
        _ => return Err(unknown_key(key)),
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    tracing::info!(key, value = %normalized, "setting stored");
    Ok(normalized)
}
