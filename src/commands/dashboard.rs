// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Display;

use crate::aggregate::{
    breakdown_by_category, breakdown_by_payment_method, compute_summary_with, direction_split,
    donut_segments, monthly_totals, synthetic_monthly_series, trailing_month_labels,
    BreakdownEntry, DonutSegment, SegmentLabel,
};
use crate::commands::transactions::period_filter;
use crate::models::Transaction;
use crate::settings::Settings;
use crate::store::{self, TransactionFilter};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, optional_arg, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("donut", sub)) => donut(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn load(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let txs = store::list_transactions(conn, filter)?;
    tracing::debug!(count = txs.len(), "aggregating transactions");
    Ok(txs)
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let txs = load(conn, &period_filter(sub)?)?;
    let s = compute_summary_with(&txs, &settings.summary_options());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = &settings.currency;
    let rows = [
        ("Income", s.total_income),
        ("Expense", s.total_expense),
        ("Balance", s.balance),
        ("Fixed expense", s.total_fixed_expense),
        ("Variable expense", s.total_variable_expense),
        ("Credit card", s.total_credit_card),
        ("Emergency reserve", s.total_reserve),
        ("Investments", s.total_investments),
    ]
    .into_iter()
    .map(|(name, v)| vec![name.to_string(), fmt_money(&v, ccy)])
    .collect();
    println!("{}", pretty_table(&["Total", "Amount"], rows));
    Ok(())
}

fn breakdown_rows<K: Display>(entries: &[BreakdownEntry<K>], ccy: &str) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            vec![
                e.key.to_string(),
                fmt_money(&e.total, ccy),
                fmt_percent(e.percentage),
            ]
        })
        .collect()
}

fn print_breakdown<K: Display + Serialize>(
    sub: &clap::ArgMatches,
    header: &str,
    entries: &[BreakdownEntry<K>],
    ccy: &str,
) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        println!(
            "{}",
            pretty_table(&[header, "Spent", "Share"], breakdown_rows(entries, ccy))
        );
    }
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let txs = load(conn, &period_filter(sub)?)?;
    let by = optional_arg(sub, "by").unwrap_or("category");
    match by {
        "category" => print_breakdown(
            sub,
            "Category",
            &breakdown_by_category(&txs),
            &settings.currency,
        ),
        "payment" => print_breakdown(
            sub,
            "Payment method",
            &breakdown_by_payment_method(&txs),
            &settings.currency,
        ),
        other => Err(anyhow!("Unknown breakdown '{}'", other)),
    }
}

fn print_segments<K: Display + Serialize>(
    sub: &clap::ArgMatches,
    segments: &[DonutSegment<K>],
) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &segments)? {
        return Ok(());
    }
    let rows = segments
        .iter()
        .map(|s| {
            let label = match &s.label {
                SegmentLabel::Key(k) => k.to_string(),
                SegmentLabel::NoData => "(no data)".to_string(),
            };
            vec![
                label,
                format!("{:.2}", s.start_angle_deg),
                format!("{:.2}", s.sweep_angle_deg),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Segment", "Start°", "Sweep°"], rows));
    Ok(())
}

fn donut(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let txs = load(conn, &period_filter(sub)?)?;
    match optional_arg(sub, "by").unwrap_or("category") {
        "category" => print_segments(sub, &donut_segments(&breakdown_by_category(&txs))),
        "payment" => print_segments(sub, &donut_segments(&breakdown_by_payment_method(&txs))),
        "direction" => {
            let s = compute_summary_with(&txs, &settings.summary_options());
            print_segments(sub, &donut_segments(&direction_split(&s)))
        }
        other => Err(anyhow!("Unknown donut '{}'", other)),
    }
}

fn end_month(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match optional_arg(sub, "end") {
        Some(m) => parse_month(m),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = Settings::load(conn)?.currency;
    let months = sub.get_one::<u32>("months").copied().unwrap_or(6) as usize;
    let end = end_month(sub)?;
    let txs = load(conn, &TransactionFilter::default())?;
    let data = monthly_totals(&txs, end, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    fmt_money(&m.income, &ccy),
                    fmt_money(&m.expense, &ccy),
                    fmt_money(&m.balance, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct TrendPoint {
    month: String,
    income: Decimal,
    expense: Decimal,
}

#[derive(Serialize)]
struct Trend {
    /// Always true; marks the series as generated rather than recorded.
    synthetic: bool,
    points: Vec<TrendPoint>,
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let months = sub.get_one::<u32>("months").copied().unwrap_or(6) as usize;
    let end = end_month(sub)?;
    let txs = load(conn, &period_filter(sub)?)?;
    let s = compute_summary_with(&txs, &settings.summary_options());

    let mut rng = match sub.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };
    let income = synthetic_monthly_series(s.total_income, months, &mut rng);
    let expense = synthetic_monthly_series(s.total_expense, months, &mut rng);
    let trend = Trend {
        synthetic: true,
        points: trailing_month_labels(end, months)
            .into_iter()
            .zip(income)
            .zip(expense)
            .map(|((month, income), expense)| TrendPoint {
                month,
                income,
                expense,
            })
            .collect(),
    };

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        return Ok(());
    }
    let ccy = &settings.currency;
    let rows = trend
        .points
        .iter()
        .map(|p| {
            vec![
                p.month.clone(),
                fmt_money(&p.income, ccy),
                fmt_money(&p.expense, ccy),
            ]
        })
        .collect();
    println!("Illustrative only: values are randomly generated from current totals.");
    println!("Use `dashboard cashflow` for recorded history.");
    println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    Ok(())
}
