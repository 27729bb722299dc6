// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::card_usage;
use crate::models::Card;
use crate::settings::Settings;
use crate::store::{self, CardPatch, TransactionFilter};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, optional_arg, parse_decimal, pretty_table,
    required_arg,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("usage", sub)) => usage(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let card = Card {
        id: store::new_id(),
        name: required_arg(sub, "name")?.to_string(),
        brand: required_arg(sub, "brand")?.to_string(),
        limit: parse_decimal(required_arg(sub, "limit")?)?,
        closing_day: *sub.get_one::<u32>("closing-day").unwrap_or(&0),
        due_day: *sub.get_one::<u32>("due-day").unwrap_or(&0),
        color: optional_arg(sub, "color").unwrap_or_default().to_string(),
    };
    store::insert_card(conn, &card).context("Could not add the card")?;
    println!("Added card '{}' (id: {})", card.name, card.id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cards = store::list_cards(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = cards
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.brand.clone(),
                    fmt_money(&c.limit, &ccy),
                    c.closing_day.to_string(),
                    c.due_day.to_string(),
                    c.color.clone(),
                    c.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Brand", "Limit", "Closes", "Due", "Color", "Id"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    let patch = CardPatch {
        name: optional_arg(sub, "name").map(str::to_string),
        brand: optional_arg(sub, "brand").map(str::to_string),
        limit: optional_arg(sub, "limit").map(parse_decimal).transpose()?,
        closing_day: sub.get_one::<u32>("closing-day").copied(),
        due_day: sub.get_one::<u32>("due-day").copied(),
        color: optional_arg(sub, "color").map(str::to_string),
    };
    let card = store::update_card(conn, id, &patch)
        .with_context(|| format!("Could not update card {}", id))?;
    println!("Updated card '{}'", card.name);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    store::delete_card(conn, id)?;
    println!("Deleted card {}", id);
    Ok(())
}

fn usage(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let cards = store::list_cards(conn)?;
    let txs = store::list_transactions(conn, &TransactionFilter::default())?;
    let overview = card_usage(&cards, &txs, settings.high_utilization_percent);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview)? {
        return Ok(());
    }
    let ccy = &settings.currency;
    let flag = |high: bool| if high { "high" } else { "" }.to_string();
    let mut rows: Vec<Vec<String>> = overview
        .cards
        .iter()
        .map(|u| {
            vec![
                u.name.clone(),
                fmt_money(&u.limit, ccy),
                fmt_money(&u.used, ccy),
                fmt_money(&u.available, ccy),
                fmt_percent(u.percent_used),
                flag(u.high_utilization),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        fmt_money(&overview.total_limit, ccy),
        fmt_money(&overview.total_used, ccy),
        fmt_money(&(overview.total_limit - overview.total_used), ccy),
        fmt_percent(overview.percent_used),
        flag(overview.high_utilization),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Card", "Limit", "Used", "Available", "Used %", "Alert"],
            rows
        )
    );
    Ok(())
}
