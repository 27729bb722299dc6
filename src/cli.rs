// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

/// Upper bound for `--months` on the dashboard views (100 years).
pub const MAX_MONTHS: i64 = 1200;

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn period_args() -> [Arg; 2] {
    [
        Arg::new("month")
            .long("month")
            .help("Only records from this month: YYYY-MM, or MM for any year"),
        Arg::new("year")
            .long("year")
            .value_parser(value_parser!(i32))
            .help("Only records from this year"),
    ]
}

fn transaction_field_args() -> Vec<Arg> {
    vec![
        Arg::new("date").long("date").help("YYYY-MM-DD or DD/MM/YYYY"),
        Arg::new("description").long("description").short('d'),
        Arg::new("amount").long("amount").short('a').help("Positive amount"),
        Arg::new("direction")
            .long("direction")
            .help("income|expense (receita|despesa also accepted)"),
        Arg::new("category").long("category").short('c'),
        Arg::new("payment").long("payment").short('p').help("Payment method"),
        Arg::new("kind").long("kind").help("Expense kind: fixed|variable"),
        Arg::new("card").long("card").help("Card id, required for credit"),
        Arg::new("installment")
            .long("installment")
            .help("Installment position as CURRENT/TOTAL, e.g. 2/10"),
        Arg::new("notes").long("notes"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("finpanel")
        .about("Personal finance dashboard for the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(Command::new("seed").about("Load demonstration records into an empty database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .args(transaction_field_args())
                        .mut_arg("date", |a| a.required(true))
                        .mut_arg("description", |a| a.required(true))
                        .mut_arg("amount", |a| a.required(true))
                        .mut_arg("direction", |a| a.required(true))
                        .mut_arg("category", |a| a.default_value("other"))
                        .mut_arg("payment", |a| a.default_value("other"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("direction").long("direction"))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("payment").long("payment").short('p'))
                        .arg(Arg::new("card").long("card"))
                        .arg(Arg::new("search").long("search").short('s'))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one transaction")
                        .arg(Arg::new("id").long("id").required(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction")
                        .arg(Arg::new("id").long("id").required(true))
                        .args(transaction_field_args())
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .value_parser(value_parser!(bool))
                                .help("true|false"),
                        )
                        .arg(Arg::new("clear-kind").long("clear-kind").action(ArgAction::SetTrue))
                        .arg(Arg::new("clear-card").long("clear-card").action(ArgAction::SetTrue))
                        .arg(
                            Arg::new("clear-installment")
                                .long("clear-installment")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("clear-notes")
                                .long("clear-notes")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand(
                    Command::new("add")
                        .about("Register a card")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("brand").long("brand").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(
                            Arg::new("closing-day")
                                .long("closing-day")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("due-day")
                                .long("due-day")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("color").long("color").default_value("#1e88e5")),
                )
                .subcommand(Command::new("list").about("List cards").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a card")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("brand").long("brand"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(
                            Arg::new("closing-day")
                                .long("closing-day")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("due-day")
                                .long("due-day")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a card that no transaction references")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("usage")
                        .about("Credit used against each card limit")
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Summaries computed from the recorded transactions")
                .subcommand(
                    Command::new("summary")
                        .about("Income, expense, balance and related totals")
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("breakdown")
                        .about("Spending grouped by category or payment method")
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .value_parser(["category", "payment"])
                                .default_value("category"),
                        )
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("donut")
                        .about("Donut chart angles for a breakdown")
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .value_parser(["category", "payment", "direction"])
                                .default_value("category"),
                        )
                        .args(period_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("cashflow")
                        .about("Recorded income and expense per month")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32).range(1..=MAX_MONTHS))
                                .default_value("6"),
                        )
                        .arg(Arg::new("end").long("end").help("Last month, YYYY-MM"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .about("Illustrative monthly trend (randomly generated, not history)")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32).range(1..=MAX_MONTHS))
                                .default_value("6"),
                        )
                        .arg(Arg::new("end").long("end").help("Last month, YYYY-MM"))
                        .arg(
                            Arg::new("seed")
                                .long("seed")
                                .value_parser(value_parser!(u64))
                                .help("Fix the random generator for repeatable output"),
                        )
                        .args(period_args())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export records").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").about("Import records").subcommand(
                Command::new("transactions")
                    .about("Import transactions from a CSV file with a header row")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Preferences")
                .subcommand(
                    Command::new("get").arg(Arg::new("key").long("key").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(Command::new("list").args(json_args())),
        )
}
