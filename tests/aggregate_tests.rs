// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finpanel::aggregate::{
    breakdown_by, breakdown_by_category, breakdown_by_payment_method, card_usage, compute_summary,
    compute_summary_with, direction_split, donut_segments, monthly_totals,
    synthetic_monthly_series, trailing_month_labels, AggregateSummary, BreakdownEntry,
    SegmentLabel, SummaryOptions, UnclassifiedExpense,
};
use finpanel::commands::seed::{demo_cards, demo_transactions};
use finpanel::models::{
    Category, Direction, ExpenseKind, MAX_AMOUNT, PaymentMethod, Transaction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(direction: Direction, category: Category, amount: &str) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", direction.as_str(), category.as_str(), amount),
        description: "test".into(),
        amount: dec(amount),
        date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        direction,
        category,
        payment_method: PaymentMethod::Debit,
        expense_kind: None,
        card_id: None,
        recurring: false,
        installment: None,
        notes: None,
    }
}

fn expense(category: Category, amount: &str) -> Transaction {
    tx(Direction::Expense, category, amount)
}

fn on(mut t: Transaction, y: i32, m: u32, d: u32) -> Transaction {
    t.date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    t
}

#[test]
fn summary_of_income_and_fixed_expense() {
    let income = tx(Direction::Income, Category::Other, "5000");
    let mut rent = expense(Category::Housing, "3500");
    rent.expense_kind = Some(ExpenseKind::Fixed);

    let s = compute_summary(&[income, rent]);
    assert_eq!(s.total_income, dec("5000"));
    assert_eq!(s.total_expense, dec("3500"));
    assert_eq!(s.balance, dec("1500"));
    assert_eq!(s.total_fixed_expense, dec("3500"));
    assert_eq!(s.total_variable_expense, Decimal::ZERO);
}

#[test]
fn summary_of_nothing_is_all_zero() {
    assert_eq!(compute_summary(&[]), AggregateSummary::default());
    assert!(breakdown_by_category(&[]).is_empty());
    assert!(breakdown_by_payment_method(&[]).is_empty());
}

#[test]
fn balance_is_income_minus_expense() {
    let txs = vec![
        tx(Direction::Income, Category::Other, "1200.55"),
        expense(Category::Food, "99.99"),
        expense(Category::Leisure, "2000"),
        tx(Direction::Income, Category::Investments, "10.01"),
    ];
    let s = compute_summary(&txs);
    assert_eq!(s.balance, s.total_income - s.total_expense);
    assert_eq!(s.balance, dec("-889.43"));
}

#[test]
fn reserve_and_investments_ignore_direction() {
    let txs = vec![
        tx(Direction::Income, Category::Investments, "300"),
        expense(Category::Investments, "200"),
        expense(Category::EmergencyReserve, "150"),
        tx(Direction::Income, Category::EmergencyReserve, "50"),
    ];
    let s = compute_summary(&txs);
    assert_eq!(s.total_investments, dec("500"));
    assert_eq!(s.total_reserve, dec("200"));
}

#[test]
fn credit_card_total_counts_only_credit_expenses() {
    let mut on_card = expense(Category::Food, "120");
    on_card.payment_method = PaymentMethod::Credit;
    on_card.card_id = Some("c1".into());
    let mut refund = tx(Direction::Income, Category::Other, "40");
    refund.payment_method = PaymentMethod::Credit;
    let s = compute_summary(&[on_card, refund, expense(Category::Food, "10")]);
    assert_eq!(s.total_credit_card, dec("120"));
}

#[test]
fn unclassified_expenses_follow_the_policy() {
    let mut fixed = expense(Category::Housing, "100");
    fixed.expense_kind = Some(ExpenseKind::Fixed);
    let unclassified = expense(Category::Food, "40");
    let txs = vec![fixed, unclassified];

    let excluded = compute_summary(&txs);
    assert_eq!(excluded.total_fixed_expense, dec("100"));
    assert_eq!(excluded.total_variable_expense, Decimal::ZERO);

    let as_variable = compute_summary_with(
        &txs,
        &SummaryOptions {
            unclassified_expense: UnclassifiedExpense::Variable,
        },
    );
    assert_eq!(as_variable.total_fixed_expense, dec("100"));
    assert_eq!(as_variable.total_variable_expense, dec("40"));
    assert_eq!(as_variable.total_expense, excluded.total_expense);
}

#[test]
fn category_breakdown_orders_by_total() {
    let txs = vec![
        expense(Category::Food, "100"),
        expense(Category::Housing, "300"),
        expense(Category::Food, "50"),
    ];
    let b = breakdown_by_category(&txs);
    assert_eq!(b.len(), 2);
    assert_eq!(b[0].key, Category::Housing);
    assert_eq!(b[0].total, dec("300"));
    assert!((b[0].percentage - 66.666_666_666).abs() < 1e-6);
    assert_eq!(format!("{:.2}", b[0].percentage), "66.67");
    assert_eq!(b[1].key, Category::Food);
    assert_eq!(b[1].total, dec("150"));
    assert_eq!(format!("{:.2}", b[1].percentage), "33.33");
}

#[test]
fn breakdown_ignores_income() {
    let txs = vec![
        tx(Direction::Income, Category::Food, "1000"),
        expense(Category::Food, "10"),
    ];
    let b = breakdown_by_category(&txs);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].total, dec("10"));
    assert_eq!(b[0].percentage, 100.0);

    let only_income = vec![tx(Direction::Income, Category::Food, "1000")];
    assert!(breakdown_by_category(&only_income).is_empty());
}

#[test]
fn breakdown_percentages_sum_to_one_hundred() {
    let amounts = ["0.01", "13.37", "250", "999.99", "3", "42.42", "7.77"];
    let txs: Vec<Transaction> = amounts
        .iter()
        .zip(Category::ALL)
        .map(|(a, c)| expense(c, a))
        .collect();
    let b = breakdown_by_category(&txs);
    let sum: f64 = b.iter().map(|e| e.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9, "sum was {}", sum);
    assert!(b.windows(2).all(|w| w[0].total >= w[1].total));
}

#[test]
fn breakdown_ties_keep_first_seen_order() {
    let txs = vec![
        expense(Category::Leisure, "20"),
        expense(Category::Health, "50"),
        expense(Category::Transport, "20"),
        expense(Category::Clothing, "20"),
    ];
    let keys: Vec<Category> = breakdown_by_category(&txs).into_iter().map(|e| e.key).collect();
    assert_eq!(
        keys,
        vec![
            Category::Health,
            Category::Leisure,
            Category::Transport,
            Category::Clothing
        ]
    );
}

#[test]
fn zero_total_breakdown_has_zero_percentages() {
    let txs = vec![
        expense(Category::Food, "0"),
        expense(Category::Services, "0"),
    ];
    let b = breakdown_by_category(&txs);
    assert_eq!(b.len(), 2);
    for e in &b {
        assert_eq!(e.percentage, 0.0);
        assert!(e.percentage.is_finite());
    }
}

#[test]
fn breakdown_accepts_arbitrary_keys() {
    let mut a = expense(Category::Food, "10");
    a.description = "Market".into();
    let mut b = expense(Category::Food, "30");
    b.description = "market".into();
    let by_description = breakdown_by(&[a, b], |t| t.description.to_lowercase());
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].key, "market");
    assert_eq!(by_description[0].total, dec("40"));
}

#[test]
fn payment_breakdown_groups_by_method() {
    let mut pix = expense(Category::Food, "25");
    pix.payment_method = PaymentMethod::InstantTransfer;
    let mut credit = expense(Category::Food, "75");
    credit.payment_method = PaymentMethod::Credit;
    credit.card_id = Some("c1".into());
    let b = breakdown_by_payment_method(&[pix, credit]);
    assert_eq!(b[0].key, PaymentMethod::Credit);
    assert_eq!(b[0].percentage, 75.0);
    assert_eq!(b[1].key, PaymentMethod::InstantTransfer);
    assert_eq!(b[1].percentage, 25.0);
}

#[test]
fn donut_segments_are_consecutive_and_close_the_circle() {
    let txs = vec![
        expense(Category::Food, "100"),
        expense(Category::Housing, "300"),
        expense(Category::Food, "50"),
        expense(Category::Transport, "33.33"),
    ];
    let segments = donut_segments(&breakdown_by_category(&txs));
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].start_angle_deg, 0.0);
    for pair in segments.windows(2) {
        let end = pair[0].start_angle_deg + pair[0].sweep_angle_deg;
        assert!((pair[1].start_angle_deg - end).abs() < 1e-9);
    }
    let total: f64 = segments.iter().map(|s| s.sweep_angle_deg).sum();
    assert!((total - 360.0).abs() < 1e-6, "total was {}", total);
    assert_eq!(segments[0].label, SegmentLabel::Key(Category::Housing));
}

#[test]
fn donut_without_data_is_a_single_placeholder() {
    let empty: Vec<BreakdownEntry<Category>> = Vec::new();
    let segments = donut_segments(&empty);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].label, SegmentLabel::NoData);
    assert_eq!(segments[0].start_angle_deg, 0.0);
    assert_eq!(segments[0].sweep_angle_deg, 360.0);

    let zeros = breakdown_by_category(&[expense(Category::Food, "0")]);
    let segments = donut_segments(&zeros);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].label, SegmentLabel::NoData);
}

#[test]
fn direction_split_shares_income_and_expense() {
    let s = compute_summary(&[
        tx(Direction::Income, Category::Other, "6200"),
        expense(Category::Housing, "2000"),
    ]);
    let split = direction_split(&s);
    assert_eq!(split[0].key, Direction::Income);
    assert_eq!(split[1].key, Direction::Expense);
    let sum: f64 = split.iter().map(|e| e.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
    assert!((split[0].percentage - 75.609_756_097).abs() < 1e-6);

    let empty = direction_split(&AggregateSummary::default());
    assert!(empty.iter().all(|e| e.percentage == 0.0));
    let segments = donut_segments(&empty);
    assert_eq!(segments[0].label, SegmentLabel::NoData);
}

#[test]
fn synthetic_series_preserves_total() {
    let totals = ["0", "0.01", "0.6", "1", "3500", "6200.37", "123456789.99"];
    for seed in 0..25u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        for total in totals {
            for n in 1..=12 {
                let total = dec(total);
                let series = synthetic_monthly_series(total, n, &mut rng);
                assert_eq!(series.len(), n);
                assert!(series.iter().all(|v| *v >= Decimal::ZERO));
                let sum: Decimal = series.iter().copied().sum();
                assert!(
                    ((sum - total).to_f64().unwrap()).abs() < 1e-6,
                    "seed {} total {} n {}: {:?}",
                    seed,
                    total,
                    n,
                    series
                );
            }
        }
    }
}

#[test]
fn synthetic_series_stays_near_the_running_average() {
    let mut rng = StdRng::seed_from_u64(42);
    let series = synthetic_monthly_series(dec("6000"), 6, &mut rng);
    // First bucket is drawn from 70%..130% of 6000 / 6.
    assert!(series[0] >= dec("700") && series[0] <= dec("1300"));
}

#[test]
fn synthetic_series_is_repeatable_with_a_seed() {
    let a = synthetic_monthly_series(dec("5000"), 6, &mut StdRng::seed_from_u64(7));
    let b = synthetic_monthly_series(dec("5000"), 6, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}

#[test]
fn synthetic_series_edge_cases() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(synthetic_monthly_series(dec("100"), 0, &mut rng).is_empty());
    assert_eq!(
        synthetic_monthly_series(dec("100"), 1, &mut rng),
        vec![dec("100")]
    );
    assert!(synthetic_monthly_series(dec("-50"), 3, &mut rng)
        .iter()
        .all(|v| v.is_zero()));
}

#[test]
fn monthly_totals_cover_the_trailing_window() {
    let txs = vec![
        on(tx(Direction::Income, Category::Other, "5000"), 2025, 5, 5),
        on(expense(Category::Housing, "1200"), 2025, 5, 10),
        on(expense(Category::Food, "80"), 2025, 3, 31),
        on(tx(Direction::Income, Category::Other, "999"), 2024, 12, 31),
        on(expense(Category::Food, "1"), 2025, 6, 1),
    ];
    let end = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let months = monthly_totals(&txs, end, 4);
    let labels: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(labels, vec!["2025-02", "2025-03", "2025-04", "2025-05"]);
    assert_eq!(months[0].income, Decimal::ZERO);
    assert_eq!(months[1].expense, dec("80"));
    assert_eq!(months[2].balance, Decimal::ZERO);
    assert_eq!(months[3].income, dec("5000"));
    assert_eq!(months[3].expense, dec("1200"));
    assert_eq!(months[3].balance, dec("3800"));

    assert_eq!(
        trailing_month_labels(end, 4),
        labels.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    );
    assert!(monthly_totals(&txs, end, 0).is_empty());
}

#[test]
fn demo_data_summary_and_card_usage() {
    let txs = demo_transactions().unwrap();
    let s = compute_summary(&txs);
    assert_eq!(s.total_income, dec("6200"));
    assert_eq!(s.total_expense, dec("2000"));
    assert_eq!(s.balance, dec("4200"));
    assert_eq!(s.total_fixed_expense, dec("1500"));
    assert_eq!(s.total_variable_expense, dec("500"));
    assert_eq!(s.total_credit_card, dec("800"));

    let usage = card_usage(&demo_cards(), &txs, 70.0);
    assert_eq!(usage.total_limit, dec("13000"));
    assert_eq!(usage.total_used, dec("800"));
    let nubank = usage.cards.iter().find(|c| c.card_id == "1").unwrap();
    assert_eq!(nubank.used, dec("800"));
    assert_eq!(nubank.available, dec("4200"));
    assert_eq!(nubank.percent_used, 16.0);
    assert!(!nubank.high_utilization);
    let itau = usage.cards.iter().find(|c| c.card_id == "2").unwrap();
    assert_eq!(itau.used, Decimal::ZERO);
}

#[test]
fn card_usage_flags_cards_over_threshold() {
    let mut cards = demo_cards();
    cards[1].limit = dec("1000");
    let mut big = expense(Category::Leisure, "750");
    big.payment_method = PaymentMethod::Credit;
    big.card_id = Some("2".into());
    let usage = card_usage(&cards, &[big], 70.0);
    let itau = usage.cards.iter().find(|c| c.card_id == "2").unwrap();
    assert_eq!(itau.percent_used, 75.0);
    assert!(itau.high_utilization);
    assert!(!usage.high_utilization);

    let none = card_usage(&[], &[], 70.0);
    assert_eq!(none.percent_used, 0.0);
    assert!(none.cards.is_empty());
}

#[test]
fn largest_accepted_amounts_aggregate_without_overflow() {
    let mut cards = demo_cards();
    cards[0].limit = MAX_AMOUNT;
    let mut biggest = expense(Category::Food, "1");
    biggest.amount = MAX_AMOUNT;
    biggest.payment_method = PaymentMethod::Credit;
    biggest.card_id = Some("1".into());
    biggest.validate().unwrap();
    let mut income = tx(Direction::Income, Category::Investments, "1");
    income.amount = MAX_AMOUNT;

    let mut txs = vec![biggest; 10_000];
    txs.extend(std::iter::repeat_n(income, 10_000));

    let s = compute_summary(&txs);
    assert_eq!(s.total_expense, MAX_AMOUNT * Decimal::from(10_000));
    assert_eq!(s.balance, Decimal::ZERO);
    assert_eq!(breakdown_by_category(&txs)[0].percentage, 100.0);
    let end = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
    assert_eq!(monthly_totals(&txs, end, 1)[0].income, s.total_income);
    let usage = card_usage(&cards, &txs, 70.0);
    assert_eq!(usage.cards[0].percent_used, 1_000_000.0);
    assert_eq!(
        synthetic_monthly_series(s.total_income, 12, &mut StdRng::seed_from_u64(3))
            .iter()
            .copied()
            .sum::<Decimal>(),
        s.total_income
    );
}

#[test]
fn long_windows_are_not_truncated() {
    let end = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let labels = trailing_month_labels(end, 2000);
    assert_eq!(labels.len(), 2000);
    assert_eq!(labels[0], "1858-10");
    assert_eq!(labels[1999], "2025-05");
    assert_eq!(monthly_totals(&[], end, 2000).len(), 2000);
}
