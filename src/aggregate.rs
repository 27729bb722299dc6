// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation.
//!
//! Every function here is a pure projection of an already-loaded record
//! collection. Nothing is cached or mutated.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Card, Category, Direction, ExpenseKind, PaymentMethod, Transaction};

pub const FULL_CIRCLE_DEG: f64 = 360.0;
const DEGREES_PER_PERCENT: f64 = FULL_CIRCLE_DEG / 100.0;

/// Bounds of the per-bucket perturbation used by [`synthetic_monthly_series`].
const SPREAD_MIN: f64 = 0.7;
const SPREAD_MAX: f64 = 1.3;

pub const DEFAULT_HIGH_UTILIZATION_PERCENT: f64 = 70.0;

/// What to do with expenses that carry no [`ExpenseKind`] when splitting
/// fixed from variable spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedExpense {
    /// Count them in neither bucket.
    #[default]
    Exclude,
    /// Count them as variable spending.
    Variable,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    pub unclassified_expense: UnclassifiedExpense,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub total_fixed_expense: Decimal,
    pub total_variable_expense: Decimal,
    pub total_credit_card: Decimal,
    pub total_reserve: Decimal,
    pub total_investments: Decimal,
}

pub fn compute_summary(transactions: &[Transaction]) -> AggregateSummary {
    compute_summary_with(transactions, &SummaryOptions::default())
}

pub fn compute_summary_with(
    transactions: &[Transaction],
    options: &SummaryOptions,
) -> AggregateSummary {
    let mut s = AggregateSummary::default();
    for t in transactions {
        match t.direction {
            Direction::Income => s.total_income += t.amount,
            Direction::Expense => {
                s.total_expense += t.amount;
                let kind = t.expense_kind.or(match options.unclassified_expense {
                    UnclassifiedExpense::Exclude => None,
                    UnclassifiedExpense::Variable => Some(ExpenseKind::Variable),
                });
                match kind {
                    Some(ExpenseKind::Fixed) => s.total_fixed_expense += t.amount,
                    Some(ExpenseKind::Variable) => s.total_variable_expense += t.amount,
                    None => {}
                }
                if t.payment_method == PaymentMethod::Credit {
                    s.total_credit_card += t.amount;
                }
            }
        }
        // Reserve and investment totals ignore direction.
        match t.category {
            Category::EmergencyReserve => s.total_reserve += t.amount,
            Category::Investments => s.total_investments += t.amount,
            _ => {}
        }
    }
    s.balance = s.total_income - s.total_expense;
    s
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry<K> {
    pub key: K,
    pub total: Decimal,
    pub percentage: f64,
}

/// `part` as a percentage of `whole`, or 0 when `whole` is zero.
pub fn percentage_of(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part / whole * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}

/// Group expense transactions by `key_fn` and annotate each group with its
/// share of total spending.
///
/// Income is ignored. Groups come back largest first; groups with equal
/// totals keep the order in which their key was first seen.
pub fn breakdown_by<K, F>(transactions: &[Transaction], key_fn: F) -> Vec<BreakdownEntry<K>>
where
    K: Clone + Eq + Hash,
    F: Fn(&Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Decimal)> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let key = key_fn(t);
        match index.entry(key.clone()) {
            Entry::Occupied(e) => groups[*e.get()].1 += t.amount,
            Entry::Vacant(e) => {
                e.insert(groups.len());
                groups.push((key, t.amount));
            }
        }
    }

    let grand_total: Decimal = groups.iter().map(|(_, total)| *total).sum();
    let mut entries: Vec<BreakdownEntry<K>> = groups
        .into_iter()
        .map(|(key, total)| BreakdownEntry {
            key,
            total,
            percentage: percentage_of(total, grand_total),
        })
        .collect();
    // sort_by is stable, which preserves first-seen order on ties
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

pub fn breakdown_by_category(transactions: &[Transaction]) -> Vec<BreakdownEntry<Category>> {
    breakdown_by(transactions, |t| t.category)
}

pub fn breakdown_by_payment_method(
    transactions: &[Transaction],
) -> Vec<BreakdownEntry<PaymentMethod>> {
    breakdown_by(transactions, |t| t.payment_method)
}

/// Income and expense as shares of everything that moved, income first.
pub fn direction_split(summary: &AggregateSummary) -> Vec<BreakdownEntry<Direction>> {
    let whole = summary.total_income + summary.total_expense;
    [
        (Direction::Income, summary.total_income),
        (Direction::Expense, summary.total_expense),
    ]
    .into_iter()
    .map(|(key, total)| BreakdownEntry {
        key,
        total,
        percentage: percentage_of(total, whole),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentLabel<K> {
    Key(K),
    /// Placeholder drawn when there is nothing to show.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSegment<K> {
    pub label: SegmentLabel<K>,
    pub start_angle_deg: f64,
    pub sweep_angle_deg: f64,
}

/// Lay breakdown entries out around a circle, starting at 0°.
///
/// An empty breakdown, or one where every total is zero, yields a single
/// [`SegmentLabel::NoData`] segment covering the full circle.
pub fn donut_segments<K: Clone>(breakdown: &[BreakdownEntry<K>]) -> Vec<DonutSegment<K>> {
    if breakdown.iter().all(|e| e.total.is_zero()) {
        return vec![DonutSegment {
            label: SegmentLabel::NoData,
            start_angle_deg: 0.0,
            sweep_angle_deg: FULL_CIRCLE_DEG,
        }];
    }

    let mut start = 0.0;
    breakdown
        .iter()
        .map(|e| {
            let sweep = e.percentage * DEGREES_PER_PERCENT;
            let segment = DonutSegment {
                label: SegmentLabel::Key(e.key.clone()),
                start_angle_deg: start,
                sweep_angle_deg: sweep,
            };
            start += sweep;
            segment
        })
        .collect()
}

/// Spread `total` over `bucket_count` buckets with random jitter.
///
/// ILLUSTRATIVE ONLY: the output is a placeholder for trend charts and has
/// no relation to historical records. Use [`monthly_totals`] for real
/// history.
///
/// Each bucket but the last is drawn uniformly from 70%..130% of the average
/// of what is still unassigned, rounded to cents and capped at the unassigned
/// amount. The last bucket takes the remainder, so the series always sums to
/// `total`. A negative `total` is treated as zero.
pub fn synthetic_monthly_series<R: Rng + ?Sized>(
    total: Decimal,
    bucket_count: usize,
    rng: &mut R,
) -> Vec<Decimal> {
    if bucket_count == 0 {
        return Vec::new();
    }
    let mut remaining = total.max(Decimal::ZERO);
    let mut series = Vec::with_capacity(bucket_count);
    for i in 0..bucket_count - 1 {
        let average = remaining / Decimal::from(bucket_count - i);
        let factor =
            Decimal::from_f64(rng.gen_range(SPREAD_MIN..=SPREAD_MAX)).unwrap_or(Decimal::ONE);
        let value = (average * factor)
            .round_dp(2)
            .min(remaining)
            .max(Decimal::ZERO);
        series.push(value);
        remaining -= value;
    }
    series.push(remaining.max(Decimal::ZERO));
    series
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

fn trailing_months(end: NaiveDate, months: usize) -> Vec<(i64, u32)> {
    let end_index = i64::from(end.year()) * 12 + i64::from(end.month0());
    (0..months)
        .rev()
        .map(|back| {
            let idx = end_index - back as i64;
            (idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// `YYYY-MM` labels for the `months` calendar months ending with the month
/// containing `end`, oldest first.
pub fn trailing_month_labels(end: NaiveDate, months: usize) -> Vec<String> {
    trailing_months(end, months)
        .into_iter()
        .map(|(y, m)| format!("{:04}-{:02}", y, m))
        .collect()
}

/// Real income and expense per calendar month over the trailing window ending
/// with the month containing `end`. Months without records are zero.
pub fn monthly_totals(
    transactions: &[Transaction],
    end: NaiveDate,
    months: usize,
) -> Vec<MonthlyTotals> {
    let window = trailing_months(end, months);
    let position: HashMap<(i64, u32), usize> =
        window.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let mut sums = vec![(Decimal::ZERO, Decimal::ZERO); window.len()];
    for t in transactions {
        if let Some(&i) = position.get(&(i64::from(t.date.year()), t.date.month())) {
            match t.direction {
                Direction::Income => sums[i].0 += t.amount,
                Direction::Expense => sums[i].1 += t.amount,
            }
        }
    }
    window
        .into_iter()
        .zip(sums)
        .map(|((y, m), (income, expense))| MonthlyTotals {
            month: format!("{:04}-{:02}", y, m),
            income,
            expense,
            balance: income - expense,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardUsage {
    pub card_id: String,
    pub name: String,
    pub limit: Decimal,
    pub used: Decimal,
    /// Negative when the card is over its limit.
    pub available: Decimal,
    pub percent_used: f64,
    pub high_utilization: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardUsageOverview {
    pub cards: Vec<CardUsage>,
    pub total_limit: Decimal,
    pub total_used: Decimal,
    pub percent_used: f64,
    pub high_utilization: bool,
}

/// Credit used on each card, measured as credit expenses that reference it.
///
/// A card counts as highly utilised when its usage is strictly above
/// `threshold_percent` of its limit.
pub fn card_usage(
    cards: &[Card],
    transactions: &[Transaction],
    threshold_percent: f64,
) -> CardUsageOverview {
    let mut used_by_card: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions {
        if !t.is_expense() || t.payment_method != PaymentMethod::Credit {
            continue;
        }
        if let Some(card_id) = t.card_id.as_deref() {
            *used_by_card.entry(card_id).or_insert(Decimal::ZERO) += t.amount;
        }
    }

    let usages: Vec<CardUsage> = cards
        .iter()
        .map(|c| {
            let used = used_by_card
                .get(c.id.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let percent_used = percentage_of(used, c.limit);
            CardUsage {
                card_id: c.id.clone(),
                name: c.name.clone(),
                limit: c.limit,
                used,
                available: c.limit - used,
                percent_used,
                high_utilization: percent_used > threshold_percent,
            }
        })
        .collect();

    let total_limit: Decimal = usages.iter().map(|u| u.limit).sum();
    let total_used: Decimal = usages.iter().map(|u| u.used).sum();
    let percent_used = percentage_of(total_used, total_limit);
    CardUsageOverview {
        cards: usages,
        total_limit,
        total_used,
        percent_used,
        high_utilization: percent_used > threshold_percent,
    }
}
