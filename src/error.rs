// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// A record rejected at the data-entry boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("transaction description must not be blank")]
    BlankDescription,
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of {max}", max = crate::models::MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("credit transactions must reference a card")]
    CreditWithoutCard,
    #[error("expense kind only applies to expenses")]
    ExpenseKindOnIncome,
    #[error("installment {current}/{total} is not valid")]
    InvalidInstallment { current: u32, total: u32 },
    #[error("card name must not be blank")]
    BlankCardName,
    #[error("card limit must be greater than zero (got {0})")]
    NonPositiveLimit(Decimal),
    #[error("{field} must be between 1 and 31 (got {day})")]
    DayOutOfRange { field: &'static str, day: u32 },
    #[error("unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("card '{id}' is referenced by {count} transaction(s)")]
    CardInUse { id: String, count: i64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid stored {column} '{value}'")]
    Corrupt { column: &'static str, value: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
