// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest amount or card limit accepted on entry. Keeps every realistic
/// collection of records summable without overflowing `Decimal`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Whether a transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Housing,
    Transport,
    Health,
    Education,
    Leisure,
    Clothing,
    Services,
    Investments,
    EmergencyReserve,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Credit,
    Debit,
    Cash,
    InstantTransfer,
    WireTransfer,
    BankSlip,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Fixed,
    Variable,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Income, Direction::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "Income",
            Direction::Expense => "Expense",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Direction::Income => &["receita", "entrada", "in"],
            Direction::Expense => &["despesa", "saida", "saída", "out"],
        }
    }
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::Housing,
        Category::Transport,
        Category::Health,
        Category::Education,
        Category::Leisure,
        Category::Clothing,
        Category::Services,
        Category::Investments,
        Category::EmergencyReserve,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Housing => "housing",
            Category::Transport => "transport",
            Category::Health => "health",
            Category::Education => "education",
            Category::Leisure => "leisure",
            Category::Clothing => "clothing",
            Category::Services => "services",
            Category::Investments => "investments",
            Category::EmergencyReserve => "emergency_reserve",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Housing => "Housing",
            Category::Transport => "Transport",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Leisure => "Leisure",
            Category::Clothing => "Clothing",
            Category::Services => "Services",
            Category::Investments => "Investments",
            Category::EmergencyReserve => "Emergency reserve",
            Category::Other => "Other",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Category::Food => &["alimentação", "alimentacao"],
            Category::Housing => &["moradia"],
            Category::Transport => &["transporte"],
            Category::Health => &["saúde", "saude"],
            Category::Education => &["educação", "educacao"],
            Category::Leisure => &["lazer"],
            Category::Clothing => &["vestuário", "vestuario"],
            Category::Services => &["serviços", "servicos"],
            Category::Investments => &["investimentos"],
            Category::EmergencyReserve => &["reserva", "reserve"],
            Category::Other => &["outros"],
        }
    }
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Credit,
        PaymentMethod::Debit,
        PaymentMethod::Cash,
        PaymentMethod::InstantTransfer,
        PaymentMethod::WireTransfer,
        PaymentMethod::BankSlip,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Cash => "cash",
            PaymentMethod::InstantTransfer => "instant_transfer",
            PaymentMethod::WireTransfer => "wire_transfer",
            PaymentMethod::BankSlip => "bank_slip",
            PaymentMethod::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Credit => "Credit",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::InstantTransfer => "Instant transfer",
            PaymentMethod::WireTransfer => "Wire transfer",
            PaymentMethod::BankSlip => "Bank slip",
            PaymentMethod::Other => "Other",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            PaymentMethod::Credit => &["crédito", "credito"],
            PaymentMethod::Debit => &["débito", "debito"],
            PaymentMethod::Cash => &["dinheiro"],
            PaymentMethod::InstantTransfer => &["pix"],
            PaymentMethod::WireTransfer => &["transferência", "transferencia", "transfer"],
            PaymentMethod::BankSlip => &["boleto"],
            PaymentMethod::Other => &["outro"],
        }
    }
}

impl ExpenseKind {
    pub const ALL: [ExpenseKind; 2] = [ExpenseKind::Fixed, ExpenseKind::Variable];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Fixed => "fixed",
            ExpenseKind::Variable => "variable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseKind::Fixed => "Fixed",
            ExpenseKind::Variable => "Variable",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ExpenseKind::Fixed => &["fixa"],
            ExpenseKind::Variable => &["variável", "variavel"],
        }
    }
}

// Case, spaces, dashes and underscores are ignored so that "EmergencyReserve",
// "emergency-reserve" and "Emergency reserve" all match.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

fn parse_variant<T: Copy>(
    all: &[T],
    raw: &str,
    field: &'static str,
    canonical: impl Fn(&T) -> &'static str,
    aliases: impl Fn(&T) -> &'static [&'static str],
) -> Result<T, ValidationError> {
    let wanted = normalize(raw);
    all.iter()
        .copied()
        .find(|v| {
            normalize(canonical(v)) == wanted
                || aliases(v).iter().any(|a| normalize(a) == wanted)
        })
        .ok_or_else(|| ValidationError::UnknownVariant {
            field,
            value: raw.trim().to_string(),
        })
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, s, "direction", Self::as_str, Self::aliases)
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, s, "category", Self::as_str, Self::aliases)
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, s, "payment method", Self::as_str, Self::aliases)
    }
}

impl FromStr for ExpenseKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, s, "expense kind", Self::as_str, Self::aliases)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a transaction inside an installment plan. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub current: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Always positive; the sign comes from `direction`.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub direction: Direction,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub expense_kind: Option<ExpenseKind>,
    pub card_id: Option<String>,
    pub recurring: bool,
    pub installment: Option<Installment>,
    pub notes: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    /// Amount with the sign implied by the direction.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(self.amount));
        }
        if self.payment_method == PaymentMethod::Credit
            && self.card_id.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            return Err(ValidationError::CreditWithoutCard);
        }
        if self.expense_kind.is_some() && self.direction == Direction::Income {
            return Err(ValidationError::ExpenseKindOnIncome);
        }
        if let Some(inst) = self.installment {
            if inst.total == 0 || inst.current == 0 || inst.current > inst.total {
                return Err(ValidationError::InvalidInstallment {
                    current: inst.current,
                    total: inst.total,
                });
            }
        }
        Ok(())
    }
}

/// Credit card metadata. Days are not checked against month length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub limit: Decimal,
    pub closing_day: u32,
    pub due_day: u32,
    pub color: String,
}

impl Card {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankCardName);
        }
        if self.limit <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveLimit(self.limit));
        }
        if self.limit > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(self.limit));
        }
        for (field, day) in [("closing day", self.closing_day), ("due day", self.due_day)] {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::DayOutOfRange { field, day });
            }
        }
        Ok(())
    }
}
