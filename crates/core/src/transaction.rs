use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Category assigned when no keyword matches.
pub const DEFAULT_CATEGORY: &str = "Otros";

/// Fields split out of a single transaction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields {
    /// First token of the line, kept verbatim (no date validation).
    pub date: String,
    /// Every token between the date and the amount, single-space joined.
    pub raw_description: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Ingreso")]
    Income,
    #[serde(rename = "Gasto")]
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Ingreso"),
            TransactionType::Expense => write!(f, "Gasto"),
        }
    }
}

/// How the sign of a printed amount maps to a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSign {
    /// `amount > 0` is income, everything else (zero included) is an expense.
    #[default]
    PositiveIncome,
    /// Debits printed as positive numbers: `amount < 0` is income.
    PositiveExpense,
}

impl AmountSign {
    pub fn classify(self, amount: Money) -> TransactionType {
        let income = match self {
            AmountSign::PositiveIncome => amount.is_positive(),
            AmountSign::PositiveExpense => amount.is_negative(),
        };
        if income {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }
}

/// A fully parsed and classified statement transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Fecha")]
    pub date: String,
    /// Normalized company name.
    #[serde(rename = "Descripción")]
    pub description: String,
    #[serde(rename = "Categoría")]
    pub category: String,
    #[serde(rename = "Monto")]
    pub amount: Money,
    #[serde(rename = "Tipo")]
    pub kind: TransactionType,
}

impl Transaction {
    pub fn new(
        fields: ParsedFields,
        description: String,
        category: String,
        sign: AmountSign,
    ) -> Self {
        Transaction {
            kind: sign.classify(fields.amount),
            date: fields.date,
            description,
            category,
            amount: fields.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// A line as it appears on the statement, description left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Descripción")]
    pub description: String,
    #[serde(rename = "Monto")]
    pub amount: Money,
}

impl From<ParsedFields> for RawTransaction {
    fn from(fields: ParsedFields) -> Self {
        RawTransaction {
            date: fields.date,
            description: fields.raw_description,
            amount: fields.amount,
        }
    }
}
