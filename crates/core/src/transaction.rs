use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::category::CategoryId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Outcome,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transaction kind: '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "outcome" => Ok(TransactionKind::Outcome),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A transaction that has not been persisted yet. The category reference is
/// already resolved; a draft never exists without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category_id: CategoryId,
    pub created_at: Option<NaiveDateTime>,
}

/// Aggregate of all persisted transactions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Balance {
    pub income: Money,
    pub outcome: Money,
}

impl Balance {
    pub fn total(&self) -> Money {
        self.income - self.outcome
    }
}
