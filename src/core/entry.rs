use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use colored::Colorize;

use crate::core::{Amount, Identity};

/// One applied operation in the ledger's journal.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Deposit {
        from: Identity,
        amount: Amount,
        at: DateTime<Utc>
    },
    Withdrawal {
        by: Identity,
        to: Identity,
        amount: Amount,
        at: DateTime<Utc>
    }
}

impl Entry {
    pub fn deposit(from: &Identity, amount: Amount) -> Entry {
        Entry::Deposit { from: from.clone(), amount, at: Utc::now() }
    }

    pub fn withdrawal(by: &Identity, to: &Identity, amount: Amount) -> Entry {
        Entry::Withdrawal { by: by.clone(), to: to.clone(), amount, at: Utc::now() }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Entry::Deposit { amount, .. } | Entry::Withdrawal { amount, .. } => *amount
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Entry::Deposit { at, .. } | Entry::Withdrawal { at, .. } => *at
        }
    }

    /// Applies this entry to `balance`. `None` if the result would
    /// overflow or go negative.
    pub fn apply_to(&self, balance: Amount) -> Option<Amount> {
        match self {
            Entry::Deposit { amount, .. } => balance.checked_add(*amount),
            Entry::Withdrawal { amount, .. } => balance.checked_sub(*amount)
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let at = self.timestamp().format("%Y-%m-%d %H:%M:%S");
        match self {
            Entry::Deposit { from, amount, .. } => {
                write!(f, "{} {}: {} from {}", at, "Deposit".bold(), amount.format_ether(), from)
            },
            Entry::Withdrawal { by, to, amount, .. } => {
                write!(f, "{} {}: {} to {} by {}", at, "Withdrawal".bold(), amount.format_ether(), to, by)
            }
        }
    }
}
