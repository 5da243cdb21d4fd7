use thiserror::Error;

use crate::core::{Amount, Identity};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Occurs when anyone other than the owner attempts a withdrawal.
    /// Retrying with the same identity will always fail.
    #[error("only the owner can withdraw: {caller} is not the owner")]
    Unauthorized {
        caller: Identity
    },
    /// Occurs when a withdrawal asks for more than the held balance.
    #[error("insufficient funds: requested {requested} wei, held {available} wei")]
    InsufficientFunds {
        requested: Amount,
        available: Amount
    },
    /// Occurs when an amount is malformed, negative, or would
    /// overflow the held balance.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    /// Occurs when the transport supplies a blank identity.
    #[error("invalid identity: {0:?}")]
    InvalidIdentity(String),
    /// Occurs when the value-transfer step of a withdrawal fails.
    /// The balance decrement has not been applied.
    #[error("transfer to {recipient} failed: {reason}")]
    TransferFailed {
        recipient: Identity,
        reason: String
    },
    /// Occurs when the held balance disagrees with a replay of the journal.
    #[error("ledger inconsistent: recorded balance {recorded} wei, journal replays to {replayed:?}")]
    Inconsistent {
        recorded: Amount,
        replayed: Option<Amount>
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
