mod core;
pub mod backend;
pub mod custody;
pub mod server;

pub use crate::core::{Amount, Entry, Identity, Ledger, LedgerError, LedgerResult, Payout, ValueTransfer};
pub use crate::core::{amount, entry, identity, ledger, transfer};
pub use crate::custody::{Custody, CustodyError};
