pub mod amount;
pub mod entry;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod transfer;

pub use amount::Amount;
pub use entry::Entry;
pub use error::{LedgerError, LedgerResult};
pub use identity::Identity;
pub use ledger::Ledger;
pub use transfer::{Payout, TransferError, ValueTransfer};
