//! A ledger bound to the store that persists it and the transfer
//! capability that pays withdrawals out.
//!
//! Mutations are applied to a working copy, which replaces the live
//! ledger only once it has been saved. Callers that share a `Custody`
//! across threads must serialize access to it.

use thiserror::Error;

use crate::backend::{BackendError, LedgerStore};
use crate::core::{Amount, Entry, Identity, Ledger, LedgerError, Payout, ValueTransfer};

#[derive(Debug, Error)]
pub enum CustodyError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] BackendError),
    #[error("a ledger already exists, owned by {0}")]
    AlreadyInitialized(Identity),
    #[error("no ledger has been initialized")]
    NotInitialized
}

pub type CustodyResult<T> = Result<T, CustodyError>;

pub struct Custody<S, T> {
    ledger: Ledger,
    store: S,
    transfer: T
}

impl<S: LedgerStore, T: ValueTransfer> Custody<S, T> {
    /// Creates and saves a new ledger owned by `caller`. Refuses to run
    /// over a ledger that is already stored.
    pub fn initialize(caller: &Identity, store: S, transfer: T) -> CustodyResult<Self> {
        if let Some(existing) = store.read()? {
            return Err(CustodyError::AlreadyInitialized(existing.owner().clone()));
        }
        let ledger = Ledger::initialize(caller);
        store.save(&ledger)?;
        Ok(Custody { ledger, store, transfer })
    }

    /// Loads the stored ledger.
    pub fn open(store: S, transfer: T) -> CustodyResult<Self> {
        let ledger = store.read()?.ok_or(CustodyError::NotInitialized)?;
        Ok(Custody { ledger, store, transfer })
    }

    /// Loads the stored ledger, or initializes one owned by `owner`
    /// when the store is empty. A stored owner always wins.
    pub fn open_or_initialize(owner: &Identity, store: S, transfer: T) -> CustodyResult<Self> {
        match store.read()? {
            Some(ledger) => {
                if ledger.owner() != owner {
                    log::warn!("configured owner {} ignored, ledger is owned by {}", owner, ledger.owner());
                }
                Ok(Custody { ledger, store, transfer })
            },
            None => Custody::initialize(owner, store, transfer)
        }
    }

    pub fn owner(&self) -> &Identity {
        self.ledger.owner()
    }

    pub fn balance_of(&self) -> Amount {
        self.ledger.balance_of()
    }

    pub fn history(&self) -> &[Entry] {
        self.ledger.history()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn deposit(&mut self, caller: &Identity, amount: Amount) -> CustodyResult<Amount> {
        let mut working = self.ledger.clone();
        working.deposit(caller, amount)?;
        self.persist(working)
    }

    /// Returns the payout together with the balance left after it.
    ///
    /// The decrement is stored before the transfer is attempted, so no
    /// payout ever leaves without its journal entry on disk. A failed
    /// transfer stores the previous ledger again.
    pub fn withdraw(&mut self, caller: &Identity, recipient: &Identity, amount: Amount) -> CustodyResult<(Payout, Amount)> {
        let mut working = self.ledger.clone();
        working.debit(caller, recipient, amount)?;
        self.store.save(&working)?;

        match self.transfer.transfer(recipient, amount) {
            Ok(payout) => {
                self.ledger = working;
                Ok((payout, self.ledger.balance_of()))
            },
            Err(err) => {
                log::error!("transfer of {} wei to {} failed: {}", amount, recipient, err);
                if let Err(restore) = self.store.save(&self.ledger) {
                    log::error!("stored ledger still holds the unpaid debit: {}", restore);
                    return Err(CustodyError::Storage(restore));
                }
                Err(LedgerError::TransferFailed { recipient: recipient.clone(), reason: err.to_string() }.into())
            }
        }
    }

    fn persist(&mut self, working: Ledger) -> CustodyResult<Amount> {
        self.store.save(&working)?;
        self.ledger = working;
        Ok(self.ledger.balance_of())
    }
}
