use std::path::PathBuf;

use thiserror::Error;

use crate::core::{Ledger, LedgerError};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("ledger file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },
    #[error("stored ledger failed verification: {0}")]
    Corrupt(#[from] LedgerError)
}

pub type Result<T> = std::result::Result<T, BackendError>;

pub trait LedgerStore {
    /// `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<Ledger>>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}
