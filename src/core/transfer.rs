use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::{Amount, Identity};

/// A completed hand-off of withdrawn value to a recipient.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Payout {
    pub recipient: Identity,
    pub amount: Amount,
    pub at: DateTime<Utc>
}

impl Payout {
    pub fn new(recipient: &Identity, amount: Amount) -> Payout {
        Payout { recipient: recipient.clone(), amount, at: Utc::now() }
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("payout rejected: {0}")]
    Rejected(String),
    #[error("payout outbox i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("payout encoding: {0}")]
    Encoding(#[from] serde_json::Error)
}

/// Moves withdrawn value out of custody. The ledger only commits a
/// withdrawal once `transfer` has returned `Ok`.
pub trait ValueTransfer {
    fn transfer(&mut self, recipient: &Identity, amount: Amount) -> Result<Payout, TransferError>;
}

/// Appends every payout as a JSON line to a file, to be settled
/// by an external process.
pub struct PayoutOutbox {
    path: PathBuf
}

impl PayoutOutbox {
    pub fn new(path: impl AsRef<Path>) -> PayoutOutbox {
        PayoutOutbox { path: path.as_ref().to_owned() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<File> {
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl ValueTransfer for PayoutOutbox {
    fn transfer(&mut self, recipient: &Identity, amount: Amount) -> Result<Payout, TransferError> {
        let payout = Payout::new(recipient, amount);
        let mut line = serde_json::to_vec(&payout)?;
        line.push(b'\n');

        let mut file = self.open()?;
        file.write_all(&line)?;
        file.sync_data()?;
        log::debug!("queued payout of {} wei to {} in {}", amount, recipient, self.path.display());
        return Ok(payout);
    }
}

/// Keeps payouts in memory. Can be told to refuse transfers.
#[derive(Default, Debug)]
pub struct RecordingTransfer {
    pub payouts: Vec<Payout>,
    pub fail_with: Option<String>
}

impl RecordingTransfer {
    pub fn new() -> RecordingTransfer {
        RecordingTransfer::default()
    }

    pub fn failing(reason: &str) -> RecordingTransfer {
        RecordingTransfer { payouts: Vec::new(), fail_with: Some(reason.to_owned()) }
    }
}

impl ValueTransfer for RecordingTransfer {
    fn transfer(&mut self, recipient: &Identity, amount: Amount) -> Result<Payout, TransferError> {
        if let Some(reason) = &self.fail_with {
            return Err(TransferError::Rejected(reason.clone()));
        }
        let payout = Payout::new(recipient, amount);
        self.payouts.push(payout.clone());
        Ok(payout)
    }
}
