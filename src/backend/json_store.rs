use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::backend::interface::{BackendError, LedgerStore, Result};
use crate::core::Ledger;

/// Keeps the ledger as pretty-printed JSON in a single file.
pub struct JsonStore {
    path: PathBuf
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> JsonStore {
        JsonStore { path: path.as_ref().to_owned() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> BackendError {
        BackendError::Io { path: self.path.clone(), source }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_owned();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for JsonStore {
    fn read(&self) -> Result<Option<Ledger>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err))
        };

        let ledger: Ledger = serde_json::from_str(&content)
            .map_err(|source| BackendError::Format { path: self.path.clone(), source })?;
        ledger.consistency_check()?;

        log::debug!("loaded ledger from {}", self.path.display());
        return Ok(Some(ledger));
    }

    /// Writes and syncs a sibling temporary file, then renames it over
    /// the target, so a reader never sees a half-written ledger.
    fn save(&self, ledger: &Ledger) -> Result<()> {
        let content = serde_json::to_string_pretty(ledger)
            .map_err(|source| BackendError::Format { path: self.path.clone(), source })?;

        let temp = self.temp_path();
        let mut file = File::create(&temp).map_err(|err| self.io_error(err))?;
        file.write_all(content.as_bytes()).map_err(|err| self.io_error(err))?;
        file.sync_all().map_err(|err| self.io_error(err))?;
        drop(file);
        fs::rename(&temp, &self.path).map_err(|err| self.io_error(err))?;
        return Ok(());
    }
}
