use std::{fs, net::SocketAddr, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use crate::core::Identity;

const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the ledger
    pub ledger: PathBuf,
    /// JSON-lines file payouts are queued in
    pub payouts: PathBuf
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Owner used when no ledger has been stored yet
    pub owner: Identity,
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    pub storage: StorageConfig
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

impl ServerConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let file_content = fs::read_to_string(filepath)
            .with_context(|| format!("failed to read config file {}", filepath.display()))?;
        return Self::parse(&file_content);
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }
}
