//! Configuration management for TicketChain

use crate::crypto::is_digest;
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ticketchain.toml";

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: i64 = 100;
/// Previous-hash placeholder for the genesis block. Too short to be a digest.
pub const GENESIS_PREVIOUS_HASH: &str = "1";
/// Proof the issuer passes to every seal.
pub const ISSUE_PROOF: i64 = 123;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub issuer: IssuerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_genesis_proof")]
    pub genesis_proof: i64,
    #[serde(default = "default_genesis_previous_hash")]
    pub genesis_previous_hash: String,
    /// Recompute the genesis block's own hash during validation.
    #[serde(default = "default_verify_genesis_hash")]
    pub verify_genesis_hash: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_proof: default_genesis_proof(),
            genesis_previous_hash: default_genesis_previous_hash(),
            verify_genesis_hash: default_verify_genesis_hash(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuerConfig {
    #[serde(default = "default_issue_proof")]
    pub proof: i64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            proof: default_issue_proof(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()
    }
}

impl LedgerConfig {
    /// The genesis sentinel must be non-empty and must not look like a digest,
    /// or a real link could be mistaken for it.
    pub fn validate(&self) -> Result<()> {
        let sentinel = &self.genesis_previous_hash;
        if sentinel.is_empty() {
            return Err(LedgerError::ConfigError(
                "ledger.genesis_previous_hash must not be empty".to_string(),
            ));
        }
        if is_digest(sentinel) {
            return Err(LedgerError::ConfigError(format!(
                "ledger.genesis_previous_hash '{}' is shaped like a block digest",
                sentinel
            )));
        }
        Ok(())
    }
}

/// Load `ticketchain.toml` from the working directory, falling back to
/// defaults when the file is absent.
pub fn load_config() -> Result<Config> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_from(path)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        LedgerError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

fn default_genesis_proof() -> i64 {
    GENESIS_PROOF
}

fn default_genesis_previous_hash() -> String {
    GENESIS_PREVIOUS_HASH.to_string()
}

fn default_verify_genesis_hash() -> bool {
    true
}

fn default_issue_proof() -> i64 {
    ISSUE_PROOF
}
