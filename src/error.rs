//! Error types for TicketChain

use crate::blockchain::ChainFault;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidTransaction(String),
    DuplicateTicket(String),
    TicketNotFound(String),
    ChainInconsistent(ChainFault),
    IoError(String),
    SerializationError(String),
    ConfigError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            LedgerError::DuplicateTicket(id) => write!(f, "Ticket ID already exists: {}", id),
            LedgerError::TicketNotFound(id) => write!(f, "No such ticket: {}", id),
            LedgerError::ChainInconsistent(fault) => write!(f, "Chain inconsistent: {}", fault),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
            LedgerError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            LedgerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
