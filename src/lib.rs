//! TicketChain - a hash-linked, append-only ledger for event tickets
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger, and chain validation
//! - [`transaction`] - Ticket transactions and their field rules
//! - [`mempool`] - Transactions waiting for the next seal
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 digests
//!
//! ## Services
//! - [`issuer`] - Lock-guarded issuance (duplicate check, record and seal as one step)
//! - [`export`] - JSON Lines chain snapshots for offline audit
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Session command parsing and rendering

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Services
// ============================================================================
pub mod export;
pub mod issuer;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
