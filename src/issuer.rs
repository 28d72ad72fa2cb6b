//! Ticket issuance service
//!
//! Wraps a shared [`Ledger`] behind a single lock so that the
//! duplicate check, the record and the seal for one ticket happen as one step.
//! Hosts hold a [`TicketIssuer`] handle instead of the ledger itself.

use crate::blockchain::{Block, Ledger};
use crate::config::{Config, ISSUE_PROOF};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Chain length and validity, as shown in a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainStatus {
    pub length: usize,
    pub valid: bool,
}

#[derive(Clone)]
pub struct TicketIssuer {
    ledger: Arc<Mutex<Ledger>>,
    proof: i64,
}

impl TicketIssuer {
    pub fn new(ledger: Ledger, proof: i64) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            proof,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Ledger::with_config(&config.ledger)?,
            config.issuer.proof,
        ))
    }

    /// Validate the fields, refuse an already sealed `ticket_id`, then record
    /// and seal the ticket into its own block.
    pub fn issue(
        &self,
        organizer: &str,
        event: &str,
        ticket_id: &str,
        buyer: &str,
    ) -> Result<Block> {
        let tx = Transaction::new(organizer, event, ticket_id, buyer);
        if let Err(e) = tx.validate() {
            warn!(ticket_id, "rejected ticket: {}", e);
            return Err(e);
        }

        let mut ledger = self.ledger.lock();
        if ledger.lookup(ticket_id).is_some() {
            warn!(ticket_id, "rejected duplicate ticket");
            return Err(LedgerError::DuplicateTicket(ticket_id.to_string()));
        }

        ledger.record(tx);
        let block = ledger.seal(self.proof);
        info!(ticket_id, block = block.index, "issued ticket");
        Ok(block)
    }

    pub fn verify_ticket(&self, ticket_id: &str) -> Result<Transaction> {
        self.ledger
            .lock()
            .lookup(ticket_id)
            .cloned()
            .ok_or_else(|| LedgerError::TicketNotFound(ticket_id.to_string()))
    }

    pub fn status(&self) -> ChainStatus {
        let ledger = self.ledger.lock();
        ChainStatus {
            length: ledger.len(),
            valid: ledger.validate(),
        }
    }

    /// Sealed blocks, newest first.
    pub fn explorer(&self) -> Vec<Block> {
        let ledger = self.ledger.lock();
        ledger.blocks().iter().rev().cloned().collect()
    }

    /// Sealed blocks in chain order.
    pub fn snapshot(&self) -> Vec<Block> {
        self.ledger.lock().blocks().to_vec()
    }

    /// Run `f` with read access to the ledger while holding the lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.ledger.lock();
        f(&ledger)
    }

    pub fn proof(&self) -> i64 {
        self.proof
    }
}

impl Default for TicketIssuer {
    fn default() -> Self {
        Self::new(Ledger::new(), ISSUE_PROOF)
    }
}
