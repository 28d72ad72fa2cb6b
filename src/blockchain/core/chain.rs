use crate::config::LedgerConfig;
use crate::crypto::sha256_hex;
use crate::error::{LedgerError, Result};
use crate::mempool::PendingPool;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::validation::{chain_faults, ChainFault};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Unix milliseconds at seal time.
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    /// Caller-supplied value, carried but never checked.
    pub proof: i64,
    pub previous_hash: String,
    /// Digest of every other field, see [`Block::canonical_json`].
    pub hash: String,
}

impl Block {
    fn seal(index: u64, previous_hash: String, proof: i64, transactions: Vec<Transaction>) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;

        let mut block = Block {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Hash input: compact JSON of every field except `hash`, object keys in
    /// lexicographic order at every level, integers in plain decimal.
    pub fn canonical_json(&self) -> String {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(Transaction::canonical_value)
            .collect();

        let mut fields = Map::new();
        fields.insert("index".to_string(), Value::from(self.index));
        fields.insert("previous_hash".to_string(), Value::from(self.previous_hash.as_str()));
        fields.insert("proof".to_string(), Value::from(self.proof));
        fields.insert("timestamp".to_string(), Value::from(self.timestamp));
        fields.insert("transactions".to_string(), Value::Array(transactions));
        Value::Object(fields).to_string()
    }

    pub fn compute_hash(&self) -> String {
        sha256_hex(self.canonical_json().as_bytes())
    }

    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

/// Append-only chain of sealed blocks plus the buffer of transactions
/// waiting for the next seal.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    pending: PendingPool,
    genesis_previous_hash: String,
    verify_genesis_hash: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a ledger holding only the genesis block, using the default
    /// genesis constants.
    pub fn new() -> Self {
        Self::build(&LedgerConfig::default())
    }

    /// Create a ledger from explicit genesis settings. Fails with
    /// `ConfigError` when the sentinel is empty or digest-shaped.
    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &LedgerConfig) -> Self {
        let mut ledger = Ledger {
            blocks: Vec::new(),
            pending: PendingPool::new(),
            genesis_previous_hash: config.genesis_previous_hash.clone(),
            verify_genesis_hash: config.verify_genesis_hash,
        };
        ledger.seal(config.genesis_proof);
        ledger
    }

    /// Queue a transaction for the next seal. Returns the index of the block
    /// it will land in if the next seal happens now; nothing is committed yet.
    pub fn record(&mut self, tx: Transaction) -> u64 {
        debug!(ticket_id = %tx.ticket_id, pending = self.pending.len() + 1, "recorded transaction");
        self.pending.push(tx);
        self.next_index()
    }

    /// Commit every pending transaction into a new block and return a copy of it.
    /// Empty seals are allowed.
    pub fn seal(&mut self, proof: i64) -> Block {
        let previous_hash = match self.blocks.last() {
            Some(last) => last.hash.clone(),
            None => self.genesis_previous_hash.clone(),
        };

        let transactions = self.pending.snapshot();
        let block = Block::seal(self.next_index(), previous_hash, proof, transactions);
        self.pending.clear();

        let short_hash = &block.hash[..12];
        info!(
            index = block.index,
            transactions = block.transactions.len(),
            hash = short_hash,
            "sealed block"
        );

        self.blocks.push(block.clone());
        block
    }

    /// Digest of `block` computed from its fields; the stored `hash` is ignored.
    pub fn hash(block: &Block) -> String {
        block.compute_hash()
    }

    /// True when every block links to its predecessor and matches its own
    /// digest. Stops at the first fault.
    pub fn validate(&self) -> bool {
        chain_faults(&self.blocks, self.verify_genesis_hash)
            .next()
            .is_none()
    }

    /// Every fault in the chain, in chain order.
    pub fn audit(&self) -> Vec<ChainFault> {
        chain_faults(&self.blocks, self.verify_genesis_hash).collect()
    }

    pub fn ensure_valid(&self) -> Result<()> {
        match chain_faults(&self.blocks, self.verify_genesis_hash).next() {
            Some(fault) => Err(LedgerError::ChainInconsistent(fault)),
            None => Ok(()),
        }
    }

    /// First sealed transaction carrying `ticket_id`, scanning blocks in chain
    /// order. Pending transactions are not searched.
    pub fn lookup(&self, ticket_id: &str) -> Option<&Transaction> {
        self.blocks
            .iter()
            .flat_map(|block| block.transactions.iter())
            .find(|tx| tx.ticket_id == ticket_id)
    }

    /// Every sealed occurrence of `ticket_id` with the index of its block.
    pub fn find_all(&self, ticket_id: &str) -> Vec<(u64, &Transaction)> {
        self.blocks
            .iter()
            .flat_map(|block| block.transactions.iter().map(move |tx| (block.index, tx)))
            .filter(|(_, tx)| tx.ticket_id == ticket_id)
            .collect()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending(&self) -> &[Transaction] {
        self.pending.as_slice()
    }

    fn next_index(&self) -> u64 {
        self.blocks.len() as u64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::FaultKind;
    use crate::config::GENESIS_PREVIOUS_HASH;

    fn ticket(id: &str, buyer: &str) -> Transaction {
        Transaction::new("Org1", "Gig", id, buyer)
    }

    #[test]
    fn test_genesis_block() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);

        let genesis = &ledger.blocks()[0];
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, 100);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert!(genesis.has_valid_hash());
        assert!(ledger.validate());
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn test_record_returns_next_index_without_committing() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.record(ticket("T1", "Alice")), 2);
        assert_eq!(ledger.record(ticket("T2", "Bob")), 2);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.pending().len(), 2);
    }

    #[test]
    fn test_seal_moves_pending_in_order() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.record(ticket("T2", "Bob"));

        let block = ledger.seal(123);
        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 123);
        assert_eq!(block.previous_hash, ledger.blocks()[0].hash);
        let ids: Vec<&str> = block.transactions.iter().map(|t| t.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last_block(), Some(&block));
    }

    #[test]
    fn test_pending_after_seal_does_not_touch_sealed_block() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(1);
        ledger.record(ticket("T2", "Bob"));

        assert_eq!(ledger.blocks()[1].transactions.len(), 1);
        assert!(ledger.validate());
    }

    #[test]
    fn test_empty_seal_allowed() {
        let mut ledger = Ledger::new();
        let block = ledger.seal(-5);
        assert!(block.transactions.is_empty());
        assert_eq!(block.proof, -5);
        assert!(ledger.validate());
    }

    #[test]
    fn test_hash_is_deterministic_and_ignores_stored_hash() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        let block = ledger.seal(123);

        let mut copy = block.clone();
        copy.hash = "garbage".to_string();
        assert_eq!(Ledger::hash(&block), Ledger::hash(&copy));
        assert_eq!(Ledger::hash(&block), block.hash);
    }

    #[test]
    fn test_hash_independent_of_json_key_order() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        let block = ledger.seal(123);

        let reordered = format!(
            r#"{{"hash":"{}","transactions":[{{"ticket_id":"T1","buyer":"Alice","event":"Gig","organizer":"Org1"}}],"previous_hash":"{}","proof":123,"timestamp":{},"index":2}}"#,
            block.hash, block.previous_hash, block.timestamp
        );
        let parsed: Block = serde_json::from_str(&reordered).unwrap();
        assert_eq!(parsed, block);
        assert_eq!(Ledger::hash(&parsed), block.hash);
    }

    #[test]
    fn test_canonical_json_layout() {
        let block = Block {
            index: 2,
            timestamp: 1_700_000_000_000,
            transactions: vec![ticket("T1", "Alice")],
            proof: 123,
            previous_hash: "abc".to_string(),
            hash: String::new(),
        };
        assert_eq!(
            block.canonical_json(),
            r#"{"index":2,"previous_hash":"abc","proof":123,"timestamp":1700000000000,"transactions":[{"buyer":"Alice","event":"Gig","organizer":"Org1","ticket_id":"T1"}]}"#
        );
    }

    #[test]
    fn test_tampered_transaction_detected() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(123);
        ledger.record(ticket("T2", "Bob"));
        ledger.seal(123);
        assert!(ledger.validate());

        ledger.blocks[1].transactions[0].buyer = "Mallory".to_string();
        assert!(!ledger.validate());

        let faults = ledger.audit();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].block_index, 2);
        assert!(matches!(faults[0].kind, FaultKind::HashMismatch { .. }));
    }

    #[test]
    fn test_rehashed_tamper_breaks_linkage() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(123);
        ledger.record(ticket("T2", "Bob"));
        ledger.seal(123);

        ledger.blocks[1].transactions[0].buyer = "Mallory".to_string();
        ledger.blocks[1].hash = ledger.blocks[1].compute_hash();

        let faults = ledger.audit();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].block_index, 3);
        assert!(matches!(faults[0].kind, FaultKind::PreviousHashMismatch { .. }));
        assert!(matches!(
            ledger.ensure_valid(),
            Err(LedgerError::ChainInconsistent(_))
        ));
    }

    #[test]
    fn test_genesis_self_check_is_configurable() {
        let mut strict = Ledger::new();
        strict.blocks[0].proof = 999;
        assert!(!strict.validate());

        let config = LedgerConfig {
            verify_genesis_hash: false,
            ..LedgerConfig::default()
        };
        let mut lenient = Ledger::with_config(&config).unwrap();
        lenient.blocks[0].proof = 999;
        assert!(lenient.validate());
    }

    #[test]
    fn test_seal_continues_on_inconsistent_chain() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(123);
        ledger.blocks[1].transactions[0].buyer = "Mallory".to_string();

        ledger.record(ticket("T2", "Bob"));
        let block = ledger.seal(123);
        assert_eq!(block.index, 3);
        assert_eq!(block.previous_hash, ledger.blocks[1].hash);
        assert!(!ledger.validate());
    }

    #[test]
    fn test_lookup_scans_sealed_blocks_only() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(123);
        ledger.record(ticket("T2", "Bob"));

        assert_eq!(ledger.lookup("T1"), Some(&ticket("T1", "Alice")));
        assert_eq!(ledger.lookup("T2"), None);
        assert_eq!(ledger.lookup("missing"), None);

        ledger.seal(123);
        assert_eq!(ledger.lookup("T2"), Some(&ticket("T2", "Bob")));
    }

    #[test]
    fn test_duplicate_ticket_lookup_returns_first() {
        let mut ledger = Ledger::new();
        ledger.record(ticket("T1", "Alice"));
        ledger.seal(123);
        ledger.record(ticket("T1", "Bob"));
        ledger.seal(123);

        assert_eq!(ledger.lookup("T1").map(|t| t.buyer.as_str()), Some("Alice"));

        let all = ledger.find_all("T1");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, 2);
        assert_eq!(all[1].0, 3);
        assert_eq!(all[1].1.buyer, "Bob");
    }

    #[test]
    fn test_custom_genesis_constants() {
        let config = LedgerConfig {
            genesis_proof: 42,
            genesis_previous_hash: "0".to_string(),
            verify_genesis_hash: true,
        };
        let ledger = Ledger::with_config(&config).unwrap();
        assert_eq!(ledger.blocks()[0].proof, 42);
        assert_eq!(ledger.blocks()[0].previous_hash, "0");
        assert!(ledger.validate());
    }

    #[test]
    fn test_with_config_rejects_bad_sentinel() {
        let empty = LedgerConfig {
            genesis_previous_hash: String::new(),
            ..LedgerConfig::default()
        };
        assert!(matches!(
            Ledger::with_config(&empty),
            Err(LedgerError::ConfigError(_))
        ));

        let digest_shaped = LedgerConfig {
            genesis_previous_hash: sha256_hex(b"genesis"),
            ..LedgerConfig::default()
        };
        assert!(matches!(
            Ledger::with_config(&digest_shaped),
            Err(LedgerError::ConfigError(_))
        ));
    }
}
