use serde::{Deserialize, Serialize};
use std::fmt;

use super::chain::Block;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// `previous_hash` does not equal the stored hash of the block before it.
    PreviousHashMismatch { expected: String, found: String },
    /// Stored `hash` does not equal the digest recomputed from the fields.
    HashMismatch { stored: String, computed: String },
    /// `index` is not one more than the block before it.
    IndexGap { expected: u64, found: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFault {
    /// Zero-based position in the chain.
    pub position: usize,
    /// The `index` stored in the faulty block.
    pub block_index: u64,
    pub kind: FaultKind,
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            FaultKind::PreviousHashMismatch { expected, found } => write!(
                f,
                "block {} previous_hash mismatch (expected {}, found {})",
                self.block_index,
                short(expected),
                short(found)
            ),
            FaultKind::HashMismatch { stored, computed } => write!(
                f,
                "block {} hash mismatch (stored {}, computed {})",
                self.block_index,
                short(stored),
                short(computed)
            ),
            FaultKind::IndexGap { expected, found } => write!(
                f,
                "block at position {} has index {} (expected {})",
                self.position, found, expected
            ),
        }
    }
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

/// Lazily walk `blocks` and yield each fault in chain order. Within a block
/// the index is checked first, then linkage, then the block's own digest.
/// The genesis block has no predecessor; its digest is checked only when
/// `verify_genesis_hash` is set.
pub fn chain_faults(
    blocks: &[Block],
    verify_genesis_hash: bool,
) -> impl Iterator<Item = ChainFault> + '_ {
    blocks.iter().enumerate().flat_map(move |(position, block)| {
        let mut faults = Vec::new();

        let expected_index = position as u64 + 1;
        if block.index != expected_index {
            faults.push(ChainFault {
                position,
                block_index: block.index,
                kind: FaultKind::IndexGap {
                    expected: expected_index,
                    found: block.index,
                },
            });
        }

        if position > 0 {
            let prev = &blocks[position - 1];
            if block.previous_hash != prev.hash {
                faults.push(ChainFault {
                    position,
                    block_index: block.index,
                    kind: FaultKind::PreviousHashMismatch {
                        expected: prev.hash.clone(),
                        found: block.previous_hash.clone(),
                    },
                });
            }
        }

        if position > 0 || verify_genesis_hash {
            let computed = block.compute_hash();
            if computed != block.hash {
                faults.push(ChainFault {
                    position,
                    block_index: block.index,
                    kind: FaultKind::HashMismatch {
                        stored: block.hash.clone(),
                        computed,
                    },
                });
            }
        }

        faults
    })
}

/// Every fault in `blocks`. Used for chains that did not come from a live
/// ledger, such as an exported snapshot.
pub fn audit_blocks(blocks: &[Block], verify_genesis_hash: bool) -> Vec<ChainFault> {
    chain_faults(blocks, verify_genesis_hash).collect()
}
