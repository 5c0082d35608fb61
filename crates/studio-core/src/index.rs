//! Identity/lookup index over the transactions of one graph
//!
//! Maps canonical txids, and witness txids where they differ, to the
//! transaction node that carries them. Both id forms share one key space so
//! a caller holding either can resolve the node without knowing which it
//! has.

use crate::error::{Error, Result};
use crate::types::TxNodeId;
use bitcoin::{Txid, Wtxid};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    entries: HashMap<Txid, TxNodeId>,
}

/// Witness ids are keyed in the txid space
fn alternate_key(wtxid: Wtxid) -> Txid {
    Txid::from_raw_hash(wtxid.to_raw_hash())
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its canonical id and, if different, its witness id
    ///
    /// Fails with [`Error::DuplicateIdentity`] if either id already maps to a
    /// different node. On failure the index is left untouched.
    pub fn register(&mut self, node: TxNodeId, txid: Txid, wtxid: Wtxid) -> Result<()> {
        let alternate = alternate_key(wtxid);
        for id in [txid, alternate] {
            if let Some(existing) = self.entries.get(&id) {
                if *existing != node {
                    return Err(Error::DuplicateIdentity { id });
                }
            }
        }

        self.entries.insert(txid, node);
        if alternate != txid {
            self.entries.insert(alternate, node);
        }
        Ok(())
    }

    /// Resolve a canonical or witness id
    pub fn resolve(&self, id: &Txid) -> Option<TxNodeId> {
        self.entries.get(id).copied()
    }

    pub fn resolve_wtxid(&self, wtxid: &Wtxid) -> Option<TxNodeId> {
        self.resolve(&alternate_key(*wtxid))
    }

    pub fn contains(&self, id: &Txid) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of id entries (not nodes)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
