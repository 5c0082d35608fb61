//! Identifier types shared by the graph, the view and the selection store

use bitcoin::{OutPoint, Txid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Something a user can select: a whole transaction or one of its outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityId {
    /// A transaction, addressed by txid (or wtxid, resolved transparently)
    Transaction(Txid),
    /// One output of a transaction
    Outpoint(OutPoint),
}

impl EntityId {
    /// Transaction id this entity belongs to
    pub fn txid(&self) -> Txid {
        match self {
            EntityId::Transaction(txid) => *txid,
            EntityId::Outpoint(outpoint) => outpoint.txid,
        }
    }
}

impl From<Txid> for EntityId {
    fn from(txid: Txid) -> Self {
        EntityId::Transaction(txid)
    }
}

impl From<OutPoint> for EntityId {
    fn from(outpoint: OutPoint) -> Self {
        EntityId::Outpoint(outpoint)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Transaction(txid) => write!(f, "{}", txid),
            EntityId::Outpoint(outpoint) => write!(f, "{}", outpoint),
        }
    }
}

/// Selection as held by the global store: nothing, a transaction or an outpoint
pub type SelectedEntity = Option<EntityId>;

/// Position of a transaction node inside its owning graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxNodeId(pub(crate) usize);

impl TxNodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to any selectable node of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Transaction(TxNodeId),
    Utxo(TxNodeId, u32),
}

impl NodeRef {
    /// Transaction node owning this node (itself for transactions)
    pub fn owner(&self) -> TxNodeId {
        match self {
            NodeRef::Transaction(id) | NodeRef::Utxo(id, _) => *id,
        }
    }
}

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one built graph instance
///
/// Two builds of the same program produce different ids, so diagram keys
/// derived from one instance never collide with those of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    pub(crate) fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph-{}", self.0)
    }
}
