//! Contract Studio Core Library
//!
//! The contract graph model behind the contract diagram editor.
//!
//! This crate provides:
//! - Program descriptions (transactions as compiled by a contract compiler)
//! - Identity index over txids and witness txids
//! - Transaction and UTXO nodes with spend links
//! - The contract graph and its lookups
//! - Broadcast readiness over the graph

pub mod broadcast;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod graph;
pub mod index;
pub mod node;
pub mod program;
pub mod types;

pub use broadcast::{extend_with_confirmed, readiness_closure, update_broadcastable, Readiness};
pub use error::{Error, Result};
pub use graph::ContractGraph;
pub use index::IdentityIndex;
pub use node::{BroadcastStatus, TransactionNode, UtxoNode};
pub use program::{NodeMetadata, ParsedTransaction, ProgramDescription, TransactionSpec};
pub use types::{EntityId, GraphId, NodeRef, SelectedEntity, TxNodeId};
