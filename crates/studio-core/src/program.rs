//! Program descriptions
//!
//! A program is the ordered list of transactions a contract compiles to.
//! Each entry carries the consensus-encoded transaction as hex, optionally a
//! base64 PSBT for the same transaction, and display metadata.

use crate::error::{Error, Result};
use base64::Engine;
use bitcoin::psbt::Psbt;
use bitcoin::Transaction;
use serde::{Deserialize, Serialize};

/// Ordered sequence of transaction specifications making up one contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDescription {
    #[serde(default)]
    pub program: Vec<TransactionSpec>,
}

impl ProgramDescription {
    pub fn new(program: Vec<TransactionSpec>) -> Self {
        Self { program }
    }

    /// Program with no transactions; builds an empty graph
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }
}

/// Display metadata attached to a transaction or one of its outputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NodeMetadata {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            color: None,
        }
    }
}

/// One transaction of a program, as delivered by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSpec {
    /// Consensus-encoded transaction, hex
    pub hex: String,

    /// PSBT for the same transaction, base64
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psbt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,

    /// Per-output metadata, indexed by output position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_metadata: Vec<Option<NodeMetadata>>,
}

/// A transaction specification after decoding
#[derive(Debug, Clone)]
pub struct ParsedTransaction {
    pub tx: Transaction,
    pub psbt: Option<Psbt>,
    pub metadata: NodeMetadata,
    /// One entry per output, defaulted where the spec carried none
    pub output_metadata: Vec<NodeMetadata>,
}

impl TransactionSpec {
    /// Create a spec from an already built transaction
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            hex: hex::encode(bitcoin::consensus::serialize(tx)),
            psbt: None,
            metadata: None,
            output_metadata: Vec::new(),
        }
    }

    /// Attach a PSBT, encoded as base64
    pub fn with_psbt(mut self, psbt: &Psbt) -> Self {
        self.psbt = Some(base64::engine::general_purpose::STANDARD.encode(psbt.serialize()));
        self
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Decode this spec
    ///
    /// `position` is the spec's place in the program and only serves error
    /// reporting.
    pub fn parse(&self, position: usize) -> Result<ParsedTransaction> {
        let bytes = hex::decode(self.hex.trim())
            .map_err(|e| Error::malformed_at(position, format!("invalid hex: {}", e)))?;
        let tx: Transaction = bitcoin::consensus::deserialize(&bytes)
            .map_err(|e| Error::malformed_at(position, format!("invalid transaction: {}", e)))?;

        let psbt = match &self.psbt {
            Some(encoded) => Some(decode_psbt(encoded, position)?),
            None => None,
        };
        if let Some(psbt) = &psbt {
            if psbt.unsigned_tx.compute_txid() != tx.compute_txid() {
                return Err(Error::malformed_at(
                    position,
                    "psbt describes a different transaction",
                ));
            }
        }

        if self.output_metadata.len() > tx.output.len() {
            return Err(Error::malformed_at(
                position,
                format!(
                    "{} output metadata entries for {} outputs",
                    self.output_metadata.len(),
                    tx.output.len()
                ),
            ));
        }
        let output_metadata = (0..tx.output.len())
            .map(|i| {
                self.output_metadata
                    .get(i)
                    .cloned()
                    .flatten()
                    .unwrap_or_default()
            })
            .collect();

        Ok(ParsedTransaction {
            tx,
            psbt,
            metadata: self.metadata.clone().unwrap_or_default(),
            output_metadata,
        })
    }
}

fn decode_psbt(encoded: &str, position: usize) -> Result<Psbt> {
    let cleaned = encoded.trim().replace(['\n', '\r', ' '], "");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| Error::malformed_at(position, format!("invalid psbt base64: {}", e)))?;
    Psbt::deserialize(&bytes)
        .map_err(|e| Error::malformed_at(position, format!("invalid psbt: {}", e)))
}
