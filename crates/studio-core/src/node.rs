//! Transaction and UTXO nodes
//!
//! Nodes hold the parsed transaction data plus display state (selection and
//! broadcast status). Display state is a cache of decisions made elsewhere;
//! nothing here talks to a renderer.

use crate::error::{Error, Result};
use crate::program::{NodeMetadata, ParsedTransaction};
use crate::types::TxNodeId;
use bitcoin::psbt::Psbt;
use bitcoin::{Amount, OutPoint, ScriptBuf, Transaction, TxOut, Txid, Wtxid};

/// Broadcast status of a transaction as of the last readiness computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastStatus {
    /// Known to have been broadcast
    Confirmed,
    /// Every input is satisfied; can be broadcast now
    Ready,
    /// Waits on an in-graph transaction that has not been broadcast
    #[default]
    Blocked,
}

impl BroadcastStatus {
    /// Member of the broadcastable set
    pub fn is_broadcastable(&self) -> bool {
        matches!(self, BroadcastStatus::Confirmed | BroadcastStatus::Ready)
    }
}

/// One transaction of a contract graph
#[derive(Debug, Clone)]
pub struct TransactionNode {
    tx: Transaction,
    txid: Txid,
    wtxid: Wtxid,
    psbt: Option<Psbt>,
    metadata: NodeMetadata,
    utxos: Vec<UtxoNode>,
    selected: bool,
    status: BroadcastStatus,
}

impl TransactionNode {
    /// Build a node and one UTXO node per output, in output order
    pub fn new(parsed: ParsedTransaction) -> Self {
        let ParsedTransaction {
            tx,
            psbt,
            metadata,
            output_metadata,
        } = parsed;
        let txid = tx.compute_txid();
        let wtxid = tx.compute_wtxid();

        let utxos = tx
            .output
            .iter()
            .zip(output_metadata)
            .enumerate()
            .map(|(vout, (txout, meta))| {
                UtxoNode::new(
                    OutPoint {
                        txid,
                        vout: vout as u32,
                    },
                    txout.clone(),
                    meta,
                )
            })
            .collect();

        Self {
            tx,
            txid,
            wtxid,
            psbt,
            metadata,
            utxos,
            selected: false,
            status: BroadcastStatus::default(),
        }
    }

    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    /// Canonical id
    pub fn txid(&self) -> Txid {
        self.txid
    }

    /// Alternate (witness) id
    pub fn wtxid(&self) -> Wtxid {
        self.wtxid
    }

    /// Whether the witness id differs from the canonical id
    pub fn has_distinct_wtxid(&self) -> bool {
        self.wtxid.to_raw_hash() != self.txid.to_raw_hash()
    }

    pub fn psbt(&self) -> Option<&Psbt> {
        self.psbt.as_ref()
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn utxos(&self) -> &[UtxoNode] {
        &self.utxos
    }

    pub fn utxo(&self, vout: u32) -> Option<&UtxoNode> {
        self.utxos.get(vout as usize)
    }

    pub fn utxo_mut(&mut self, vout: u32) -> Option<&mut UtxoNode> {
        self.utxos.get_mut(vout as usize)
    }

    /// Whether any input of this transaction spends `outpoint`
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.tx
            .input
            .iter()
            .any(|input| input.previous_output == *outpoint)
    }

    pub fn select(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn status(&self) -> BroadcastStatus {
        self.status
    }

    pub fn is_broadcastable(&self) -> bool {
        self.status.is_broadcastable()
    }

    pub(crate) fn set_status(&mut self, status: BroadcastStatus) {
        self.status = status;
    }

    /// Total value of all outputs
    pub fn total_output(&self) -> Amount {
        self.tx.output.iter().map(|out| out.value).sum()
    }
}

/// One output of a transaction node
#[derive(Debug, Clone)]
pub struct UtxoNode {
    outpoint: OutPoint,
    txout: TxOut,
    metadata: NodeMetadata,
    spend_link: Option<TxNodeId>,
    conflicting_spends: Vec<TxNodeId>,
    selected: bool,
}

impl UtxoNode {
    pub fn new(outpoint: OutPoint, txout: TxOut, metadata: NodeMetadata) -> Self {
        Self {
            outpoint,
            txout,
            metadata,
            spend_link: None,
            conflicting_spends: Vec::new(),
            selected: false,
        }
    }

    pub fn outpoint(&self) -> OutPoint {
        self.outpoint
    }

    pub fn index(&self) -> u32 {
        self.outpoint.vout
    }

    pub fn value(&self) -> Amount {
        self.txout.value
    }

    pub fn script_pubkey(&self) -> &ScriptBuf {
        &self.txout.script_pubkey
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// The in-graph transaction consuming this output, if any
    pub fn spend_link(&self) -> Option<TxNodeId> {
        self.spend_link
    }

    /// Alternative in-graph spenders after the first, in program order
    pub fn conflicting_spends(&self) -> &[TxNodeId] {
        &self.conflicting_spends
    }

    /// Every in-graph spender: the spend link followed by conflicting spends
    pub fn spenders(&self) -> impl Iterator<Item = TxNodeId> + '_ {
        self.spend_link
            .iter()
            .copied()
            .chain(self.conflicting_spends.iter().copied())
    }

    /// Record `candidate` as a consumer of this output
    ///
    /// The first consumer becomes the spend link; any further consumer is an
    /// alternative branch and is kept as a conflicting spend. Fails with
    /// [`Error::InvalidSpendLink`] if no input of `candidate` spends this
    /// output.
    pub fn set_spend_link(&mut self, id: TxNodeId, candidate: &TransactionNode) -> Result<()> {
        if !candidate.spends(&self.outpoint) {
            return Err(Error::InvalidSpendLink {
                outpoint: self.outpoint,
                spender: candidate.txid(),
            });
        }

        match self.spend_link {
            None => self.spend_link = Some(id),
            Some(existing) if existing == id => {}
            Some(_) => {
                if !self.conflicting_spends.contains(&id) {
                    log::debug!(
                        "{} has an alternative spender {}",
                        self.outpoint,
                        candidate.txid()
                    );
                    self.conflicting_spends.push(id);
                }
            }
        }
        Ok(())
    }

    pub fn select(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}
