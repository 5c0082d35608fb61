//! Transaction detail view model
//!
//! Describes each input of a transaction the way the detail panel shows it:
//! where it comes from, whether that output is part of the contract, the
//! relative lock carried by its sequence, and its unlocking data.

use crate::display_formatting::{format_duration, format_outpoint};
use base64::Engine;
use bitcoin::relative;
use bitcoin::{OutPoint, Sequence, TxIn, Txid};
use std::fmt;
use studio_core::{ContractGraph, EntityId};

/// Relative lock time encoded in an input's sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeLock {
    /// Blocks that must pass after the spent output confirms
    Height(u16),
    /// Seconds, always a multiple of 512
    Time(u32),
}

impl RelativeLock {
    /// Decode a sequence; `None` when disabled or zero
    pub fn from_sequence(sequence: Sequence) -> Option<Self> {
        match sequence.to_relative_lock_time()? {
            relative::LockTime::Blocks(height) if height.value() > 0 => {
                Some(RelativeLock::Height(height.value()))
            }
            relative::LockTime::Time(time) if time.value() > 0 => {
                Some(RelativeLock::Time(u32::from(time.value()) * 512))
            }
            _ => None,
        }
    }
}

impl fmt::Display for RelativeLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeLock::Height(blocks) => write!(f, "Relative Height: {}", blocks),
            RelativeLock::Time(seconds) => {
                write!(f, "Relative Time: {}", format_duration(u64::from(*seconds)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDetail {
    pub index: usize,
    pub outpoint: OutPoint,
    /// Short form of the outpoint for display
    pub outpoint_display: String,
    /// Entity to jump to when the spent output belongs to this contract
    pub goto: Option<EntityId>,
    pub relative_lock: Option<RelativeLock>,
    /// `None` for an empty script sig
    pub script_sig_asm: Option<String>,
    /// Witness stack items, hex
    pub witness: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    pub txid: Txid,
    pub inputs: Vec<InputDetail>,
    /// PSBT carried by the program, base64
    pub psbt: Option<String>,
}

fn input_detail(graph: &ContractGraph, index: usize, input: &TxIn) -> InputDetail {
    let outpoint = input.previous_output;
    let goto = graph
        .lookup_utxo(&outpoint.txid, outpoint.vout)
        .map(|utxo| EntityId::Outpoint(utxo.outpoint()));

    InputDetail {
        index,
        outpoint,
        outpoint_display: format_outpoint(&outpoint),
        goto,
        relative_lock: RelativeLock::from_sequence(input.sequence),
        script_sig_asm: (!input.script_sig.is_empty())
            .then(|| input.script_sig.to_asm_string()),
        witness: input.witness.iter().map(hex::encode).collect(),
    }
}

/// Detail view of one transaction; `None` if it is not in the graph
pub fn transaction_detail(graph: &ContractGraph, txid: &Txid) -> Option<TransactionDetail> {
    let node = graph.lookup_by_txid(txid)?;
    let inputs = node
        .tx()
        .input
        .iter()
        .enumerate()
        .map(|(index, input)| input_detail(graph, index, input))
        .collect();
    let psbt = node
        .psbt()
        .map(|psbt| base64::engine::general_purpose::STANDARD.encode(psbt.serialize()));

    Some(TransactionDetail {
        txid: node.txid(),
        inputs,
        psbt,
    })
}
