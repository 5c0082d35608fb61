//! Deterministic transaction builders for tests
//!
//! Every transaction built here spends at least one input, so its
//! consensus encoding never collides with the segwit marker.

use crate::program::{ProgramDescription, TransactionSpec};
use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

/// Outpoint of a transaction that is never part of any fixture program
pub fn funding_outpoint(tag: u8) -> OutPoint {
    OutPoint {
        txid: Txid::from_byte_array([0xee ^ tag; 32]),
        vout: tag as u32,
    }
}

fn build(inputs: &[OutPoint], outputs: usize, tag: u8, witness: bool) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs
            .iter()
            .map(|outpoint| TxIn {
                previous_output: *outpoint,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: if witness {
                    Witness::from_slice(&[vec![tag; 8]])
                } else {
                    Witness::new()
                },
            })
            .collect(),
        output: (0..outputs)
            .map(|i| TxOut {
                value: Amount::from_sat(10_000 * (i as u64 + 1)),
                script_pubkey: ScriptBuf::from_bytes(vec![0x51, 0x01, tag]),
            })
            .collect(),
    }
}

/// Transaction with the given inputs and `outputs` outputs; `tag` varies the txid
pub fn transaction(inputs: &[OutPoint], outputs: usize, tag: u8) -> Transaction {
    build(inputs, outputs, tag, false)
}

/// Like [`transaction`] but with witness data, so txid and wtxid differ
pub fn witness_transaction(inputs: &[OutPoint], outputs: usize, tag: u8) -> Transaction {
    build(inputs, outputs, tag, true)
}

/// Program listing the given transactions in order
pub fn program(txs: &[Transaction]) -> ProgramDescription {
    ProgramDescription::new(txs.iter().map(TransactionSpec::from_transaction).collect())
}

/// `len` transactions where the first is externally funded and each later
/// one spends output 0 of its predecessor. Every transaction has two outputs.
pub fn chain(len: usize) -> Vec<Transaction> {
    let mut txs: Vec<Transaction> = Vec::with_capacity(len);
    for i in 0..len {
        let input = match txs.last() {
            Some(prev) => OutPoint {
                txid: prev.compute_txid(),
                vout: 0,
            },
            None => funding_outpoint(0),
        };
        txs.push(transaction(&[input], 2, i as u8 + 1));
    }
    txs
}
