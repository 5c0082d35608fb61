//! Contract graph summary for status displays

use bitcoin::Amount;
use studio_core::{ContractGraph, Readiness};

/// Counts and totals over one contract graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub num_transactions: usize,
    pub num_outputs: usize,
    /// Outputs consumed by some transaction of the contract
    pub spent_outputs: usize,
    /// Outputs consumed by more than one transaction of the contract
    pub contested_outputs: usize,
    /// Inputs funded from outside the contract
    pub external_inputs: usize,
    pub confirmed: usize,
    /// Broadcastable but not yet confirmed
    pub pending: usize,
    /// Value of outputs nothing in the contract spends
    pub unspent_value: Amount,
}

/// Compute the summary of a graph given its last readiness result
pub fn compute_graph_summary(graph: &ContractGraph, readiness: &Readiness) -> GraphSummary {
    let mut summary = GraphSummary {
        num_transactions: graph.len(),
        num_outputs: graph.utxo_count(),
        ..GraphSummary::default()
    };

    for utxo in graph.utxos() {
        if utxo.spend_link().is_some() {
            summary.spent_outputs += 1;
        } else {
            summary.unspent_value += utxo.value();
        }
        if !utxo.conflicting_spends().is_empty() {
            summary.contested_outputs += 1;
        }
    }

    for (_, node) in graph.transactions() {
        summary.external_inputs += node
            .tx()
            .input
            .iter()
            .filter(|input| !graph.index().contains(&input.previous_output.txid))
            .count();
        if readiness.confirmed().contains(&node.txid()) {
            summary.confirmed += 1;
        } else if readiness.is_broadcastable(&node.txid()) {
            summary.pending += 1;
        }
    }

    summary
}
