//! Property tests over randomly shaped contract graphs
//!
//! Programs are random DAGs: each transaction spends one to three outputs,
//! each either external or an output of an earlier transaction. Several
//! transactions may spend the same output, as alternative branches do.

use bitcoin::{OutPoint, Transaction, Txid};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::BTreeSet;
use studio_core::{
    extend_with_confirmed, fixtures, readiness_closure, update_broadcastable, ContractGraph,
};

const OUTPUTS: usize = 2;

fn dag() -> impl Strategy<Value = Vec<Transaction>> {
    let input = (any::<Index>(), 0..OUTPUTS as u32, prop::bool::weighted(0.8));
    prop::collection::vec(prop::collection::vec(input, 1..4), 1..9).prop_map(|specs| {
        let mut txs: Vec<Transaction> = Vec::with_capacity(specs.len());
        for (i, inputs) in specs.into_iter().enumerate() {
            let mut outpoints: Vec<OutPoint> = Vec::new();
            for (k, (parent, vout, internal)) in inputs.into_iter().enumerate() {
                let outpoint = if internal && !txs.is_empty() {
                    OutPoint {
                        txid: txs[parent.index(txs.len())].compute_txid(),
                        vout,
                    }
                } else {
                    fixtures::funding_outpoint((i * 4 + k) as u8)
                };
                if !outpoints.contains(&outpoint) {
                    outpoints.push(outpoint);
                }
            }
            let tag = i as u8 + 1;
            let tx = if i % 2 == 0 {
                fixtures::transaction(&outpoints, OUTPUTS, tag)
            } else {
                fixtures::witness_transaction(&outpoints, OUTPUTS, tag)
            };
            txs.push(tx);
        }
        txs
    })
}

/// Txids selected from `txs` by the bits of `mask`
fn subset(txs: &[Transaction], mask: u16) -> BTreeSet<Txid> {
    txs.iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, tx)| tx.compute_txid())
        .collect()
}

fn build(txs: &[Transaction]) -> ContractGraph {
    ContractGraph::build(&fixtures::program(txs)).expect("generated programs are well formed")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_node_reachable_by_both_ids(txs in dag()) {
        let graph = build(&txs);
        prop_assert_eq!(graph.len(), txs.len());
        for tx in &txs {
            let by_txid = graph.lookup_by_txid(&tx.compute_txid());
            prop_assert!(by_txid.is_some());
            let by_wtxid = graph.lookup_by_wtxid(&tx.compute_wtxid());
            prop_assert!(by_wtxid.is_some());
            prop_assert!(std::ptr::eq(by_txid.unwrap(), by_wtxid.unwrap()));
        }
    }

    #[test]
    fn spend_links_match_inputs(txs in dag()) {
        let graph = build(&txs);
        for utxo in graph.utxos() {
            for spender in utxo.spenders() {
                let node = graph.node(spender).unwrap();
                prop_assert!(node
                    .tx()
                    .input
                    .iter()
                    .any(|input| input.previous_output == utxo.outpoint()));
            }
        }
        // and every in-graph input is linked back
        for (id, node) in graph.transactions() {
            for input in &node.tx().input {
                let outpoint = input.previous_output;
                if let Some(utxo) = graph.lookup_utxo(&outpoint.txid, outpoint.vout) {
                    prop_assert!(utxo.spenders().any(|s| s == id));
                }
            }
        }
    }

    #[test]
    fn propagation_is_repeatable(txs in dag(), mask in any::<u16>()) {
        let mut graph = build(&txs);
        let confirmed = subset(&txs, mask);

        let first = update_broadcastable(&mut graph, &confirmed);
        let statuses: Vec<_> = graph.transactions().map(|(_, n)| n.status()).collect();
        let second = update_broadcastable(&mut graph, &confirmed);
        let again: Vec<_> = graph.transactions().map(|(_, n)| n.status()).collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(statuses, again);
        prop_assert!(confirmed.is_subset(first.broadcastable()));
    }

    #[test]
    fn closure_is_idempotent(txs in dag(), mask in any::<u16>()) {
        let graph = build(&txs);
        let closure = readiness_closure(&graph, &subset(&txs, mask));
        prop_assert_eq!(readiness_closure(&graph, &closure), closure);
    }

    #[test]
    fn readiness_is_monotonic(txs in dag(), mask in any::<u16>(), extra in any::<u16>()) {
        let mut graph = build(&txs);
        let smaller = subset(&txs, mask);
        let larger = subset(&txs, mask | extra);

        let small = update_broadcastable(&mut graph, &smaller);
        let large = update_broadcastable(&mut graph, &larger);
        prop_assert!(small.broadcastable().is_subset(large.broadcastable()));

        let small_closure = readiness_closure(&graph, &smaller);
        let large_closure = readiness_closure(&graph, &larger);
        prop_assert!(small_closure.is_subset(&large_closure));
    }

    #[test]
    fn incremental_matches_full_recompute(txs in dag(), order in any::<u16>()) {
        let mut graph = build(&txs);
        let mut readiness = update_broadcastable(&mut graph, &BTreeSet::new());
        let mut confirmed = BTreeSet::new();

        for txid in subset(&txs, order) {
            confirmed.insert(txid);
            readiness = extend_with_confirmed(&mut graph, &readiness, txid);
        }
        let statuses: Vec<_> = graph.transactions().map(|(_, n)| n.status()).collect();

        let full = update_broadcastable(&mut graph, &confirmed);
        let full_statuses: Vec<_> = graph.transactions().map(|(_, n)| n.status()).collect();
        prop_assert_eq!(readiness, full);
        prop_assert_eq!(statuses, full_statuses);
    }

    #[test]
    fn program_order_does_not_matter(
        (txs, shuffled) in dag().prop_flat_map(|txs| (Just(txs.clone()), Just(txs).prop_shuffle())),
        mask in any::<u16>(),
    ) {
        let mut graph = build(&txs);
        let mut reordered = build(&shuffled);
        let confirmed = subset(&txs, mask);

        prop_assert_eq!(
            update_broadcastable(&mut graph, &confirmed),
            update_broadcastable(&mut reordered, &confirmed)
        );
        prop_assert_eq!(
            readiness_closure(&graph, &confirmed),
            readiness_closure(&reordered, &confirmed)
        );
    }
}
