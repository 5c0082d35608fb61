//! Broadcast readiness
//!
//! A transaction is ready when every input either spends an output created
//! outside the graph (assumed available) or spends an output of a
//! transaction already known to be broadcast. The broadcastable set is the
//! confirmed set plus every ready transaction.

use crate::graph::ContractGraph;
use crate::node::BroadcastStatus;
use crate::types::TxNodeId;
use bitcoin::Txid;
use std::collections::BTreeSet;

/// Result of a readiness computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    confirmed: BTreeSet<Txid>,
    broadcastable: BTreeSet<Txid>,
}

impl Readiness {
    /// Transactions known to be broadcast
    pub fn confirmed(&self) -> &BTreeSet<Txid> {
        &self.confirmed
    }

    /// Confirmed transactions plus those that can be broadcast now
    pub fn broadcastable(&self) -> &BTreeSet<Txid> {
        &self.broadcastable
    }

    pub fn is_broadcastable(&self, txid: &Txid) -> bool {
        self.broadcastable.contains(txid)
    }

    /// Broadcastable but not yet broadcast
    pub fn pending(&self) -> impl Iterator<Item = &Txid> {
        self.broadcastable.difference(&self.confirmed)
    }
}

/// Whether every in-graph parent of `id` is confirmed
fn parents_confirmed(graph: &ContractGraph, id: TxNodeId, confirmed: &BTreeSet<Txid>) -> bool {
    graph.parents(id).iter().all(|parent| {
        graph
            .node(*parent)
            .is_some_and(|p| confirmed.contains(&p.txid()))
    })
}

/// The canonical txid for `txid`, which may be a witness id alias of an
/// in-graph transaction. Ids outside the graph are returned unchanged.
fn canonical(graph: &ContractGraph, txid: Txid) -> Txid {
    graph
        .index()
        .resolve(&txid)
        .and_then(|id| graph.node(id))
        .map_or(txid, |node| node.txid())
}

fn canonical_set(graph: &ContractGraph, ids: &BTreeSet<Txid>) -> BTreeSet<Txid> {
    ids.iter().map(|txid| canonical(graph, *txid)).collect()
}

fn status_for(txid: &Txid, ready: bool, confirmed: &BTreeSet<Txid>) -> BroadcastStatus {
    if confirmed.contains(txid) {
        BroadcastStatus::Confirmed
    } else if ready {
        BroadcastStatus::Ready
    } else {
        BroadcastStatus::Blocked
    }
}

/// Recompute readiness for the whole graph and update every node's status
///
/// Deterministic in its inputs: calling it again with the same graph and
/// confirmed set gives the same result and the same node statuses.
pub fn update_broadcastable(graph: &mut ContractGraph, confirmed: &BTreeSet<Txid>) -> Readiness {
    let view: &ContractGraph = graph;
    let confirmed = canonical_set(view, confirmed);
    let mut broadcastable = confirmed.clone();
    let decisions: Vec<(TxNodeId, BroadcastStatus)> = view
        .transactions()
        .map(|(id, node)| {
            let ready = parents_confirmed(view, id, &confirmed);
            (id, status_for(&node.txid(), ready, &confirmed))
        })
        .collect();

    for (id, status) in decisions {
        if let Some(node) = graph.node_mut(id) {
            node.set_status(status);
            if status.is_broadcastable() {
                broadcastable.insert(node.txid());
            }
        }
    }

    log::debug!(
        "{}: {} confirmed, {} broadcastable",
        graph.id(),
        confirmed.len(),
        broadcastable.len()
    );
    Readiness {
        confirmed,
        broadcastable,
    }
}

/// Every transaction that becomes broadcastable once its in-graph ancestors
/// are broadcast, starting from `confirmed`
///
/// This is the fixed point of the readiness rule, computed in one pass over
/// the graph's topological order. Applying it to its own output returns the
/// same set.
pub fn readiness_closure(graph: &ContractGraph, confirmed: &BTreeSet<Txid>) -> BTreeSet<Txid> {
    let mut closure = canonical_set(graph, confirmed);
    for id in graph.topological_order() {
        let Some(node) = graph.node(*id) else {
            continue;
        };
        if parents_confirmed(graph, *id, &closure) {
            closure.insert(node.txid());
        }
    }
    closure
}

/// Grow a previous result by one broadcast confirmation
///
/// Only the in-graph spenders of `txid`'s outputs can become ready because
/// of it, so only they are re-evaluated. The result equals a full
/// [`update_broadcastable`] over the enlarged confirmed set.
pub fn extend_with_confirmed(
    graph: &mut ContractGraph,
    previous: &Readiness,
    txid: Txid,
) -> Readiness {
    let txid = canonical(graph, txid);
    let mut next = previous.clone();
    next.confirmed.insert(txid);
    next.broadcastable.insert(txid);

    let Some(confirmed_id) = graph.index().resolve(&txid) else {
        log::debug!("{}: confirmation for external transaction {}", graph.id(), txid);
        return next;
    };

    let mut candidates: Vec<TxNodeId> = graph
        .node(confirmed_id)
        .map(|node| node.utxos().iter().flat_map(|u| u.spenders()).collect())
        .unwrap_or_default();
    candidates.sort();
    candidates.dedup();

    let mut updates = vec![(confirmed_id, BroadcastStatus::Confirmed)];
    for id in candidates {
        let Some(node) = graph.node(id) else {
            continue;
        };
        let ready = parents_confirmed(graph, id, &next.confirmed);
        updates.push((id, status_for(&node.txid(), ready, &next.confirmed)));
    }

    for (id, status) in updates {
        if let Some(node) = graph.node_mut(id) {
            node.set_status(status);
            if status.is_broadcastable() {
                next.broadcastable.insert(node.txid());
            }
        }
    }
    next
}
