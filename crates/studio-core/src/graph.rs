//! Contract graph
//!
//! The full set of transaction and UTXO nodes built from one program, plus
//! the identity index over them. A graph is built atomically and its
//! topology never changes afterwards; only per-node display state does.

use crate::error::{Error, Result};
use crate::index::IdentityIndex;
use crate::node::{TransactionNode, UtxoNode};
use crate::program::ProgramDescription;
use crate::types::{EntityId, GraphId, NodeRef, TxNodeId};
use bitcoin::{OutPoint, Txid, Wtxid};
use std::collections::VecDeque;

#[derive(Debug)]
pub struct ContractGraph {
    id: GraphId,
    txns: Vec<TransactionNode>,
    index: IdentityIndex,
    /// In-graph parents of each transaction, deduplicated
    parents: Vec<Vec<TxNodeId>>,
    /// Parents before children
    topo_order: Vec<TxNodeId>,
}

impl ContractGraph {
    /// Build a graph from a program description
    ///
    /// First pass: parse every transaction in program order and register it
    /// in the index. Second pass: resolve each input; inputs whose
    /// transaction is in the graph become spend links, the rest are treated
    /// as externally funded.
    pub fn build(program: &ProgramDescription) -> Result<Self> {
        let mut txns = Vec::with_capacity(program.len());
        let mut index = IdentityIndex::new();

        for (position, spec) in program.program.iter().enumerate() {
            let node = TransactionNode::new(spec.parse(position)?);
            index.register(TxNodeId(position), node.txid(), node.wtxid())?;
            txns.push(node);
        }

        let mut links = Vec::new();
        let mut parents = vec![Vec::new(); txns.len()];
        for (position, node) in txns.iter().enumerate() {
            for input in &node.tx().input {
                let outpoint = input.previous_output;
                // Outpoints name txids; a witness id match is not a spend
                let Some(parent) = index
                    .resolve(&outpoint.txid)
                    .filter(|parent| txns[parent.0].txid() == outpoint.txid)
                else {
                    continue;
                };
                if parent.0 == position {
                    return Err(Error::malformed_at(position, "spends its own output"));
                }
                if outpoint.vout as usize >= txns[parent.0].utxos().len() {
                    return Err(Error::malformed_at(
                        position,
                        format!("input {} references a missing output", outpoint),
                    ));
                }
                links.push((parent, outpoint.vout, TxNodeId(position)));
                if !parents[position].contains(&parent) {
                    parents[position].push(parent);
                }
            }
        }

        let topo_order = topological_order(&parents).ok_or_else(|| {
            Error::MalformedProgram("spend dependencies form a cycle".to_string())
        })?;

        for (parent, vout, child) in links {
            let (parent_node, child_node) = pair_mut(&mut txns, parent.0, child.0);
            if let Some(utxo) = parent_node.utxo_mut(vout) {
                utxo.set_spend_link(child, child_node)?;
            }
        }

        let graph = Self {
            id: GraphId::next(),
            txns,
            index,
            parents,
            topo_order,
        };
        log::debug!(
            "built {} with {} transactions and {} outputs",
            graph.id,
            graph.len(),
            graph.utxo_count()
        );
        Ok(graph)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    pub fn utxo_count(&self) -> usize {
        self.txns.iter().map(|node| node.utxos().len()).sum()
    }

    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    /// Transactions in program order
    pub fn transactions(&self) -> impl Iterator<Item = (TxNodeId, &TransactionNode)> {
        self.txns
            .iter()
            .enumerate()
            .map(|(i, node)| (TxNodeId(i), node))
    }

    /// Every UTXO node, grouped by transaction in program order
    pub fn utxos(&self) -> impl Iterator<Item = &UtxoNode> {
        self.txns.iter().flat_map(|node| node.utxos().iter())
    }

    pub fn node(&self, id: TxNodeId) -> Option<&TransactionNode> {
        self.txns.get(id.0)
    }

    pub fn node_mut(&mut self, id: TxNodeId) -> Option<&mut TransactionNode> {
        self.txns.get_mut(id.0)
    }

    /// In-graph transactions this transaction spends from
    pub fn parents(&self, id: TxNodeId) -> &[TxNodeId] {
        self.parents.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transactions ordered so that every parent precedes its children
    pub fn topological_order(&self) -> &[TxNodeId] {
        &self.topo_order
    }

    /// Resolve a transaction by canonical or witness id
    pub fn lookup_by_txid(&self, id: &Txid) -> Option<&TransactionNode> {
        self.index.resolve(id).and_then(|node| self.node(node))
    }

    pub fn lookup_by_wtxid(&self, id: &Wtxid) -> Option<&TransactionNode> {
        self.index.resolve_wtxid(id).and_then(|node| self.node(node))
    }

    /// Resolve one output; an index past the output count is not found
    pub fn lookup_utxo(&self, txid: &Txid, vout: u32) -> Option<&UtxoNode> {
        self.lookup_by_txid(txid).and_then(|node| node.utxo(vout))
    }

    /// Resolve a selectable entity to a node handle
    pub fn resolve_entity(&self, entity: &EntityId) -> Option<NodeRef> {
        match entity {
            EntityId::Transaction(txid) => self.index.resolve(txid).map(NodeRef::Transaction),
            EntityId::Outpoint(OutPoint { txid, vout }) => {
                let owner = self.index.resolve(txid)?;
                self.node(owner)?.utxo(*vout)?;
                Some(NodeRef::Utxo(owner, *vout))
            }
        }
    }

    /// Canonical entity id for a node handle
    pub fn entity_of(&self, node: NodeRef) -> Option<EntityId> {
        match node {
            NodeRef::Transaction(id) => self.node(id).map(|n| EntityId::Transaction(n.txid())),
            NodeRef::Utxo(id, vout) => self
                .node(id)
                .and_then(|n| n.utxo(vout))
                .map(|u| EntityId::Outpoint(u.outpoint())),
        }
    }

    pub fn is_selected(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Transaction(id) => self.node(id).is_some_and(|n| n.is_selected()),
            NodeRef::Utxo(id, vout) => self
                .node(id)
                .and_then(|n| n.utxo(vout))
                .is_some_and(|u| u.is_selected()),
        }
    }

    /// Set the selection flag of a node; returns false if the handle is stale
    pub fn set_selected(&mut self, node: NodeRef, selected: bool) -> bool {
        match node {
            NodeRef::Transaction(id) => match self.node_mut(id) {
                Some(n) => {
                    n.select(selected);
                    true
                }
                None => false,
            },
            NodeRef::Utxo(id, vout) => match self.node_mut(id).and_then(|n| n.utxo_mut(vout)) {
                Some(u) => {
                    u.select(selected);
                    true
                }
                None => false,
            },
        }
    }

    /// Every node whose selection flag is set
    pub fn selected_nodes(&self) -> Vec<NodeRef> {
        let mut selected = Vec::new();
        for (id, node) in self.transactions() {
            if node.is_selected() {
                selected.push(NodeRef::Transaction(id));
            }
            for utxo in node.utxos() {
                if utxo.is_selected() {
                    selected.push(NodeRef::Utxo(id, utxo.index()));
                }
            }
        }
        selected
    }
}

/// Kahn's algorithm over parent lists; `None` if the dependencies are cyclic
fn topological_order(parents: &[Vec<TxNodeId>]) -> Option<Vec<TxNodeId>> {
    let mut pending: Vec<usize> = parents.iter().map(Vec::len).collect();
    let mut children = vec![Vec::new(); parents.len()];
    for (child, list) in parents.iter().enumerate() {
        for parent in list {
            children[parent.0].push(child);
        }
    }

    let mut queue: VecDeque<usize> = (0..parents.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(parents.len());
    while let Some(next) = queue.pop_front() {
        order.push(TxNodeId(next));
        for &child in &children[next] {
            pending[child] -= 1;
            if pending[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    (order.len() == parents.len()).then_some(order)
}

/// Mutable access to one element alongside shared access to another
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::program::TransactionSpec;
    use bitcoin::hashes::Hash;

    #[test]
    fn test_build_chain() {
        let txs = fixtures::chain(3);
        let graph = ContractGraph::build(&fixtures::program(&txs)).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.utxo_count(), 6);

        let t1 = txs[0].compute_txid();
        let t2 = txs[1].compute_txid();
        let link = graph.lookup_utxo(&t1, 0).unwrap().spend_link().unwrap();
        assert_eq!(graph.node(link).unwrap().txid(), t2);
        assert!(graph.lookup_utxo(&t1, 1).unwrap().spend_link().is_none());
        assert_eq!(graph.parents(TxNodeId(1)), &[TxNodeId(0)]);
        assert!(graph.parents(TxNodeId(0)).is_empty());
    }

    #[test]
    fn test_empty_program() {
        let graph = ContractGraph::build(&ProgramDescription::empty()).unwrap();
        assert!(graph.is_empty());
        assert!(graph.topological_order().is_empty());
    }

    #[test]
    fn test_lookup_utxo_out_of_range() {
        let txs = fixtures::chain(1);
        let graph = ContractGraph::build(&fixtures::program(&txs)).unwrap();

        assert!(graph.lookup_utxo(&txs[0].compute_txid(), 5).is_none());
        assert!(graph.lookup_utxo(&txs[0].compute_txid(), 1).is_some());
    }

    #[test]
    fn test_lookup_by_either_id() {
        let tx = fixtures::witness_transaction(&[fixtures::funding_outpoint(1)], 1, 1);
        let graph = ContractGraph::build(&fixtures::program(&[tx.clone()])).unwrap();

        let by_txid = graph.lookup_by_txid(&tx.compute_txid()).unwrap();
        let by_wtxid = graph.lookup_by_wtxid(&tx.compute_wtxid()).unwrap();
        assert_eq!(by_txid.txid(), by_wtxid.txid());
        assert!(by_txid.has_distinct_wtxid());
        assert_eq!(graph.index().len(), 2);
    }

    #[test]
    fn test_duplicate_transaction_rejected() {
        let tx = fixtures::transaction(&[fixtures::funding_outpoint(1)], 1, 1);
        let err = ContractGraph::build(&fixtures::program(&[tx.clone(), tx])).unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentity { .. }));
    }

    #[test]
    fn test_missing_output_rejected() {
        let parent = fixtures::transaction(&[fixtures::funding_outpoint(1)], 1, 1);
        let child = fixtures::transaction(
            &[OutPoint {
                txid: parent.compute_txid(),
                vout: 4,
            }],
            1,
            2,
        );

        let err = ContractGraph::build(&fixtures::program(&[parent, child])).unwrap_err();
        assert!(matches!(err, Error::MalformedProgram(_)));
    }

    #[test]
    fn test_input_naming_witness_id_is_external() {
        let segwit = fixtures::witness_transaction(&[fixtures::funding_outpoint(1)], 1, 1);
        let alias = OutPoint {
            txid: Txid::from_raw_hash(segwit.compute_wtxid().to_raw_hash()),
            vout: 0,
        };
        let spender = fixtures::transaction(&[alias], 1, 2);

        let graph =
            ContractGraph::build(&fixtures::program(&[segwit.clone(), spender.clone()])).unwrap();
        let utxo = graph.lookup_utxo(&segwit.compute_txid(), 0).unwrap();
        assert_eq!(utxo.spenders().count(), 0);
        let id = graph.index().resolve(&spender.compute_txid()).unwrap();
        assert!(graph.parents(id).is_empty());
    }

    #[test]
    fn test_malformed_spec_aborts_build() {
        let txs = fixtures::chain(2);
        let mut program = fixtures::program(&txs);
        program.program.push(TransactionSpec {
            hex: "00".to_string(),
            psbt: None,
            metadata: None,
            output_metadata: Vec::new(),
        });

        assert!(matches!(
            ContractGraph::build(&program),
            Err(Error::MalformedProgram(_))
        ));
    }

    #[test]
    fn test_children_listed_before_parents() {
        let mut txs = fixtures::chain(3);
        txs.reverse();
        let graph = ContractGraph::build(&fixtures::program(&txs)).unwrap();

        let order: Vec<Txid> = graph
            .topological_order()
            .iter()
            .map(|id| graph.node(*id).unwrap().txid())
            .collect();
        assert_eq!(order, vec![txs[2].compute_txid(), txs[1].compute_txid(), txs[0].compute_txid()]);
    }

    #[test]
    fn test_topological_order_detects_cycle() {
        let parents = vec![vec![TxNodeId(1)], vec![TxNodeId(0)], vec![]];
        assert!(topological_order(&parents).is_none());

        let parents = vec![vec![], vec![TxNodeId(0)], vec![TxNodeId(0), TxNodeId(1)]];
        assert_eq!(
            topological_order(&parents).unwrap(),
            vec![TxNodeId(0), TxNodeId(1), TxNodeId(2)]
        );
    }

    #[test]
    fn test_resolve_entity_and_selection() {
        let txs = fixtures::chain(2);
        let mut graph = ContractGraph::build(&fixtures::program(&txs)).unwrap();
        let outpoint = OutPoint {
            txid: txs[1].compute_txid(),
            vout: 1,
        };

        let node = graph.resolve_entity(&EntityId::Outpoint(outpoint)).unwrap();
        assert_eq!(node, NodeRef::Utxo(TxNodeId(1), 1));
        assert_eq!(graph.entity_of(node), Some(EntityId::Outpoint(outpoint)));

        assert!(graph.set_selected(node, true));
        assert!(graph.is_selected(node));
        assert_eq!(graph.selected_nodes(), vec![node]);

        let missing = OutPoint { vout: 9, ..outpoint };
        assert!(graph.resolve_entity(&EntityId::Outpoint(missing)).is_none());
    }
}
