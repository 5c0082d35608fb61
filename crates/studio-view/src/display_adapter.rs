//! Adapter for displaying contract graph nodes in a diagram
//!
//! Unifies the logic for turning graph nodes and spend relationships into
//! what the renderer draws.

use crate::display_formatting::{format_amount, format_outpoint, format_txid_short};
use crate::render::{DiagramLinkKey, DiagramNode, DiagramNodeKey, LinkKind};
use studio_core::{BroadcastStatus, ContractGraph, TransactionNode, UtxoNode};

/// Kind of diagram node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Transaction,
    Utxo,
}

/// What the renderer needs to draw a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDisplay {
    pub kind: NodeKind,
    pub title: String,
    pub subtitle: String,
    pub color: Option<String>,
    /// Only set for transactions
    pub status: Option<BroadcastStatus>,
    /// Only meaningful for outputs: consumed by an in-graph transaction
    pub is_spent: bool,
}

pub fn transaction_display(node: &TransactionNode) -> NodeDisplay {
    let title = node
        .metadata()
        .label
        .clone()
        .unwrap_or_else(|| format_txid_short(&node.txid()));
    let subtitle = format!(
        "{} in / {} out, {}",
        node.tx().input.len(),
        node.tx().output.len(),
        format_amount(node.total_output())
    );

    NodeDisplay {
        kind: NodeKind::Transaction,
        title,
        subtitle,
        color: node.metadata().color.clone(),
        status: Some(node.status()),
        is_spent: false,
    }
}

pub fn utxo_display(utxo: &UtxoNode) -> NodeDisplay {
    let title = utxo
        .metadata()
        .label
        .clone()
        .unwrap_or_else(|| format_outpoint(&utxo.outpoint()));

    NodeDisplay {
        kind: NodeKind::Utxo,
        title,
        subtitle: format_amount(utxo.value()),
        color: utxo.metadata().color.clone(),
        status: None,
        is_spent: utxo.spend_link().is_some(),
    }
}

/// Every node of a graph, transactions each followed by their outputs
pub fn extract_diagram_nodes(graph: &ContractGraph) -> Vec<DiagramNode> {
    let mut nodes = Vec::with_capacity(graph.len() + graph.utxo_count());

    for (_, node) in graph.transactions() {
        nodes.push(DiagramNode {
            key: DiagramNodeKey::new(graph.id(), node.txid()),
            display: transaction_display(node),
        });
        for utxo in node.utxos() {
            nodes.push(DiagramNode {
                key: DiagramNodeKey::new(graph.id(), utxo.outpoint()),
                display: utxo_display(utxo),
            });
        }
    }

    nodes
}

/// Every link of a graph: creation links, then spend links per output
pub fn extract_diagram_links(graph: &ContractGraph) -> Vec<DiagramLinkKey> {
    let mut links = Vec::new();

    for utxo in graph.utxos() {
        links.push(DiagramLinkKey {
            graph: graph.id(),
            kind: LinkKind::Creates(utxo.outpoint()),
        });
        for spender in utxo.spenders() {
            if let Some(spender) = graph.node(spender) {
                links.push(DiagramLinkKey {
                    graph: graph.id(),
                    kind: LinkKind::Spends {
                        outpoint: utxo.outpoint(),
                        spender: spender.txid(),
                    },
                });
            }
        }
    }

    links
}
