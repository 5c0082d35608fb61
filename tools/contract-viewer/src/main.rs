//! Contract Viewer
//!
//! Command-line inspector for contract program files. Loads a contract,
//! builds its graph, applies broadcast confirmations and prints the
//! transactions, their outputs and spend links, and what can be broadcast.

use anyhow::{Context, Result};
use bitcoin::{OutPoint, Txid};
use clap::Parser;
use std::path::PathBuf;
use studio_core::{BroadcastStatus, EntityId};
use studio_view::display_formatting::{
    format_amount, format_outpoint, format_txid_short, format_value_preview,
};
use studio_view::input_detail::TransactionDetail;
use studio_view::{MemoryCanvas, MemoryStore, StudioSession, ViewConfig};

#[derive(Parser, Debug)]
#[command(name = "contract-viewer", about = "Inspect a contract program file")]
struct Cli {
    /// Contract file (JSON)
    file: PathBuf,

    /// Mark a transaction as broadcast; may be repeated
    #[arg(long = "broadcast", value_name = "TXID")]
    broadcast: Vec<Txid>,

    /// Select a transaction (`txid`) or output (`txid:vout`) and show its details
    #[arg(long, value_name = "ID", value_parser = parse_entity)]
    select: Option<EntityId>,

    /// View configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_entity(s: &str) -> Result<EntityId, String> {
    if s.contains(':') {
        s.parse::<OutPoint>()
            .map(EntityId::Outpoint)
            .map_err(|e| format!("invalid outpoint: {}", e))
    } else {
        s.parse::<Txid>()
            .map(EntityId::Transaction)
            .map_err(|e| format!("invalid txid: {}", e))
    }
}

fn status_marker(status: BroadcastStatus) -> &'static str {
    match status {
        BroadcastStatus::Confirmed => "confirmed",
        BroadcastStatus::Ready => "ready",
        BroadcastStatus::Blocked => "blocked",
    }
}

fn print_graph(session: &StudioSession<MemoryCanvas, MemoryStore>) {
    let Some(contract) = session.contract() else {
        return;
    };
    let graph = contract.graph();

    println!("Transactions:");
    for (_, node) in graph.transactions() {
        let label = node.metadata().label.as_deref().unwrap_or("");
        println!(
            "  {} [{}] {}",
            node.txid(),
            status_marker(node.status()),
            label
        );
        for utxo in node.utxos() {
            let spent_by: Vec<String> = utxo
                .spenders()
                .filter_map(|id| graph.node(id))
                .map(|spender| format_txid_short(&spender.txid()))
                .collect();
            let spends = if spent_by.is_empty() {
                "unspent".to_string()
            } else {
                format!("spent by {}", spent_by.join(", "))
            };
            println!(
                "    #{} {} {}",
                utxo.index(),
                format_amount(utxo.value()),
                spends
            );
            println!(
                "       script {}",
                format_value_preview(utxo.script_pubkey().as_bytes())
            );
        }
    }

    println!();
    println!("Broadcastable:");
    for txid in contract.readiness().broadcastable() {
        let marker = if contract.readiness().confirmed().contains(txid) {
            "confirmed"
        } else {
            "pending"
        };
        println!("  {} ({})", txid, marker);
    }
}

fn print_detail(detail: &TransactionDetail) {
    println!("Inputs of {}:", detail.txid);
    for input in &detail.inputs {
        let origin = if input.goto.is_some() { "in contract" } else { "external" };
        println!("  #{} {} ({})", input.index, format_outpoint(&input.outpoint), origin);
        if let Some(lock) = input.relative_lock {
            println!("    {}", lock);
        }
        if let Some(asm) = &input.script_sig_asm {
            println!("    ScriptSig: {}", asm);
        }
        for (i, item) in input.witness.iter().enumerate() {
            println!("    Witness[{}]: {}", i, item);
        }
    }
    if let Some(psbt) = &detail.psbt {
        println!("  PSBT: {}", psbt);
    }
}

fn main() -> Result<()> {
    env_logger::builder().init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewConfig::load(path)
            .with_context(|| format!("loading view config {}", path.display()))?,
        None => ViewConfig::default(),
    };
    let (program, metadata) = studio_io::load_contract(&cli.file)
        .with_context(|| format!("loading contract {}", cli.file.display()))?;

    if let Some(description) = metadata.as_ref().and_then(|m| m.description.as_deref()) {
        println!("{}", description);
        println!();
    }

    let mut session = StudioSession::new(MemoryCanvas::default(), MemoryStore::new(), config);
    session
        .on_contract_data(Some(&program), 1)
        .context("building contract graph")?;

    for txid in &cli.broadcast {
        session.on_broadcast_confirmed(*txid);
    }

    if let Some(entity) = cli.select {
        session.store_mut().request(entity);
        session.reconcile_selection();
        loop {
            let events = session.target_mut().take_events();
            if events.is_empty() {
                break;
            }
            for event in &events {
                session.on_diagram_selection(event);
            }
        }
        log::debug!("selection state: {:?}", session.sync_state());
    }

    print_graph(&session);

    if let Some(summary) = session.summary() {
        println!();
        println!(
            "{} transactions, {} outputs ({} spent, {} contested), {} external inputs",
            summary.num_transactions,
            summary.num_outputs,
            summary.spent_outputs,
            summary.contested_outputs,
            summary.external_inputs
        );
        println!("Unspent value: {}", format_amount(summary.unspent_value));
    }

    if let Some(entity) = cli.select {
        println!();
        match session.transaction_detail(&entity.txid()) {
            Some(detail) => print_detail(&detail),
            None => println!("{} is not part of this contract", entity),
        }
    }

    Ok(())
}
