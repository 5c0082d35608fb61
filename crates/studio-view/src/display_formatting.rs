//! Display formatting utilities for contract graph entities
//!
//! Provides functions for formatting ids, amounts, raw data and relative
//! lock times for human-readable display.

use bitcoin::{Amount, OutPoint, Txid};

/// Shorten a txid to its first and last 8 hex characters
pub fn format_txid_short(txid: &Txid) -> String {
    let hex = txid.to_string();
    format!("{}...{}", &hex[..8], &hex[hex.len() - 8..])
}

/// Outpoint as `short-txid:vout`
pub fn format_outpoint(outpoint: &OutPoint) -> String {
    format!("{}:{}", format_txid_short(&outpoint.txid), outpoint.vout)
}

pub fn format_amount(amount: Amount) -> String {
    format!("{:.8} BTC", amount.to_btc())
}

/// Format raw data for preview display
///
/// For data longer than 80 hex characters, elides from the center showing
/// first and last 38 characters (19 bytes each) with "..." in between.
pub fn format_value_preview(data: &[u8]) -> String {
    if data.is_empty() {
        return "(empty)".to_string();
    }

    let hex = hex::encode(data);

    // Keep total length under 80 characters by eliding from the center
    if hex.len() > 80 {
        let start_len = 38;
        let end_len = 38;
        format!(
            "{}...{} ({} bytes)",
            &hex[..start_len],
            &hex[hex.len() - end_len..],
            data.len()
        )
    } else {
        format!("{} ({} bytes)", hex, data.len())
    }
}

/// Human-readable duration, largest unit first ("1 day 2 hours 5 seconds")
pub fn format_duration(seconds: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "day"), (3_600, "hour"), (60, "minute"), (1, "second")];

    if seconds == 0 {
        return "0 seconds".to_string();
    }

    let mut remaining = seconds;
    let mut parts = Vec::new();
    for (size, name) in UNITS {
        let count = remaining / size;
        remaining %= size;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", count, name, plural));
        }
    }
    parts.join(" ")
}
