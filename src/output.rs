//! Colored console output for the lock scanner.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! yellow warnings, dimmed secondary text. `--json` bypasses all of it
//! and prints a single [`LockListing`] document.

use crate::chains::ChainPreset;
use crate::onchain::LockRecord;
use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::{Address, U256};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

// ── Helpers ────────────────────────────────────────────────────────

/// Format a block reference for display.
///
/// - Numbers → `"#1234"`
/// - Tags → `"latest"`, `"finalized"`, ...
/// - Hashes → the full `0x`-prefixed hash
pub fn format_block(block: &BlockId) -> String {
    match block {
        BlockId::Number(BlockNumberOrTag::Number(number)) => format!("#{number}"),
        BlockId::Number(tag) => tag.to_string(),
        BlockId::Hash(hash) => hash.block_hash.to_string(),
    }
}

// ── Banner & Source ────────────────────────────────────────────────

/// Print the startup banner with chain and contract identity.
pub fn print_banner(preset: &ChainPreset, contract: &Address) {
    println!();
    println!("{}", "=== esRNT Lock Scanner ===".blue().bold());
    println!("  Chain:    {} ({})", preset.name.cyan(), preset.id.to_string().dimmed());
    println!("  Contract: {}", format!("{contract}").cyan());
    if let Some(url) = preset.address_url(contract) {
        println!("  Explorer: {}", url.dimmed());
    }
}

/// Print the RPC endpoint being read.
pub fn print_rpc_source(url: &str, chain_id: u64) {
    println!(
        "  {} Connected to {} (chain {})",
        "OK".green().bold(),
        url.cyan(),
        chain_id.to_string().cyan()
    );
}

/// Print the genesis file being read.
pub fn print_genesis_source(path: &Path) {
    println!(
        "  {} Reading genesis alloc from {}",
        "OK".green().bold(),
        path.display().to_string().cyan()
    );
}

/// Print a warning when the node's chain id differs from the preset.
pub fn print_chain_id_mismatch(expected: u64, got: u64) {
    println!(
        "  {} Node reports chain id {}, preset expects {}",
        "WARNING:".yellow().bold(),
        got.to_string().cyan(),
        expected.to_string().cyan()
    );
    println!("  {}", "Pass --chain or --rpc-url to point at the intended network.".dimmed());
}

/// Print the block the reads are pinned to.
pub fn print_block(block: &BlockId, pinned: bool) {
    let suffix = if pinned { " (pinned head)" } else { "" };
    println!("  Block:    {}{}", format_block(block).cyan(), suffix.dimmed());
}

// ── Locks ──────────────────────────────────────────────────────────

/// Print the array length header.
pub fn print_total(length: U256) {
    println!();
    println!("{} {}", "Total locks:".blue().bold(), length.to_string().cyan());
}

/// Print one lock record.
pub fn print_lock(index: u64, record: &LockRecord) {
    println!(
        "  {}: user: {}, startTime: {}, amount: {}",
        format!("locks[{index}]").dimmed(),
        format!("{}", record.owner).cyan(),
        record.start_time.to_string().cyan(),
        record.amount.to_string().cyan(),
    );
}

/// Print a note when the requested range selects nothing.
pub fn print_no_locks_in_range(start: u64, length: U256) {
    println!(
        "  {}",
        format!("No locks at index {start} or beyond (array holds {length})").dimmed()
    );
}

// ── JSON ───────────────────────────────────────────────────────────

/// A lock record tagged with its array index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedLock {
    /// Position in the on-chain array
    pub index: u64,
    /// Decoded record
    #[serde(flatten)]
    pub record: LockRecord,
}

/// Machine-readable result of one scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockListing {
    /// Contract that was read
    pub contract: Address,
    /// Block the reads were issued at
    pub block: String,
    /// Array length word
    pub length: U256,
    /// First slot of the element data
    pub base_slot: U256,
    /// Records that were read
    pub locks: Vec<IndexedLock>,
}

impl LockListing {
    /// Assemble a listing; `first_index` is the array index of `records[0]`.
    pub fn new(
        contract: Address,
        block: &BlockId,
        length: U256,
        base_slot: U256,
        first_index: u64,
        records: Vec<LockRecord>,
    ) -> Self {
        let locks = (first_index..)
            .zip(records)
            .map(|(index, record)| IndexedLock { index, record })
            .collect();
        Self { contract, block: format_block(block), length, base_slot, locks }
    }
}

/// Print a listing as pretty JSON.
pub fn print_json(listing: &LockListing) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(listing)?);
    Ok(())
}
