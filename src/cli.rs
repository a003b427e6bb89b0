use crate::chains::Chain;
use crate::constants::{DEFAULT_LOCK_CONTRACT, DEFAULT_TIMEOUT_MS, MAX_CONCURRENCY};
use crate::onchain::{LayoutError, LockLayout};
use crate::rpc::RpcConfig;
use alloy_eips::BlockId;
use alloy_primitives::{Address, U256};
use clap::Parser;
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// CLI arguments for the lock scanner
#[derive(Parser, Debug)]
#[command(name = "lockscan", about = "Read esRNT lock records straight from contract storage")]
pub struct Cli {
    /// Chain preset (chain id, default RPC endpoint, explorer)
    #[arg(long, value_enum, default_value = "foundry")]
    pub chain: Chain,

    /// RPC endpoint; overrides the preset's endpoint.
    /// Can also be set via RPC_URL environment variable.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Read from a genesis JSON file instead of a node (takes precedence over RPC)
    #[arg(long, conflicts_with = "pin")]
    pub genesis: Option<PathBuf>,

    /// Lock contract address.
    /// Can also be set via LOCK_CONTRACT environment variable.
    #[arg(long, env = "LOCK_CONTRACT", default_value = DEFAULT_LOCK_CONTRACT)]
    pub contract: Address,

    /// Storage slot holding the array length (decimal or 0x-hex)
    #[arg(long, default_value = "0")]
    pub array_slot: U256,

    /// JSON file describing where each record field is packed
    #[arg(long, conflicts_with = "leading_start_time")]
    pub layout: Option<PathBuf>,

    /// Read the start time from the 8 high-order bytes of the first word
    /// instead of the bytes right before the address. Matches the
    /// esRNT frontend script (`slice(2, 18)`); use it to compare against that output
    #[arg(long)]
    pub leading_start_time: bool,

    /// Block to read at: a tag (latest, earliest, safe, finalized, pending),
    /// a decimal or 0x-hex number, or a 32-byte block hash
    #[arg(long, default_value = "latest", value_parser = parse_block_id)]
    pub block: BlockId,

    /// Resolve the current head once and read every slot at that block,
    /// so all records come from the same state
    #[arg(long, conflicts_with = "block")]
    pub pin: bool,

    /// Read only the record at this index
    #[arg(long, conflicts_with_all = ["start", "count"])]
    pub index: Option<u64>,

    /// First record to read
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Number of records to read (default: through the end of the array)
    #[arg(long)]
    pub count: Option<u64>,

    /// Records read at once. Output keeps index order regardless.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..=MAX_CONCURRENCY))]
    pub concurrency: u64,

    /// Per-request RPC timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Print the result as JSON instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Emit log lines as newline-delimited JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Endpoint settings: `--rpc-url` if given, else the chain preset.
    pub fn rpc_config(&self) -> RpcConfig {
        let url = self.rpc_url.clone().unwrap_or_else(|| self.chain.preset().rpc_url.to_string());
        RpcConfig::new(url).with_timeout(Duration::from_millis(self.timeout_ms))
    }

    /// Record layout selected by `--layout` / `--leading-start-time`.
    pub fn record_layout(&self) -> Result<LockLayout, LayoutError> {
        match &self.layout {
            Some(path) => LockLayout::from_json_file(path),
            None if self.leading_start_time => Ok(LockLayout::LEADING_START_TIME),
            None => Ok(LockLayout::SOLIDITY),
        }
    }

    /// Requested index range, before clamping to the array length.
    pub fn index_range(&self) -> Range<u64> {
        if let Some(index) = self.index {
            return index..index.saturating_add(1);
        }
        match self.count {
            Some(count) => self.start..self.start.saturating_add(count),
            None => self.start..u64::MAX,
        }
    }
}

/// Parse `--block`. Plain decimal numbers are accepted on top of what
/// `BlockId` itself parses.
pub fn parse_block_id(raw: &str) -> Result<BlockId, String> {
    if let Ok(number) = raw.parse::<u64>() {
        return Ok(BlockId::number(number));
    }
    BlockId::from_str(raw).map_err(|e| format!("invalid block {raw:?}: {e}"))
}
