use lock_slot_reader::chains::ChainPreset;
use lock_slot_reader::cli::Cli;
use lock_slot_reader::onchain::{
    GenesisStorageReader, LockLayout, LockReader, RpcStorageReader, StorageReader,
};
use lock_slot_reader::output::{self, LockListing};

use alloy_eips::BlockId;
use clap::Parser;
use eyre::WrapErr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Main entry point for the lock scanner
#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (stderr, so stdout stays clean for --json)
    init_tracing(cli.log_json);

    let preset = cli.chain.preset();
    let layout = cli.record_layout().wrap_err("invalid record layout")?;

    if !cli.json {
        output::print_banner(&preset, &cli.contract);
    }

    // Offline: read straight from a genesis alloc
    if let Some(path) = &cli.genesis {
        let reader = GenesisStorageReader::from_file(path)?;
        if !cli.json {
            output::print_genesis_source(path);
            output::print_block(&cli.block, false);
        }
        return scan(&cli, reader, layout, cli.block).await;
    }

    // Online: read over JSON-RPC
    let config = cli.rpc_config();
    let reader = RpcStorageReader::connect(&config)?;
    let chain_id = reader
        .chain_id()
        .await
        .wrap_err_with(|| format!("failed to reach RPC endpoint {}", reader.url()))?;
    check_chain_id(&cli, &preset, chain_id);
    info!(url = reader.url(), chain_id, "connected");

    let block = if cli.pin {
        let head = reader.block_number().await.wrap_err("failed to resolve head block")?;
        info!(head, "pinning reads to head block");
        BlockId::number(head)
    } else {
        cli.block
    };

    if !cli.json {
        output::print_rpc_source(reader.url(), chain_id);
        output::print_block(&block, cli.pin);
    }

    scan(&cli, reader, layout, block).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn check_chain_id(cli: &Cli, preset: &ChainPreset, chain_id: u64) {
    if chain_id == preset.id {
        return;
    }
    warn!(expected = preset.id, got = chain_id, chain = %cli.chain, "chain id mismatch");
    if !cli.json {
        output::print_chain_id_mismatch(preset.id, chain_id);
    }
}

/// Read the length, then the requested records, and print them.
async fn scan<R: StorageReader>(
    cli: &Cli,
    reader: R,
    layout: LockLayout,
    block: BlockId,
) -> eyre::Result<()> {
    let locks = LockReader::new(reader, cli.contract)
        .with_layout(layout)?
        .at_block(block)
        .with_concurrency(cli.concurrency as usize);

    let page = locks.records_in(cli.array_slot, cli.index_range()).await?;
    if let Some(index) = cli.index {
        if page.records.is_empty() {
            eyre::bail!("index {index} out of bounds: the array holds {} locks", page.length);
        }
    }
    info!(length = %page.length, read = page.records.len(), base = %page.base_slot, "scan complete");

    if cli.json {
        let listing =
            LockListing::new(cli.contract, &block, page.length, page.base_slot, page.start, page.records);
        output::print_json(&listing)?;
        return Ok(());
    }

    output::print_total(page.length);
    if page.records.is_empty() && page.start > 0 {
        output::print_no_locks_in_range(page.start, page.length);
    }
    for (index, record) in (page.start..).zip(page.records.iter()) {
        output::print_lock(index, record);
    }

    Ok(())
}
