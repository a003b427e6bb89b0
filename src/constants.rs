/// esRNT contract as deployed by the second transaction on a fresh anvil node
pub const DEFAULT_LOCK_CONTRACT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
/// Upper bound for concurrent record reads
pub const MAX_CONCURRENCY: u64 = 256;
/// Default per-request RPC timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Upper bound for words per record in a layout file
pub const MAX_STRIDE: u64 = 64;
