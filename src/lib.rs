//! # lock-slot-reader - packed struct arrays straight from EVM storage
//!
//! Reconstructs a contract's dynamic array of packed structs by reading raw
//! storage words (`eth_getStorageAt`) and decoding them with a known layout,
//! without calling any view function.

pub mod chains;
pub mod cli;
pub mod constants;
pub mod onchain;
pub mod output;
pub mod rpc;
