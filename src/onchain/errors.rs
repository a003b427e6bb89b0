use alloy_primitives::{Address, U256};
use jsonrpsee::core::ClientError;
use thiserror::Error;

/// Errors raised by a [`StorageReader`](super::StorageReader) backend.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The JSON-RPC request failed (transport error, RPC error, timeout)
    #[error("RPC request failed: {0}")]
    Rpc(#[from] ClientError),

    /// The node returned something that is not a 32-byte hex word
    #[error("Invalid storage word: {0:?}")]
    InvalidWord(String),

    /// The RPC client could not be constructed
    #[error("Failed to connect to {url}: {reason}")]
    Connect {
        /// Endpoint URL
        url: String,
        /// Underlying reason
        reason: String,
    },

    /// The genesis file could not be loaded
    #[error("Failed to load genesis: {0}")]
    Genesis(String),
}

/// Errors raised while reconstructing lock records from storage.
#[derive(Debug, Error)]
pub enum LockError {
    /// A single slot read failed; the whole call is aborted
    #[error("Failed to read slot {slot:#x} of {address}: {source}")]
    Read {
        /// Contract address
        address: Address,
        /// Slot that failed
        slot: U256,
        /// Backend error
        #[source]
        source: ReadError,
    },

    /// The length word does not fit in a u64 index
    #[error("Array length {0} is too large to iterate")]
    LengthOverflow(U256),
}

/// Structural problems with a [`LockLayout`](super::LockLayout).
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A record must occupy at least one word
    #[error("Layout stride must be at least 1")]
    ZeroStride,

    /// A record spans more words than any packed struct plausibly would
    #[error("Layout stride {stride} exceeds the maximum of {max} words")]
    StrideTooLarge {
        /// Configured stride
        stride: u64,
        /// Largest accepted stride
        max: u64,
    },

    /// A field points at a word outside the record
    #[error("Field {field} lives in word {slot}, but records are only {stride} words long")]
    SlotBeyondStride {
        /// Field name
        field: &'static str,
        /// Word index of the field
        slot: u64,
        /// Record stride
        stride: u64,
    },

    /// A field runs past the end of its 32-byte word
    #[error("Field {field} spans bytes {offset}..{end}, past the 32-byte word")]
    OutOfWord {
        /// Field name
        field: &'static str,
        /// Start byte
        offset: usize,
        /// End byte (exclusive)
        end: usize,
    },

    /// A field's width cannot hold its type
    #[error("Field {field} is {len} bytes wide, expected {expected}")]
    BadWidth {
        /// Field name
        field: &'static str,
        /// Configured width
        len: usize,
        /// Accepted widths
        expected: &'static str,
    },

    /// The layout file could not be read
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    /// The layout file is not valid JSON for a layout
    #[error("Failed to parse layout file: {0}")]
    Parse(#[from] serde_json::Error),
}
