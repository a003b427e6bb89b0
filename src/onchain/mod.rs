//! Contract Storage Readers
//!
//! Reconstructs the esRNT `LockInfo[] _locks` array straight from storage
//! words, without calling any view function.
//!
//! Layout:
//!   slot 0                      → _locks.length
//!   keccak256(abi.encode(0))    → base of the element data
//!   base + 2*i                  → (user, startTime) packed
//!   base + 2*i + 1              → amount
//!
//! The packing is contract-specific and described by [`LockLayout`].

pub mod errors;
pub mod helpers;
pub mod layout;
pub mod providers;
pub mod readers;
pub mod slots;

pub use errors::{LayoutError, LockError, ReadError};
pub use helpers::{dynamic_array_base_slot, element_slot, parse_storage_word};
pub use layout::{LockLayout, PackedField};
pub use providers::{GenesisStorageReader, RpcStorageReader};
pub use readers::{LockReader, LockRecord, RecordPage};
pub use slots::lock_slots;

use alloy_eips::BlockId;
use alloy_primitives::{Address, B256, U256};

/// Trait for reading contract storage slots.
///
/// In production: implemented over `eth_getStorageAt` (RpcStorageReader)
/// Offline: implemented by GenesisStorageReader (reads from a genesis alloc)
#[async_trait::async_trait]
pub trait StorageReader: Send + Sync {
    /// Read a storage slot value from a contract address at `block`.
    /// Returns `Ok(None)` if the slot was never written.
    async fn read_storage(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> Result<Option<B256>, ReadError>;
}

#[async_trait::async_trait]
impl<T: StorageReader + ?Sized> StorageReader for &T {
    async fn read_storage(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> Result<Option<B256>, ReadError> {
        (**self).read_storage(address, slot, block).await
    }
}
