use super::errors::{LayoutError, LockError};
use super::helpers::{dynamic_array_base_slot, element_slot};
use super::layout::LockLayout;
use super::StorageReader;
use alloy_eips::BlockId;
use alloy_primitives::{Address, B256, U256};
use futures_util::{future::try_join_all, stream, StreamExt, TryStreamExt};
use serde::Serialize;
use std::ops::Range;
use tracing::{debug, trace};

/// One `LockInfo` element reconstructed from contract storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Address that owns the lock (`LockInfo.user`)
    pub owner: Address,
    /// Lock start timestamp in seconds
    pub start_time: u64,
    /// Locked token amount
    pub amount: U256,
}

/// A clamped run of records together with the array it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Array length word
    pub length: U256,
    /// First slot of the element data
    pub base_slot: U256,
    /// Array index of `records[0]`
    pub start: u64,
    /// Records in index order
    pub records: Vec<LockRecord>,
}

/// Session context for reading one contract's lock array.
///
/// Everything a read depends on (backend, contract, layout, block) travels
/// with the reader instead of living in globals, so the same code runs
/// against a live node, a genesis file, or an in-memory mock.
#[derive(Debug, Clone)]
pub struct LockReader<R> {
    reader: R,
    contract: Address,
    layout: LockLayout,
    block: BlockId,
    concurrency: usize,
}

impl<R: StorageReader> LockReader<R> {
    /// Reader for `contract` with the solc layout, at the latest block,
    /// reading one record at a time.
    pub fn new(reader: R, contract: Address) -> Self {
        Self {
            reader,
            contract,
            layout: LockLayout::SOLIDITY,
            block: BlockId::latest(),
            concurrency: 1,
        }
    }

    /// Use a different record layout.
    pub fn with_layout(mut self, layout: LockLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    /// Pin every read to `block`.
    pub fn at_block(mut self, block: BlockId) -> Self {
        self.block = block;
        self
    }

    /// Read up to `concurrency` records at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Contract being read.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Active record layout.
    pub fn layout(&self) -> &LockLayout {
        &self.layout
    }

    /// Block every read is pinned to.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Base slot of the array whose length word lives at `array_slot`.
    pub fn array_base_slot(&self, array_slot: U256) -> U256 {
        dynamic_array_base_slot(array_slot)
    }

    /// Read one word; slots that were never written read as zero.
    async fn read_word(&self, slot: U256) -> Result<B256, LockError> {
        let value = self
            .reader
            .read_storage(self.contract, slot, self.block)
            .await
            .map_err(|source| LockError::Read { address: self.contract, slot, source })?;
        trace!(target: "lockscan::storage", %slot, present = value.is_some(), "read slot");
        Ok(value.unwrap_or(B256::ZERO))
    }

    /// Number of elements in the array whose length word lives at `array_slot`.
    pub async fn array_length(&self, array_slot: U256) -> Result<U256, LockError> {
        let word = self.read_word(array_slot).await?;
        Ok(U256::from_be_bytes(word.0))
    }

    /// Decode element `index` of the array starting at `base`.
    ///
    /// All words of the element are requested concurrently.
    pub async fn read_record(&self, base: U256, index: u64) -> Result<LockRecord, LockError> {
        let stride = self.layout.stride;
        let words = try_join_all(
            (0..stride).map(|word| self.read_word(element_slot(base, stride, index, word))),
        )
        .await?;
        Ok(self.layout.decode(&words))
    }

    /// Every element of the array at `array_slot`, in index order.
    pub async fn list_records(&self, array_slot: U256) -> Result<Vec<LockRecord>, LockError> {
        let length = self.array_length(array_slot).await?;
        let length = u64::try_from(length).map_err(|_| LockError::LengthOverflow(length))?;
        let base = self.array_base_slot(array_slot);

        debug!(
            target: "lockscan::storage",
            contract = %self.contract,
            %array_slot,
            length,
            %base,
            "listing records"
        );

        self.read_records(base, 0..length).await
    }

    /// Elements `range` of the array at `array_slot`, clamped to its length.
    ///
    /// The length and base slot come back with the records, so callers can
    /// tell an empty array from a range past its end.
    pub async fn records_in(
        &self,
        array_slot: U256,
        range: Range<u64>,
    ) -> Result<RecordPage, LockError> {
        let length = self.array_length(array_slot).await?;
        let length_u64 = u64::try_from(length).map_err(|_| LockError::LengthOverflow(length))?;
        let end = range.end.min(length_u64);
        let start = range.start.min(end);
        let base_slot = self.array_base_slot(array_slot);

        let records = self.read_records(base_slot, start..end).await?;
        Ok(RecordPage { length, base_slot, start, records })
    }

    /// Elements `range` of the array starting at `base`, in index order.
    ///
    /// Does not read the length word; callers that already know it use this
    /// to avoid a second round trip.
    pub async fn read_records(
        &self,
        base: U256,
        range: Range<u64>,
    ) -> Result<Vec<LockRecord>, LockError> {
        stream::iter(range)
            .map(|index| self.read_record(base, index))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
