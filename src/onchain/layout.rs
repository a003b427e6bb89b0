//! Byte-level placement of `LockInfo` fields inside storage words.
//!
//! Packing depends on the contract's declared field order and the compiler's
//! packing rules, so the offsets are data. The default matches solc for
//! `struct { address user; uint64 startTime; uint256 amount; }`: later fields
//! of a packed word sit at higher-order bytes, so `startTime` occupies the
//! 8 bytes right before the address.

use super::errors::LayoutError;
use super::helpers::{decode_address, decode_u256, decode_u64, encode_be};
use super::readers::LockRecord;
use super::slots::lock_slots::LOCK_STRIDE;
use crate::constants::MAX_STRIDE;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::path::Path;

const WORD_BYTES: usize = 32;
const ADDRESS_BYTES: usize = 20;

/// A field packed into one storage word of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedField {
    /// Word index within the record (0 = first slot of the element)
    pub slot: u64,
    /// Byte offset from the most significant byte of the word
    pub offset: usize,
    /// Width in bytes
    pub len: usize,
}

impl PackedField {
    /// Create a field descriptor.
    pub const fn new(slot: u64, offset: usize, len: usize) -> Self {
        Self { slot, offset, len }
    }

    /// Exclusive end byte within the word.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    fn bytes<'a>(&self, words: &'a [B256]) -> &'a [u8] {
        &words[self.slot as usize][self.offset..self.end()]
    }

    fn bytes_mut<'a>(&self, words: &'a mut [B256]) -> &'a mut [u8] {
        &mut words[self.slot as usize][self.offset..self.end()]
    }

    fn check(&self, field: &'static str, stride: u64) -> Result<(), LayoutError> {
        if self.slot >= stride {
            return Err(LayoutError::SlotBeyondStride { field, slot: self.slot, stride });
        }
        if self.end() > WORD_BYTES {
            return Err(LayoutError::OutOfWord { field, offset: self.offset, end: self.end() });
        }
        Ok(())
    }
}

/// Where each `LockRecord` field lives inside a `stride`-word element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockLayout {
    /// Words per record
    pub stride: u64,
    /// Owner address (must be 20 bytes)
    pub owner: PackedField,
    /// Lock start timestamp (1..=8 bytes)
    pub start_time: PackedField,
    /// Locked amount (1..=32 bytes)
    pub amount: PackedField,
}

impl LockLayout {
    /// solc packing: word 0 = `[pad 4][startTime 8][user 20]`, word 1 = `amount`.
    pub const SOLIDITY: Self = Self {
        stride: LOCK_STRIDE,
        owner: PackedField::new(0, 12, ADDRESS_BYTES),
        start_time: PackedField::new(0, 4, 8),
        amount: PackedField::new(1, 0, WORD_BYTES),
    };

    /// Start time taken from the 8 high-order bytes of word 0.
    pub const LEADING_START_TIME: Self = Self {
        start_time: PackedField::new(0, 0, 8),
        ..Self::SOLIDITY
    };

    /// Check that every field fits its word and its type.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.stride == 0 {
            return Err(LayoutError::ZeroStride);
        }
        if self.stride > MAX_STRIDE {
            return Err(LayoutError::StrideTooLarge { stride: self.stride, max: MAX_STRIDE });
        }

        self.owner.check("owner", self.stride)?;
        self.start_time.check("startTime", self.stride)?;
        self.amount.check("amount", self.stride)?;

        if self.owner.len != ADDRESS_BYTES {
            return Err(LayoutError::BadWidth {
                field: "owner",
                len: self.owner.len,
                expected: "20",
            });
        }
        if !(1..=8).contains(&self.start_time.len) {
            return Err(LayoutError::BadWidth {
                field: "startTime",
                len: self.start_time.len,
                expected: "1..=8",
            });
        }
        if !(1..=WORD_BYTES).contains(&self.amount.len) {
            return Err(LayoutError::BadWidth {
                field: "amount",
                len: self.amount.len,
                expected: "1..=32",
            });
        }
        Ok(())
    }

    /// Load and validate a layout from a JSON file.
    ///
    /// ```json
    /// { "stride": 2,
    ///   "owner":     { "slot": 0, "offset": 12, "len": 20 },
    ///   "startTime": { "slot": 0, "offset": 4,  "len": 8 },
    ///   "amount":    { "slot": 1, "offset": 0,  "len": 32 } }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a layout from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(raw)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Decode one record from its `stride` words.
    ///
    /// `words` must hold exactly `stride` entries and the layout must be valid.
    pub fn decode(&self, words: &[B256]) -> LockRecord {
        LockRecord {
            owner: decode_address(self.owner.bytes(words)),
            start_time: decode_u64(self.start_time.bytes(words)),
            amount: decode_u256(self.amount.bytes(words)),
        }
    }

    /// Pack a record into `stride` words. Values wider than their field are
    /// truncated to the low-order bytes, as a narrowing Solidity cast would.
    pub fn encode(&self, record: &LockRecord) -> Vec<B256> {
        let mut words = vec![B256::ZERO; self.stride as usize];
        self.owner.bytes_mut(&mut words).copy_from_slice(record.owner.as_slice());
        encode_be(self.start_time.bytes_mut(&mut words), &record.start_time.to_be_bytes());
        encode_be(
            self.amount.bytes_mut(&mut words),
            &record.amount.to_be_bytes::<32>(),
        );
        words
    }
}

impl Default for LockLayout {
    fn default() -> Self {
        Self::SOLIDITY
    }
}
