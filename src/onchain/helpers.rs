use super::errors::ReadError;
use alloy_primitives::{Address, Keccak256, B256, U256};

/// Compute the base slot for a Solidity dynamic array's data.
///
/// For `LockInfo[] private _locks` at slot 0:
///   base = keccak256(abi.encode(0))
///   _locks[0] lives at base + 0 .. base + stride
///   _locks[1] lives at base + stride .. base + 2 * stride
///   etc.
///
/// The preimage is always the full 32-byte big-endian slot; hashing a
/// shorter encoding lands on an unrelated region of storage.
pub fn dynamic_array_base_slot(array_slot: U256) -> U256 {
    let mut hasher = Keccak256::new();
    hasher.update(B256::from(array_slot.to_be_bytes()).as_slice());
    U256::from_be_bytes(hasher.finalize().0)
}

/// Slot of word `word` of element `index` in an array whose elements are
/// `stride` words long.
///
/// Wraps modulo 2^256 like the EVM's own slot arithmetic.
pub fn element_slot(base: U256, stride: u64, index: u64, word: u64) -> U256 {
    base.wrapping_add(U256::from(stride).wrapping_mul(U256::from(index)))
        .wrapping_add(U256::from(word))
}

/// Decode an address from a byte range of a storage word.
pub fn decode_address(bytes: &[u8]) -> Address {
    Address::from_slice(bytes)
}

/// Decode a big-endian unsigned integer of at most 8 bytes.
pub fn decode_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Decode a big-endian unsigned integer of at most 32 bytes.
pub fn decode_u256(bytes: &[u8]) -> U256 {
    U256::from_be_slice(bytes)
}

/// Parse an `eth_getStorageAt` response into a storage word.
///
/// Nodes differ on how they render untouched slots, so the parse is lenient:
/// `"0x"` or an empty string means absent, and short values are left-padded
/// to 32 bytes.
pub fn parse_storage_word(raw: &str) -> Result<Option<B256>, ReadError> {
    let digits = raw.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);

    if digits.is_empty() {
        return Ok(None);
    }
    if digits.len() > 64 {
        return Err(ReadError::InvalidWord(raw.to_string()));
    }

    let padded = format!("{digits:0>64}");
    let bytes = hex::decode(&padded).map_err(|_| ReadError::InvalidWord(raw.to_string()))?;
    Ok(Some(B256::from_slice(&bytes)))
}

/// Write `value` big-endian into `bytes`, keeping the low-order bytes.
pub(crate) fn encode_be(bytes: &mut [u8], value: &[u8]) {
    let take = bytes.len().min(value.len());
    let dst = bytes.len() - take;
    bytes[dst..].copy_from_slice(&value[value.len() - take..]);
}
