/// esRNT lock contract storage layout.
///
/// ```solidity
/// contract esRNT {
///     struct LockInfo {
///         address user;
///         uint64 startTime;
///         uint256 amount;
///     }
///     LockInfo[] private _locks;
/// }
/// ```
pub mod lock_slots {
    use alloy_primitives::U256;

    /// slot 0: _locks.length (dynamic array length)
    pub const LOCKS_LENGTH: U256 = U256::from_limbs([0, 0, 0, 0]);
    /// words per LockInfo element: (user, startTime) packed, then amount
    pub const LOCK_STRIDE: u64 = 2;
}
