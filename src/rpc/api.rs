use alloy_eips::BlockId;
use alloy_primitives::{Address, U256, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// The subset of the `eth_*` namespace needed to read contract storage.
///
/// The client half talks to a node. The server half is only generated for
/// tests, where it stands up a local node that serves canned storage.
#[cfg_attr(not(test), rpc(client, namespace = "eth"))]
#[cfg_attr(test, rpc(server, client, namespace = "eth"))]
pub trait EthStorageApi {
    /// Returns the raw value at `slot` of `address` at `block`.
    #[method(name = "getStorageAt")]
    async fn get_storage_at(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> RpcResult<Option<String>>;

    /// Returns the number of the most recent block.
    #[method(name = "blockNumber")]
    async fn block_number(&self) -> RpcResult<U64>;

    /// Returns the chain ID used for signing replay-protected transactions.
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;
}
