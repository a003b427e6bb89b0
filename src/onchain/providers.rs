use super::errors::ReadError;
use super::helpers::parse_storage_word;
use super::StorageReader;
use crate::rpc::{EthStorageApiClient, RpcConfig};
use alloy_eips::BlockId;
use alloy_primitives::{Address, B256, U256};
use jsonrpsee::http_client::HttpClient;
use std::collections::BTreeMap;
use std::path::Path;

/// Reads storage from a node over `eth_getStorageAt`.
///
/// This is the production adapter. Every request carries the timeout from
/// [`RpcConfig`]; an expired request surfaces as [`ReadError::Rpc`].
///
/// # Usage
/// ```ignore
/// let reader = RpcStorageReader::connect(&RpcConfig::new("http://localhost:8545"))?;
/// let locks = LockReader::new(&reader, contract).list_records(U256::ZERO).await?;
/// ```
#[derive(Debug)]
pub struct RpcStorageReader {
    client: HttpClient,
    url: String,
}

impl RpcStorageReader {
    /// Build a reader for the endpoint in `config`.
    pub fn connect(config: &RpcConfig) -> Result<Self, ReadError> {
        Ok(Self { client: config.http_client()?, url: config.http_url() })
    }

    /// Endpoint this reader talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current head block number (`eth_blockNumber`).
    pub async fn block_number(&self) -> Result<u64, ReadError> {
        Ok(self.client.block_number().await?.to::<u64>())
    }

    /// Chain id reported by the node (`eth_chainId`).
    pub async fn chain_id(&self) -> Result<u64, ReadError> {
        Ok(self.client.chain_id().await?.to::<u64>())
    }
}

#[async_trait::async_trait]
impl StorageReader for RpcStorageReader {
    async fn read_storage(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> Result<Option<B256>, ReadError> {
        match self.client.get_storage_at(address, slot, block).await? {
            Some(raw) => parse_storage_word(&raw),
            None => Ok(None),
        }
    }
}

/// A StorageReader that reads from a genesis configuration's alloc.
///
/// Lets the decoder run against pre-populated state (a devnet genesis or a
/// hand-built fixture) without a running node. Genesis state has no history,
/// so every block reference resolves to it.
#[derive(Debug, Clone)]
pub struct GenesisStorageReader {
    /// The genesis alloc to read from
    alloc: BTreeMap<Address, alloy_genesis::GenesisAccount>,
}

impl GenesisStorageReader {
    /// Create a reader from a genesis configuration.
    pub fn from_genesis(genesis: &alloy_genesis::Genesis) -> Self {
        Self { alloc: genesis.alloc.clone() }
    }

    /// Load a genesis JSON file and read from its alloc.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ReadError::Genesis(format!("{}: {e}", path.display())))?;
        let genesis: alloy_genesis::Genesis = serde_json::from_str(&raw)
            .map_err(|e| ReadError::Genesis(format!("{}: {e}", path.display())))?;
        Ok(Self::from_genesis(&genesis))
    }
}

#[async_trait::async_trait]
impl StorageReader for GenesisStorageReader {
    async fn read_storage(
        &self,
        address: Address,
        slot: U256,
        _block: BlockId,
    ) -> Result<Option<B256>, ReadError> {
        let Some(account) = self.alloc.get(&address) else {
            return Ok(None);
        };
        let Some(storage) = account.storage.as_ref() else {
            return Ok(None);
        };
        let slot_key = B256::from(slot.to_be_bytes());
        Ok(storage.get(&slot_key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::{dynamic_array_base_slot, LockLayout, LockReader, LockRecord};
    use crate::rpc::EthStorageApiServer;
    use alloy_genesis::{Genesis, GenesisAccount};
    use alloy_primitives::{address, U64};
    use jsonrpsee::core::RpcResult;
    use jsonrpsee::server::{Server, ServerHandle};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const LOCK_CONTRACT: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");
    const SLOW_SLOT: U256 = U256::from_limbs([0xdead, 0, 0, 0]);

    fn locks() -> Vec<LockRecord> {
        vec![
            LockRecord {
                owner: address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
                start_time: 1_718_000_000,
                amount: U256::from(5_000u64),
            },
            LockRecord {
                owner: address!("70997970c51812dc3a010c7d01b50e0d17dc79c8"),
                start_time: 1_718_000_600,
                amount: U256::from(7_500u64),
            },
        ]
    }

    /// Storage words for `records` laid out as the lock array at slot 0.
    fn lock_storage(records: &[LockRecord]) -> BTreeMap<U256, B256> {
        let mut storage = BTreeMap::new();
        storage.insert(U256::ZERO, B256::from(U256::from(records.len()).to_be_bytes()));
        let base = dynamic_array_base_slot(U256::ZERO);
        for (i, record) in records.iter().enumerate() {
            for (word, value) in LockLayout::SOLIDITY.encode(record).into_iter().enumerate() {
                storage.insert(base + U256::from(2 * i + word), value);
            }
        }
        storage
    }

    // =========================================================================
    // Helper: local node serving canned storage
    // =========================================================================

    #[derive(Clone)]
    struct MockNode {
        storage: Arc<BTreeMap<U256, B256>>,
        blocks: Arc<Mutex<Vec<BlockId>>>,
        head: u64,
        chain_id: u64,
    }

    impl MockNode {
        fn new(storage: BTreeMap<U256, B256>) -> Self {
            Self {
                storage: Arc::new(storage),
                blocks: Arc::new(Mutex::new(Vec::new())),
                head: 42,
                chain_id: 31337,
            }
        }
    }

    #[async_trait::async_trait]
    impl EthStorageApiServer for MockNode {
        async fn get_storage_at(
            &self,
            address: Address,
            slot: U256,
            block: BlockId,
        ) -> RpcResult<Option<String>> {
            self.blocks.lock().unwrap().push(block);
            if slot == SLOW_SLOT {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            if address != LOCK_CONTRACT {
                return Ok(Some("0x0".to_string()));
            }
            // short rendering for the length word, full width otherwise
            Ok(Some(match self.storage.get(&slot) {
                Some(word) if slot == U256::ZERO => format!("{:#x}", U256::from_be_bytes(word.0)),
                Some(word) => format!("{word}"),
                None => format!("{}", B256::ZERO),
            }))
        }

        async fn block_number(&self) -> RpcResult<U64> {
            Ok(U64::from(self.head))
        }

        async fn chain_id(&self) -> RpcResult<U64> {
            Ok(U64::from(self.chain_id))
        }
    }

    async fn spawn_node(node: MockNode) -> (RpcConfig, ServerHandle) {
        let server = Server::builder().build("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.start(node.into_rpc());
        (RpcConfig::new(format!("http://{addr}")), handle)
    }

    // =========================================================================
    // RpcStorageReader
    // =========================================================================

    #[tokio::test]
    async fn test_rpc_reader_lists_locks() {
        let node = MockNode::new(lock_storage(&locks()));
        let (config, _handle) = spawn_node(node.clone()).await;
        let reader = RpcStorageReader::connect(&config).unwrap();

        let listed = LockReader::new(&reader, LOCK_CONTRACT).list_records(U256::ZERO).await.unwrap();

        assert_eq!(listed, locks());
        assert_eq!(node.blocks.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_rpc_reader_head_and_chain_id() {
        let (config, _handle) = spawn_node(MockNode::new(BTreeMap::new())).await;
        let reader = RpcStorageReader::connect(&config).unwrap();

        assert_eq!(reader.block_number().await.unwrap(), 42);
        assert_eq!(reader.chain_id().await.unwrap(), 31337);
    }

    #[tokio::test]
    async fn test_rpc_reader_forwards_block() {
        let node = MockNode::new(lock_storage(&locks()));
        let (config, _handle) = spawn_node(node.clone()).await;
        let reader = RpcStorageReader::connect(&config).unwrap();

        LockReader::new(&reader, LOCK_CONTRACT)
            .at_block(BlockId::number(17))
            .array_length(U256::ZERO)
            .await
            .unwrap();

        assert_eq!(node.blocks.lock().unwrap().as_slice(), &[BlockId::number(17)]);
    }

    #[tokio::test]
    async fn test_rpc_reader_unknown_contract_reads_zero() {
        let (config, _handle) = spawn_node(MockNode::new(lock_storage(&locks()))).await;
        let reader = RpcStorageReader::connect(&config).unwrap();

        let other = address!("0000000000000000000000000000000000000001");
        let records = LockReader::new(&reader, other).list_records(U256::ZERO).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_rpc_reader_timeout_is_read_failure() {
        let (config, _handle) = spawn_node(MockNode::new(BTreeMap::new())).await;
        let config = config.with_timeout(Duration::from_millis(50));
        let reader = RpcStorageReader::connect(&config).unwrap();

        let err = reader
            .read_storage(LOCK_CONTRACT, SLOW_SLOT, BlockId::latest())
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Rpc(_)));
    }

    #[tokio::test]
    async fn test_rpc_reader_unreachable_node() {
        let config = RpcConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let reader = RpcStorageReader::connect(&config).unwrap();

        let err = LockReader::new(&reader, LOCK_CONTRACT).list_records(U256::ZERO).await.unwrap_err();
        assert!(matches!(err, crate::onchain::LockError::Read { slot, .. } if slot == U256::ZERO));
    }

    // =========================================================================
    // GenesisStorageReader
    // =========================================================================

    fn lock_genesis() -> Genesis {
        let storage = lock_storage(&locks())
            .into_iter()
            .map(|(slot, value)| (B256::from(slot.to_be_bytes()), value))
            .collect();
        let mut genesis = Genesis::default();
        genesis.alloc.insert(
            LOCK_CONTRACT,
            GenesisAccount { storage: Some(storage), ..Default::default() },
        );
        genesis
    }

    #[tokio::test]
    async fn test_genesis_reader_lists_locks() {
        let reader = GenesisStorageReader::from_genesis(&lock_genesis());
        let listed = LockReader::new(&reader, LOCK_CONTRACT).list_records(U256::ZERO).await.unwrap();
        assert_eq!(listed, locks());
    }

    #[tokio::test]
    async fn test_genesis_reader_missing_account_or_slot() {
        let reader = GenesisStorageReader::from_genesis(&lock_genesis());
        let missing = address!("00000000000000000000000000000000000000ff");

        assert_eq!(reader.read_storage(missing, U256::ZERO, BlockId::latest()).await.unwrap(), None);
        assert_eq!(
            reader.read_storage(LOCK_CONTRACT, U256::from(99), BlockId::latest()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_genesis_reader_from_file() {
        let path = std::env::temp_dir().join(format!("lockscan-genesis-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&lock_genesis()).unwrap()).unwrap();

        let reader = GenesisStorageReader::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let listed = LockReader::new(&reader, LOCK_CONTRACT).list_records(U256::ZERO).await.unwrap();
        assert_eq!(listed, locks());
    }

    #[test]
    fn test_genesis_reader_bad_file() {
        let err = GenesisStorageReader::from_file("/nonexistent/genesis.json").unwrap_err();
        assert!(matches!(err, ReadError::Genesis(_)));
    }
}
