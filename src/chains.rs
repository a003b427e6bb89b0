//! Known chains and their default RPC endpoints.

use alloy_primitives::Address;
use clap::ValueEnum;
use std::fmt;

/// Static description of a chain preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainPreset {
    /// EIP-155 chain id
    pub id: u64,
    /// Human-readable name
    pub name: &'static str,
    /// Public RPC endpoint used when `--rpc-url` is not given
    pub rpc_url: &'static str,
    /// Block explorer base URL, if any
    pub explorer: Option<&'static str>,
}

impl ChainPreset {
    /// Explorer link for `address`, if the chain has an explorer.
    pub fn address_url(&self, address: &Address) -> Option<String> {
        self.explorer.map(|base| format!("{base}/address/{address}"))
    }
}

/// Chains selectable with `--chain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Chain {
    /// Local anvil / foundry node
    #[default]
    Foundry,
    /// Ethereum Sepolia testnet
    Sepolia,
    /// Polygon PoS mainnet
    Polygon,
    /// Arbitrum One
    Arbitrum,
}

impl Chain {
    /// Preset for this chain.
    pub const fn preset(self) -> ChainPreset {
        match self {
            Self::Foundry => ChainPreset {
                id: 31337,
                name: "Foundry",
                rpc_url: "http://localhost:8545",
                explorer: None,
            },
            Self::Sepolia => ChainPreset {
                id: 11155111,
                name: "Sepolia",
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
                explorer: Some("https://sepolia.etherscan.io"),
            },
            Self::Polygon => ChainPreset {
                id: 137,
                name: "Polygon",
                rpc_url: "https://polygon-rpc.com",
                explorer: Some("https://polygonscan.com"),
            },
            Self::Arbitrum => ChainPreset {
                id: 42161,
                name: "Arbitrum",
                rpc_url: "https://arb1.arbitrum.io/rpc",
                explorer: Some("https://arbiscan.io"),
            },
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.preset().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_is_local_foundry() {
        let preset = Chain::default().preset();
        assert_eq!(preset.id, 31337);
        assert_eq!(preset.rpc_url, "http://localhost:8545");
        assert_eq!(preset.explorer, None);
    }

    #[test]
    fn test_chain_ids_are_unique() {
        let ids: Vec<u64> = Chain::value_variants().iter().map(|c| c.preset().id).collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                assert_ne!(ids[i], ids[j]);
            }
        }
    }

    #[test]
    fn test_address_url() {
        let addr = Address::with_last_byte(1);
        assert_eq!(Chain::Foundry.preset().address_url(&addr), None);
        assert_eq!(
            Chain::Arbitrum.preset().address_url(&addr),
            Some(format!("https://arbiscan.io/address/{addr}"))
        );
    }

    #[test]
    fn test_chain_parses_from_cli_name() {
        assert_eq!(Chain::from_str("polygon", true).unwrap(), Chain::Polygon);
        assert_eq!(Chain::Sepolia.to_string(), "Sepolia");
    }
}
