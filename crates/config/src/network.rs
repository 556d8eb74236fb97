// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{address, Address};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named network presets that a configuration can start from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPreset {
    /// Public Sepolia testnet deployment
    #[default]
    Sepolia,
    /// Local hardhat/anvil deployment
    Local,
}

impl NetworkPreset {
    pub fn network(&self) -> NetworkConfig {
        match self {
            NetworkPreset::Sepolia => NetworkConfig::sepolia(),
            NetworkPreset::Local => NetworkConfig::local(),
        }
    }
}

impl FromStr for NetworkPreset {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sepolia" => Ok(NetworkPreset::Sepolia),
            "local" | "localhost" | "hardhat" => Ok(NetworkPreset::Local),
            other => bail!("Unknown network preset '{}'. Expected one of: sepolia, local", other),
        }
    }
}

impl fmt::Display for NetworkPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkPreset::Sepolia => write!(f, "sepolia"),
            NetworkPreset::Local => write!(f, "local"),
        }
    }
}

/// Fixed network record injected into every session. Loaded once and never re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Chain hosting the application contracts
    pub chain_id: u64,
    /// Chain hosting the gateway (decryption and input verification contracts)
    pub gateway_chain_id: u64,
    /// Relayer endpoint used by the encryption backend
    pub relayer_url: String,
    /// Optional JSON-RPC endpoint of the host chain
    #[serde(default)]
    pub network_url: Option<String>,
    /// Access control list contract
    pub acl_contract_address: Address,
    /// Key management contract
    pub kms_contract_address: Address,
    pub input_verifier_contract_address: Address,
    /// EIP-712 verifying contract for user decryption authorizations
    pub verifying_contract_address_decryption: Address,
    pub verifying_contract_address_input_verification: Address,
}

impl NetworkConfig {
    pub fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            gateway_chain_id: 55815,
            relayer_url: "https://relayer.testnet.zama.cloud".to_string(),
            network_url: None,
            acl_contract_address: address!("687820221192c5b662b25367f70076a37bc79b6c"),
            kms_contract_address: address!("1364cbbf2cdf5032c47d8226a6f6fbd2afcdacac"),
            input_verifier_contract_address: address!("bc91f3dad1a5f19f8390c400196e58073b6a0bc4"),
            verifying_contract_address_decryption: address!(
                "b6e160b1ff80d67bfe90a85ee06ce0a2613607d1"
            ),
            verifying_contract_address_input_verification: address!(
                "7048c39f048125eda9d678aebadfb22f7900a29f"
            ),
        }
    }

    pub fn local() -> Self {
        Self {
            chain_id: 31337,
            gateway_chain_id: 31337,
            relayer_url: "http://localhost:3000".to_string(),
            network_url: Some("http://localhost:8545".to_string()),
            acl_contract_address: address!("5fbdb2315678afecb367f032d93f642f64180aa3"),
            kms_contract_address: address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512"),
            input_verifier_contract_address: address!("9fe46736679d2d9a65f0992f2272de9f3c7fa6e0"),
            verifying_contract_address_decryption: address!(
                "cf7ed3acca5a467e9e704c703e8d87f634fb0fc9"
            ),
            verifying_contract_address_input_verification: address!(
                "dc64a140aa3e981100a9beca4e685f962f0cf6c9"
            ),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkPreset::default().network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() -> Result<()> {
        assert_eq!("Sepolia".parse::<NetworkPreset>()?, NetworkPreset::Sepolia);
        assert_eq!(" hardhat ".parse::<NetworkPreset>()?, NetworkPreset::Local);
        assert!("mainnet".parse::<NetworkPreset>().is_err());
        Ok(())
    }

    #[test]
    fn test_presets_are_distinct() {
        let sepolia = NetworkPreset::Sepolia.network();
        let local = NetworkPreset::Local.network();
        assert_eq!(sepolia.chain_id, 11155111);
        assert_eq!(local.chain_id, 31337);
        assert_ne!(sepolia.acl_contract_address, local.acl_contract_address);
        assert_eq!(NetworkConfig::default(), sepolia);
    }

    #[test]
    fn test_yaml_roundtrip_keeps_addresses() -> Result<()> {
        let local = NetworkConfig::local();
        let yaml = serde_yaml::to_string(&local)?;
        let parsed: NetworkConfig = serde_yaml::from_str(&yaml)?;
        assert_eq!(parsed, local);
        Ok(())
    }
}
