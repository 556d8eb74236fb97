// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! EIP-712 authorization for user decryption.
//!
//! WARNING: the struct below must match the gateway's decryption verifier exactly, any change
//! to names, field order or types breaks signature verification.

use alloy::dyn_abi::{Eip712Domain, TypedData};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use anyhow::{Context, Result};
use std::str::FromStr;
use veil_config::NetworkConfig;

pub const DECRYPTION_DOMAIN_NAME: &str = "Decryption";
pub const DECRYPTION_DOMAIN_VERSION: &str = "1";

sol! {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct UserDecryptRequestVerification {
        bytes publicKey;
        address[] contractAddresses;
        uint256 startTimestamp;
        uint256 durationDays;
        bytes extraData;
    }
}

pub fn decryption_domain(network: &NetworkConfig) -> Eip712Domain {
    Eip712Domain::new(
        Some(DECRYPTION_DOMAIN_NAME.into()),
        Some(DECRYPTION_DOMAIN_VERSION.into()),
        Some(U256::from(network.gateway_chain_id)),
        Some(network.verifying_contract_address_decryption),
        None,
    )
}

/// Build the typed-data message binding an ephemeral public key to a set of contracts for a
/// validity window.
pub fn user_decrypt_authorization(
    network: &NetworkConfig,
    public_key: &str,
    contract_addresses: &[String],
    start_timestamp: &str,
    duration_days: u64,
) -> Result<TypedData> {
    let message = UserDecryptRequestVerification {
        publicKey: decode_hex(public_key).context("Public key is not valid hex")?,
        contractAddresses: contract_addresses
            .iter()
            .map(|address| {
                Address::from_str(address)
                    .with_context(|| format!("Invalid contract address '{}'", address))
            })
            .collect::<Result<Vec<_>>>()?,
        startTimestamp: U256::from_str(start_timestamp)
            .with_context(|| format!("Invalid start timestamp '{}'", start_timestamp))?,
        durationDays: U256::from(duration_days),
        extraData: Bytes::new(),
    };

    Ok(TypedData::from_struct(
        &message,
        Some(decryption_domain(network)),
    ))
}

pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub(crate) fn decode_hex(value: &str) -> Result<Bytes> {
    Ok(hex::decode(strip_hex_prefix(value.trim()))?.into())
}
