// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, EnvFilter};
use veil_client::{DecryptResponse, EncryptionOutput, Handle};
use veil_config::NetworkConfig;

pub const CONTRACT_CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const CONTRACT_LOWERCASE: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
pub const USER_CHECKSUMMED: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const USER_LOWERCASE: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";

/// anvil's first dev account
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn test_network() -> NetworkConfig {
    NetworkConfig::local()
}

/// Route logs to the test writer for the lifetime of the guard
pub fn init_test_logging() -> DefaultGuard {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

pub fn handles(list: &[&str]) -> Vec<Handle> {
    list.iter().map(|handle| Handle::from(*handle)).collect()
}

pub fn encryption_output(handle: &str, proof: &[u8]) -> EncryptionOutput {
    EncryptionOutput {
        handles: vec![Handle::from(handle)],
        input_proof: Some(Bytes::copy_from_slice(proof)),
        proof: None,
    }
}

pub fn ordered(values: &[u64]) -> DecryptResponse {
    DecryptResponse::Ordered(values.iter().map(|value| Value::from(*value)).collect())
}

pub fn keyed(entries: &[(&str, u64)]) -> DecryptResponse {
    DecryptResponse::Keyed(
        entries
            .iter()
            .map(|(handle, value)| (handle.to_string(), Value::from(*value)))
            .collect::<HashMap<_, _>>(),
    )
}
