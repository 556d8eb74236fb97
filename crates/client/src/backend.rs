// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::clear_values::DecryptResponse;
use crate::handle::Handle;
use crate::keypair::KeypairGenerator;
use crate::typed_data::user_decrypt_authorization;
use crate::wallet::Wallet;
use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, Bytes};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use veil_config::NetworkConfig;

/// Calling conventions for building an encrypted input. Backend versions disagree on which
/// one they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    Structured,
    Positional,
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallShape::Structured => write!(f, "structured"),
            CallShape::Positional => write!(f, "positional"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTarget {
    pub contract_address: String,
    pub user_address: String,
}

/// A request to build an encrypted input, in one of the two known call shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRequest {
    Structured(InputTarget),
    Positional(String, String),
}

impl InputRequest {
    pub fn new(shape: CallShape, contract_address: &str, user_address: &str) -> Self {
        match shape {
            CallShape::Structured => InputRequest::Structured(InputTarget {
                contract_address: contract_address.to_string(),
                user_address: user_address.to_string(),
            }),
            CallShape::Positional => {
                InputRequest::Positional(contract_address.to_string(), user_address.to_string())
            }
        }
    }

    pub fn shape(&self) -> CallShape {
        match self {
            InputRequest::Structured(_) => CallShape::Structured,
            InputRequest::Positional(..) => CallShape::Positional,
        }
    }

    pub fn contract_address(&self) -> &str {
        match self {
            InputRequest::Structured(target) => &target.contract_address,
            InputRequest::Positional(contract, _) => contract,
        }
    }

    pub fn user_address(&self) -> &str {
        match self {
            InputRequest::Structured(target) => &target.user_address,
            InputRequest::Positional(_, user) => user,
        }
    }
}

/// Session metadata attached to every encrypted input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMetadata {
    pub chain_id: u64,
    pub user_address: String,
    pub contract_address: String,
    pub acl_contract_address: Address,
    pub kms_contract_address: Address,
}

/// Raw result of an encryption step. `inputProof` is the current field name, `proof` the
/// legacy one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionOutput {
    #[serde(default)]
    pub handles: Vec<Handle>,
    #[serde(default)]
    pub input_proof: Option<Bytes>,
    #[serde(default)]
    pub proof: Option<Bytes>,
}

/// Builder for a single encrypted input, produced by [`Backend::create_encrypted_input`]
#[async_trait]
pub trait EncryptedInput: Send {
    /// Field holding the attached session metadata
    fn metadata_slot(&mut self) -> &mut Option<InputMetadata>;

    /// Attach session metadata. Writes [`Self::metadata_slot`] unless the builder exposes
    /// its own setter.
    fn set_metadata(&mut self, metadata: InputMetadata) {
        *self.metadata_slot() = Some(metadata);
    }

    fn add64(&mut self, value: u64);

    async fn encrypt(self: Box<Self>) -> Result<EncryptionOutput>;
}

/// Pairing of a handle with the contract allowed to use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: Handle,
    pub contract_address: String,
}

/// Everything the backend needs for one user decryption
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptParams {
    pub pairs: Vec<HandleContractPair>,
    pub private_key: String,
    pub public_key: String,
    /// Typed-data signature without the `0x` prefix
    pub signature: String,
    pub contract_addresses: Vec<String>,
    pub user_address: String,
    pub start_timestamp: String,
    pub duration_days: u64,
}

impl fmt::Debug for UserDecryptParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDecryptParams")
            .field("pairs", &self.pairs)
            .field("public_key", &self.public_key)
            .field("signature", &self.signature)
            .field("contract_addresses", &self.contract_addresses)
            .field("user_address", &self.user_address)
            .field("start_timestamp", &self.start_timestamp)
            .field("duration_days", &self.duration_days)
            .finish_non_exhaustive()
    }
}

/// Connection to the encryption/decryption backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Network the backend was connected to
    fn network(&self) -> &NetworkConfig;

    /// Build an encrypted-input builder for a contract/user pair. An error means this call
    /// shape (or address encoding) was refused.
    fn create_encrypted_input(&self, request: InputRequest) -> Result<Box<dyn EncryptedInput>>;

    /// Typed-data authorization for a user decryption
    fn create_eip712(
        &self,
        public_key: &str,
        contract_addresses: &[String],
        start_timestamp: &str,
        duration_days: u64,
    ) -> Result<TypedData> {
        user_decrypt_authorization(
            self.network(),
            public_key,
            contract_addresses,
            start_timestamp,
            duration_days,
        )
    }

    async fn user_decrypt(&self, params: UserDecryptParams) -> Result<DecryptResponse>;

    async fn public_decrypt(&self, handles: &[Handle]) -> Result<DecryptResponse>;

    /// Backend provided keypair generator, if any
    fn keypair_generator(&self) -> Option<Arc<dyn KeypairGenerator>> {
        None
    }
}

/// Opens backend connections for a session
#[async_trait]
pub trait BackendConnector: Send + Sync {
    async fn connect(
        &self,
        network: &NetworkConfig,
        wallet: Arc<dyn Wallet>,
    ) -> Result<Arc<dyn Backend>>;
}
