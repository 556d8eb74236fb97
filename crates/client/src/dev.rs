// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! In-memory development backend.
//!
//! INSECURE: values are stored in the clear and handles are plain hashes. It exists so the
//! whole request flow can run locally without a relayer. It still enforces the authorization
//! rules a real backend applies: the user-decrypt signature must recover to the requested user,
//! the window must be current, only the owner may read a value through the contract it was
//! encrypted for, and public decryption only releases published handles.

use crate::backend::{
    Backend, BackendConnector, EncryptedInput, EncryptionOutput, InputMetadata, InputRequest,
    UserDecryptParams,
};
use crate::clear_values::DecryptResponse;
use crate::handle::Handle;
use crate::wallet::Wallet;
use alloy::primitives::{keccak256, Address, Signature, B256};
use anyhow::{anyhow, bail, ensure, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use veil_config::NetworkConfig;

const SECONDS_PER_DAY: u64 = 86_400;
/// Tolerated clock skew for a window that starts in the future
const CLOCK_SKEW_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct StoredValue {
    value: u64,
    owner: Address,
    contract: Address,
    public: bool,
}

#[derive(Debug, Default)]
struct DevStore {
    entries: Mutex<HashMap<String, StoredValue>>,
    batches: AtomicU64,
}

impl DevStore {
    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredValue>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("dev backend store is poisoned"))
    }
}

pub struct DevBackend {
    network: NetworkConfig,
    store: Arc<DevStore>,
    accept_structured: bool,
}

impl DevBackend {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            store: Arc::new(DevStore::default()),
            accept_structured: true,
        }
    }

    /// Refuse structured input requests, like older backend versions do
    pub fn positional_only(mut self) -> Self {
        self.accept_structured = false;
        self
    }

    /// Contract-layer stand-in: allow anyone to decrypt `handle`
    pub fn make_publicly_decryptable(&self, handle: &Handle) -> Result<()> {
        let mut entries = self.store.entries()?;
        let entry = entries
            .get_mut(&handle.string_form())
            .with_context(|| format!("Unknown handle {}", handle))?;
        entry.public = true;
        Ok(())
    }

    /// Number of stored values. Fails if the store lock was poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl Backend for DevBackend {
    fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn create_encrypted_input(&self, request: InputRequest) -> Result<Box<dyn EncryptedInput>> {
        if matches!(request, InputRequest::Structured(_)) && !self.accept_structured {
            bail!("Structured input requests are not supported by this backend");
        }

        let contract = Address::from_str(request.contract_address())
            .with_context(|| format!("Invalid contract address {}", request.contract_address()))?;
        let user = Address::from_str(request.user_address())
            .with_context(|| format!("Invalid user address {}", request.user_address()))?;

        Ok(Box::new(DevEncryptedInput {
            store: self.store.clone(),
            contract,
            user,
            values: Vec::new(),
            metadata: None,
        }))
    }

    /// The private key is not used: a real backend re-encrypts results to the public key,
    /// the dev backend returns them in the clear.
    async fn user_decrypt(&self, params: UserDecryptParams) -> Result<DecryptResponse> {
        let typed_data = self.create_eip712(
            &params.public_key,
            &params.contract_addresses,
            &params.start_timestamp,
            params.duration_days,
        )?;
        let hash = typed_data.eip712_signing_hash()?;
        let signature = Signature::try_from(hex::decode(&params.signature)?.as_slice())?;
        let signer = signature.recover_address_from_prehash(&hash)?;

        let user = Address::from_str(&params.user_address)?;
        ensure!(
            signer == user,
            "Authorization was signed by {}, not by user {}",
            signer,
            user
        );

        let start: u64 = params.start_timestamp.parse()?;
        let now = unix_now();
        ensure!(
            start <= now + CLOCK_SKEW_SECS,
            "Authorization is not valid yet"
        );
        let expires = params
            .duration_days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|window| start.checked_add(window))
            .context("Authorization window overflows")?;
        ensure!(now <= expires, "Authorization has expired");

        let allowed = params
            .contract_addresses
            .iter()
            .map(|address| Address::from_str(address))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let entries = self.store.entries()?;
        let values = params
            .pairs
            .iter()
            .map(|pair| {
                let entry = entries
                    .get(&pair.handle.string_form())
                    .with_context(|| format!("Unknown handle {}", pair.handle))?;
                let contract = Address::from_str(&pair.contract_address)?;
                ensure!(
                    allowed.contains(&contract) && entry.contract == contract,
                    "Contract {} may not decrypt {}",
                    contract,
                    pair.handle
                );
                ensure!(
                    entry.owner == user,
                    "User {} may not decrypt {}",
                    user,
                    pair.handle
                );
                Ok(Value::from(entry.value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DecryptResponse::Ordered(values))
    }

    async fn public_decrypt(&self, handles: &[Handle]) -> Result<DecryptResponse> {
        let entries = self.store.entries()?;
        let mut values = HashMap::with_capacity(handles.len());
        for handle in handles {
            let key = handle.string_form();
            let entry = entries
                .get(&key)
                .with_context(|| format!("Unknown handle {}", handle))?;
            ensure!(entry.public, "Handle {} is not publicly decryptable", handle);
            values.insert(key, Value::from(entry.value));
        }
        Ok(DecryptResponse::Keyed(values))
    }
}

struct DevEncryptedInput {
    store: Arc<DevStore>,
    contract: Address,
    user: Address,
    values: Vec<u64>,
    metadata: Option<InputMetadata>,
}

#[async_trait]
impl EncryptedInput for DevEncryptedInput {
    fn metadata_slot(&mut self) -> &mut Option<InputMetadata> {
        &mut self.metadata
    }

    fn add64(&mut self, value: u64) {
        self.values.push(value);
    }

    async fn encrypt(self: Box<Self>) -> Result<EncryptionOutput> {
        let metadata = self
            .metadata
            .as_ref()
            .context("Input metadata was not attached")?;
        ensure!(!self.values.is_empty(), "No values were added to the input");

        let batch = self.store.batches.fetch_add(1, Ordering::SeqCst);
        let hashes: Vec<B256> = (0..self.values.len())
            .map(|index| {
                let mut preimage = Vec::with_capacity(56);
                preimage.extend_from_slice(self.contract.as_slice());
                preimage.extend_from_slice(self.user.as_slice());
                preimage.extend_from_slice(&batch.to_be_bytes());
                preimage.extend_from_slice(&(index as u64).to_be_bytes());
                keccak256(&preimage)
            })
            .collect();

        {
            let mut entries = self.store.entries()?;
            for (hash, value) in hashes.iter().zip(&self.values) {
                entries.insert(
                    Handle::from(*hash).string_form(),
                    StoredValue {
                        value: *value,
                        owner: self.user,
                        contract: self.contract,
                        public: false,
                    },
                );
            }
        }

        let mut proof = Vec::new();
        for hash in &hashes {
            proof.extend_from_slice(hash.as_slice());
        }
        proof.extend_from_slice(&metadata.chain_id.to_be_bytes());
        proof.extend_from_slice(metadata.acl_contract_address.as_slice());
        proof.extend_from_slice(metadata.kms_contract_address.as_slice());
        debug!("Dev backend stored {} values in batch {}", hashes.len(), batch);

        Ok(EncryptionOutput {
            handles: hashes.into_iter().map(Handle::from).collect(),
            input_proof: Some(keccak256(&proof).to_vec().into()),
            proof: None,
        })
    }
}

/// Hands out one shared [`DevBackend`]
pub struct DevConnector {
    backend: Arc<DevBackend>,
}

impl DevConnector {
    pub fn new(backend: Arc<DevBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl BackendConnector for DevConnector {
    async fn connect(
        &self,
        network: &NetworkConfig,
        _wallet: Arc<dyn Wallet>,
    ) -> Result<Arc<dyn Backend>> {
        ensure!(
            network.chain_id == self.backend.network.chain_id,
            "Dev backend serves chain {}, not {}",
            self.backend.network.chain_id,
            network.chain_id
        );
        Ok(self.backend.clone())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CallShape, HandleContractPair};
    use crate::keypair::{KeypairGenerator, LocalKeypairGenerator};
    use crate::wallet::LocalWallet;

    fn metadata(network: &NetworkConfig) -> InputMetadata {
        InputMetadata {
            chain_id: network.chain_id,
            user_address: "0x0000000000000000000000000000000000000002".to_string(),
            contract_address: "0x0000000000000000000000000000000000000001".to_string(),
            acl_contract_address: network.acl_contract_address,
            kms_contract_address: network.kms_contract_address,
        }
    }

    fn request(shape: CallShape) -> InputRequest {
        InputRequest::new(
            shape,
            "0x0000000000000000000000000000000000000001",
            "0x0000000000000000000000000000000000000002",
        )
    }

    #[tokio::test]
    async fn test_positional_only_refuses_structured() -> Result<()> {
        let backend = DevBackend::new(NetworkConfig::local()).positional_only();
        assert!(backend
            .create_encrypted_input(request(CallShape::Structured))
            .is_err());
        assert!(backend
            .create_encrypted_input(request(CallShape::Positional))
            .is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_encrypt_requires_metadata() -> Result<()> {
        let backend = DevBackend::new(NetworkConfig::local());
        let mut input = backend.create_encrypted_input(request(CallShape::Structured))?;
        input.add64(5);
        assert!(input.encrypt().await.is_err());
        assert!(backend.is_empty()?);
        Ok(())
    }

    #[tokio::test]
    async fn test_public_decrypt_only_after_publish() -> Result<()> {
        let network = NetworkConfig::local();
        let backend = DevBackend::new(network.clone());
        let mut input = backend.create_encrypted_input(request(CallShape::Positional))?;
        input.set_metadata(metadata(&network));
        input.add64(11);
        let output = input.encrypt().await?;
        let handle = output.handles[0].clone();
        assert!(output.input_proof.is_some());

        assert!(backend.public_decrypt(&[handle.clone()]).await.is_err());

        backend.make_publicly_decryptable(&handle)?;
        let response = backend.public_decrypt(&[handle.clone()]).await?;
        assert_eq!(
            response,
            DecryptResponse::Keyed(HashMap::from([(handle.string_form(), Value::from(11u64))]))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_handles_are_unique_per_batch() -> Result<()> {
        let network = NetworkConfig::local();
        let backend = DevBackend::new(network.clone());
        let mut handles = Vec::new();
        for _ in 0..2 {
            let mut input = backend.create_encrypted_input(request(CallShape::Positional))?;
            input.set_metadata(metadata(&network));
            input.add64(1);
            handles.extend(input.encrypt().await?.handles);
        }
        assert_ne!(handles[0], handles[1]);
        assert_eq!(backend.len()?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_len_reports_poisoned_store() -> Result<()> {
        let backend = DevBackend::new(NetworkConfig::local());
        let store = backend.store.clone();
        let poisoned = std::thread::spawn(move || {
            let _guard = store.entries.lock().unwrap();
            panic!("poison the store");
        })
        .join();
        assert!(poisoned.is_err());

        assert!(backend.len().is_err());
        assert!(backend.is_empty().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_window_is_rejected() -> Result<()> {
        let network = NetworkConfig::local();
        let backend = DevBackend::new(network.clone());
        let mut input = backend.create_encrypted_input(request(CallShape::Positional))?;
        input.set_metadata(metadata(&network));
        input.add64(3);
        let handle = input.encrypt().await?.handles[0].clone();

        let wallet = LocalWallet::random();
        let user = wallet.address().to_checksum(None);
        let contract = "0x0000000000000000000000000000000000000001".to_string();
        let keypair = LocalKeypairGenerator.generate()?;
        let start = unix_now().to_string();
        let typed_data = backend.create_eip712(
            &keypair.public_key,
            std::slice::from_ref(&contract),
            &start,
            u64::MAX,
        )?;
        let signature = wallet.sign_typed_data(&user, &typed_data).await?;

        let params = UserDecryptParams {
            pairs: vec![HandleContractPair {
                handle,
                contract_address: contract.clone(),
            }],
            private_key: keypair.private_key,
            public_key: keypair.public_key,
            signature: signature.trim_start_matches("0x").to_string(),
            contract_addresses: vec![contract],
            user_address: user,
            start_timestamp: start,
            duration_days: u64::MAX,
        };

        let err = backend.user_decrypt(params).await.unwrap_err();
        assert!(err.to_string().contains("overflows"));
        Ok(())
    }
}
