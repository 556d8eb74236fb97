// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::fixtures::encryption_output;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use veil_client::{
    Backend, BackendConnector, DecryptResponse, EncryptedInput, EncryptionOutput, Handle,
    InputMetadata, InputRequest, Keypair, KeypairGenerator, UserDecryptParams, Wallet,
};
use veil_config::NetworkConfig;

type InputRule = Box<dyn Fn(&InputRequest) -> Result<EncryptionOutput> + Send + Sync>;
type UserDecryptRule = Box<dyn Fn(&UserDecryptParams) -> Result<DecryptResponse> + Send + Sync>;
type PublicDecryptRule = Box<dyn Fn(&[Handle]) -> Result<DecryptResponse> + Send + Sync>;

/// What a stub input builder was given before `encrypt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedInput {
    pub metadata: Option<InputMetadata>,
    pub values: Vec<u64>,
}

/// Scriptable backend that records every call it receives
pub struct StubBackend {
    network: NetworkConfig,
    input_rule: InputRule,
    user_decrypt_rule: UserDecryptRule,
    public_decrypt_rule: PublicDecryptRule,
    keypair_generator: Option<Arc<CountingKeypairGenerator>>,
    input_requests: Mutex<Vec<InputRequest>>,
    sealed_inputs: Arc<Mutex<Vec<SealedInput>>>,
    user_decrypt_calls: Mutex<Vec<UserDecryptParams>>,
    public_decrypt_calls: Mutex<Vec<Vec<Handle>>>,
}

impl StubBackend {
    /// Accepts every input request, refuses both decrypt paths
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            input_rule: Box::new(|_| Ok(encryption_output("0x01", &[0xaa]))),
            user_decrypt_rule: Box::new(|_| bail!("user decrypt not scripted")),
            public_decrypt_rule: Box::new(|_| bail!("public decrypt not scripted")),
            keypair_generator: None,
            input_requests: Mutex::new(Vec::new()),
            sealed_inputs: Arc::new(Mutex::new(Vec::new())),
            user_decrypt_calls: Mutex::new(Vec::new()),
            public_decrypt_calls: Mutex::new(Vec::new()),
        }
    }

    /// Decide per request whether the builder is constructed and what it will produce
    pub fn with_input(
        mut self,
        rule: impl Fn(&InputRequest) -> Result<EncryptionOutput> + Send + Sync + 'static,
    ) -> Self {
        self.input_rule = Box::new(rule);
        self
    }

    pub fn with_user_decrypt(
        mut self,
        rule: impl Fn(&UserDecryptParams) -> Result<DecryptResponse> + Send + Sync + 'static,
    ) -> Self {
        self.user_decrypt_rule = Box::new(rule);
        self
    }

    pub fn with_public_decrypt(
        mut self,
        rule: impl Fn(&[Handle]) -> Result<DecryptResponse> + Send + Sync + 'static,
    ) -> Self {
        self.public_decrypt_rule = Box::new(rule);
        self
    }

    pub fn with_keypair_generator(mut self, generator: Arc<CountingKeypairGenerator>) -> Self {
        self.keypair_generator = Some(generator);
        self
    }

    pub fn input_requests(&self) -> Vec<InputRequest> {
        self.input_requests.lock().unwrap().clone()
    }

    pub fn sealed_inputs(&self) -> Vec<SealedInput> {
        self.sealed_inputs.lock().unwrap().clone()
    }

    pub fn user_decrypt_calls(&self) -> Vec<UserDecryptParams> {
        self.user_decrypt_calls.lock().unwrap().clone()
    }

    pub fn public_decrypt_calls(&self) -> Vec<Vec<Handle>> {
        self.public_decrypt_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for StubBackend {
    fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn create_encrypted_input(&self, request: InputRequest) -> Result<Box<dyn EncryptedInput>> {
        self.input_requests.lock().unwrap().push(request.clone());
        let output = (self.input_rule)(&request)?;
        Ok(Box::new(StubInput {
            output,
            metadata: None,
            values: Vec::new(),
            sealed: self.sealed_inputs.clone(),
        }))
    }

    async fn user_decrypt(&self, params: UserDecryptParams) -> Result<DecryptResponse> {
        self.user_decrypt_calls.lock().unwrap().push(params.clone());
        (self.user_decrypt_rule)(&params)
    }

    async fn public_decrypt(&self, handles: &[Handle]) -> Result<DecryptResponse> {
        self.public_decrypt_calls
            .lock()
            .unwrap()
            .push(handles.to_vec());
        (self.public_decrypt_rule)(handles)
    }

    fn keypair_generator(&self) -> Option<Arc<dyn KeypairGenerator>> {
        self.keypair_generator
            .clone()
            .map(|generator| generator as Arc<dyn KeypairGenerator>)
    }
}

struct StubInput {
    output: EncryptionOutput,
    metadata: Option<InputMetadata>,
    values: Vec<u64>,
    sealed: Arc<Mutex<Vec<SealedInput>>>,
}

#[async_trait]
impl EncryptedInput for StubInput {
    fn metadata_slot(&mut self) -> &mut Option<InputMetadata> {
        &mut self.metadata
    }

    fn add64(&mut self, value: u64) {
        self.values.push(value);
    }

    async fn encrypt(self: Box<Self>) -> Result<EncryptionOutput> {
        self.sealed.lock().unwrap().push(SealedInput {
            metadata: self.metadata.clone(),
            values: self.values.clone(),
        });
        Ok(self.output)
    }
}

/// Connector handing out one shared backend, counting connects
pub struct StubConnector {
    backend: Arc<dyn Backend>,
    connects: AtomicUsize,
    delay: Duration,
    failure: Option<String>,
}

impl StubConnector {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            connects: AtomicUsize::new(0),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    /// Every connect fails with `reason`
    pub fn failing(backend: Arc<dyn Backend>, reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new(backend)
        }
    }

    /// Hold each connect open for `delay` so concurrent callers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendConnector for StubConnector {
    async fn connect(
        &self,
        _network: &NetworkConfig,
        _wallet: Arc<dyn Wallet>,
    ) -> Result<Arc<dyn Backend>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(anyhow!(reason.clone()));
        }
        Ok(self.backend.clone())
    }
}

/// Keypair generator returning a fixed keypair, counting calls
#[derive(Debug, Default)]
pub struct CountingKeypairGenerator {
    calls: AtomicUsize,
}

impl CountingKeypairGenerator {
    pub const PUBLIC_KEY: &'static str =
        "0x021111111111111111111111111111111111111111111111111111111111111111";
    pub const PRIVATE_KEY: &'static str =
        "0x2222222222222222222222222222222222222222222222222222222222222222";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeypairGenerator for CountingKeypairGenerator {
    fn generate(&self) -> Result<Keypair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Keypair {
            public_key: Self::PUBLIC_KEY.to_string(),
            private_key: Self::PRIVATE_KEY.to_string(),
        })
    }
}
