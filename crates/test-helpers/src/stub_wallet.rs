// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::dyn_abi::TypedData;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use veil_client::Wallet;

pub const STUB_SIGNATURE: &str = "0xabcdef0123";

/// Wallet with fixed accounts and a canned signature
pub struct StubWallet {
    accounts: Vec<String>,
    signature: String,
    decline: Option<String>,
    account_reads: AtomicUsize,
    signed: Mutex<Vec<(String, TypedData)>>,
}

impl StubWallet {
    pub fn new(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|account| account.to_string()).collect(),
            signature: STUB_SIGNATURE.to_string(),
            decline: None,
            account_reads: AtomicUsize::new(0),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// A wallet with no connected account
    pub fn disconnected() -> Self {
        Self::new(&[])
    }

    /// Every signature request is rejected with `reason`
    pub fn declining(accounts: &[&str], reason: &str) -> Self {
        Self {
            decline: Some(reason.to_string()),
            ..Self::new(accounts)
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = signature.to_string();
        self
    }

    pub fn account_reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst)
    }

    /// Account and typed data of every signature request
    pub fn signed(&self) -> Vec<(String, TypedData)> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wallet for StubWallet {
    async fn accounts(&self) -> Result<Vec<String>> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    async fn sign_typed_data(&self, account: &str, typed_data: &TypedData) -> Result<String> {
        self.signed
            .lock()
            .unwrap()
            .push((account.to_string(), typed_data.clone()));
        if let Some(reason) = &self.decline {
            bail!("{}", reason);
        }
        Ok(self.signature.clone())
    }
}
