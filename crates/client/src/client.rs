// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::address;
use crate::backend::BackendConnector;
use crate::encrypt;
use crate::error::Result;
use crate::handle::{EncryptedValue, Handle};
use crate::public_decrypt;
use crate::session::{Session, SessionState};
use crate::user_decrypt;
use crate::wallet::Wallet;
use std::sync::Arc;
use veil_config::NetworkConfig;

/// Entry point bundling a [`Session`] with the five client operations
pub struct VeilClient {
    session: Session,
}

impl VeilClient {
    pub fn new(
        network: NetworkConfig,
        connector: Arc<dyn BackendConnector>,
        wallet: Option<Arc<dyn Wallet>>,
    ) -> Self {
        Self {
            session: Session::new(network, connector, wallet),
        }
    }

    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get_session(&self) -> Result<&SessionState> {
        self.session.get().await
    }

    pub fn normalize(&self, address: &str) -> Vec<String> {
        address::normalize(address)
    }

    pub async fn encrypt_value(
        &self,
        contract_address: &str,
        user_address: Option<&str>,
        value: u64,
    ) -> Result<EncryptedValue> {
        encrypt::encrypt_value(&self.session, contract_address, user_address, value).await
    }

    pub async fn user_decrypt(
        &self,
        handles: &[Handle],
        user_address: Option<&str>,
        contract_address: &str,
    ) -> Result<Vec<u64>> {
        user_decrypt::user_decrypt(&self.session, handles, user_address, contract_address).await
    }

    pub async fn public_decrypt(&self, handles: &[Handle]) -> Result<Vec<u64>> {
        public_decrypt::public_decrypt(&self.session, handles).await
    }
}
