// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::backend::{Backend, BackendConnector};
use crate::error::{Error, Result};
use crate::keypair::{Keypair, KeypairGenerator, LocalKeypairGenerator};
use crate::wallet::Wallet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use veil_config::NetworkConfig;

/// Connected backend and the keypair generated for it
pub struct SessionState {
    backend: Arc<dyn Backend>,
    keypair: Keypair,
}

impl SessionState {
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

/// Lazily connected backend session.
///
/// The first call to [`Session::get`] connects and generates the keypair; concurrent callers
/// await that same initialization. There is no invalidation, a changed network or revoked
/// wallet needs a new `Session`.
pub struct Session {
    network: NetworkConfig,
    connector: Arc<dyn BackendConnector>,
    wallet: Option<Arc<dyn Wallet>>,
    state: OnceCell<SessionState>,
}

impl Session {
    pub fn new(
        network: NetworkConfig,
        connector: Arc<dyn BackendConnector>,
        wallet: Option<Arc<dyn Wallet>>,
    ) -> Self {
        Self {
            network,
            connector,
            wallet,
            state: OnceCell::new(),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn wallet(&self) -> Option<&Arc<dyn Wallet>> {
        self.wallet.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized()
    }

    /// Connect on first use, then return the cached state. A failed initialization leaves the
    /// session empty so a later call can try again.
    pub async fn get(&self) -> Result<&SessionState> {
        self.state.get_or_try_init(|| self.initialize()).await
    }

    pub async fn backend(&self) -> Result<&Arc<dyn Backend>> {
        Ok(self.get().await?.backend())
    }

    pub async fn keypair(&self) -> Result<&Keypair> {
        Ok(self.get().await?.keypair())
    }

    async fn initialize(&self) -> Result<SessionState> {
        let wallet = self.wallet.clone().ok_or(Error::ConfigurationMissing)?;

        info!(
            chain_id = self.network.chain_id,
            relayer = %self.network.relayer_url,
            "Connecting to encryption backend"
        );
        let backend = self
            .connector
            .connect(&self.network, wallet)
            .await
            .map_err(|e| Error::BackendUnavailable(format!("{e:#}")))?;

        let generator: Arc<dyn KeypairGenerator> = match backend.keypair_generator() {
            Some(generator) => {
                debug!("Using backend keypair generator");
                generator
            }
            None => {
                debug!("Backend has no keypair generator, using local generator");
                Arc::new(LocalKeypairGenerator)
            }
        };

        let keypair = generator
            .generate()
            .map_err(|e| Error::BackendUnavailable(format!("keypair generation failed: {e:#}")))?;
        info!("Session ready");

        Ok(SessionState { backend, keypair })
    }
}
