// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{ensure, Result};
use std::sync::Arc;
use tracing::info;
use veil_client::dev::{DevBackend, DevConnector};
use veil_client::{LocalWallet, VeilClient};
use veil_config::AppConfig;
use zeroize::Zeroizing;

/// Run every client operation against an in-process [`DevBackend`]
pub async fn execute(
    config: &AppConfig,
    contract: &str,
    value: u64,
    private_key: Option<Zeroizing<String>>,
) -> Result<()> {
    let wallet = match private_key.as_ref().map(|key| key.as_str()).or(config.private_key()) {
        Some(key) => LocalWallet::from_private_key(key)?,
        None => {
            info!("No private key configured, using a throwaway wallet");
            LocalWallet::random()
        }
    };
    println!("wallet: {}", wallet.address());

    let backend = Arc::new(DevBackend::new(config.network().clone()));
    let client = VeilClient::new(
        config.network().clone(),
        Arc::new(DevConnector::new(backend.clone())),
        Some(Arc::new(wallet)),
    );

    let encrypted = client.encrypt_value(contract, None, value).await?;
    println!("handle: {}", encrypted.handle);
    println!("proof: {}", encrypted.attestation);

    let decrypted = client
        .user_decrypt(std::slice::from_ref(&encrypted.handle), None, contract)
        .await?;
    println!("user decrypt: {:?}", decrypted);

    backend.make_publicly_decryptable(&encrypted.handle)?;
    let revealed = client
        .public_decrypt(std::slice::from_ref(&encrypted.handle))
        .await?;
    println!("public decrypt: {:?}", revealed);

    ensure!(
        decrypted == [value] && revealed == [value],
        "Roundtrip returned {:?} and {:?}, expected {}",
        decrypted,
        revealed,
        value
    );
    Ok(())
}
