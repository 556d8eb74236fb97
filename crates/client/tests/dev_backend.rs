// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use std::sync::Arc;
use veil_client::dev::{DevBackend, DevConnector};
use veil_client::{Error, LocalWallet, VeilClient};
use veil_config::NetworkConfig;
use veil_test_helpers::{
    init_test_logging, CONTRACT_CHECKSUMMED, CONTRACT_LOWERCASE, DEV_ADDRESS, DEV_PRIVATE_KEY,
    USER_CHECKSUMMED,
};

fn dev_client(backend: DevBackend) -> Result<(VeilClient, Arc<DevBackend>)> {
    let backend = Arc::new(backend);
    let wallet = Arc::new(LocalWallet::from_private_key(DEV_PRIVATE_KEY)?);
    let client = VeilClient::new(
        NetworkConfig::local(),
        Arc::new(DevConnector::new(backend.clone())),
        Some(wallet),
    );
    Ok((client, backend))
}

#[tokio::test]
async fn test_encrypt_then_user_decrypt() -> Result<()> {
    let _guard = init_test_logging();
    let (client, backend) = dev_client(DevBackend::new(NetworkConfig::local()))?;

    let first = client.encrypt_value(CONTRACT_LOWERCASE, None, 42).await?;
    let second = client
        .encrypt_value(CONTRACT_CHECKSUMMED, Some(DEV_ADDRESS), 7)
        .await?;
    assert_ne!(first.handle, second.handle);
    assert!(!first.attestation.is_empty());
    assert_eq!(backend.len()?, 2);

    let values = client
        .user_decrypt(
            &[second.handle.clone(), first.handle.clone()],
            None,
            CONTRACT_LOWERCASE,
        )
        .await?;

    assert_eq!(values, vec![7, 42]);
    Ok(())
}

#[tokio::test]
async fn test_positional_only_backend() -> Result<()> {
    let (client, _) = dev_client(DevBackend::new(NetworkConfig::local()).positional_only())?;

    let encrypted = client.encrypt_value(CONTRACT_CHECKSUMMED, None, 99).await?;
    let values = client
        .user_decrypt(&[encrypted.handle], None, CONTRACT_CHECKSUMMED)
        .await?;

    assert_eq!(values, vec![99]);
    Ok(())
}

#[tokio::test]
async fn test_public_decrypt_after_release() -> Result<()> {
    let (client, backend) = dev_client(DevBackend::new(NetworkConfig::local()))?;
    let encrypted = client.encrypt_value(CONTRACT_CHECKSUMMED, None, 5).await?;

    let err = client
        .public_decrypt(std::slice::from_ref(&encrypted.handle))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DecryptRequestFailed(_)));

    backend.make_publicly_decryptable(&encrypted.handle)?;
    let values = client.public_decrypt(&[encrypted.handle]).await?;

    assert_eq!(values, vec![5]);
    Ok(())
}

#[tokio::test]
async fn test_decrypt_for_other_user_is_rejected() -> Result<()> {
    let (client, _) = dev_client(DevBackend::new(NetworkConfig::local()))?;
    let encrypted = client.encrypt_value(CONTRACT_CHECKSUMMED, None, 5).await?;

    let err = client
        .user_decrypt(&[encrypted.handle], Some(USER_CHECKSUMMED), CONTRACT_CHECKSUMMED)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DecryptRequestFailed(_)));
    Ok(())
}

#[tokio::test]
async fn test_value_encrypted_for_other_user_stays_private() -> Result<()> {
    let (client, _) = dev_client(DevBackend::new(NetworkConfig::local()))?;
    let encrypted = client
        .encrypt_value(CONTRACT_CHECKSUMMED, Some(USER_CHECKSUMMED), 5)
        .await?;

    let err = client
        .user_decrypt(&[encrypted.handle], None, CONTRACT_CHECKSUMMED)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DecryptRequestFailed(_)));
    Ok(())
}

#[tokio::test]
async fn test_connect_rejects_other_chain() -> Result<()> {
    let backend = Arc::new(DevBackend::new(NetworkConfig::local()));
    let client = VeilClient::new(
        NetworkConfig::sepolia(),
        Arc::new(DevConnector::new(backend)),
        Some(Arc::new(LocalWallet::from_private_key(DEV_PRIVATE_KEY)?)),
    );

    let err = client.get_session().await.err().unwrap();

    assert!(matches!(err, Error::BackendUnavailable(_)));
    Ok(())
}
