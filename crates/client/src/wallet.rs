// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::{Error, Result};
use alloy::dyn_abi::TypedData;
use alloy::primitives::Address;
use alloy::signers::{local::PrivateKeySigner, Signer};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Wallet capability: connected accounts and typed-data signing
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Currently connected accounts, the active one first
    async fn accounts(&self) -> anyhow::Result<Vec<String>>;

    /// Sign EIP-712 typed data with `account`. Returns a `0x` prefixed signature.
    async fn sign_typed_data(&self, account: &str, typed_data: &TypedData)
        -> anyhow::Result<String>;
}

/// The wallet's active account
pub async fn connected_account(wallet: &Arc<dyn Wallet>) -> Result<String> {
    let accounts = wallet.accounts().await.map_err(|e| {
        debug!("Could not read wallet accounts: {e:#}");
        Error::NoConnectedAccount
    })?;

    accounts
        .into_iter()
        .map(|account| account.trim().to_string())
        .find(|account| !account.is_empty())
        .ok_or(Error::NoConnectedAccount)
}

/// Use `user_address` when given, otherwise the wallet's active account
pub async fn resolve_user_address(
    wallet: Option<&Arc<dyn Wallet>>,
    user_address: Option<&str>,
) -> Result<String> {
    if let Some(user) = user_address.map(str::trim).filter(|user| !user.is_empty()) {
        return Ok(user.to_string());
    }

    let wallet = wallet.ok_or(Error::WalletUnavailable)?;
    connected_account(wallet).await
}

/// Wallet backed by a single in-process private key
#[derive(Debug, Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
}

impl LocalWallet {
    pub fn from_private_key(private_key: &str) -> anyhow::Result<Self> {
        let signer: PrivateKeySigner = private_key.trim().parse()?;
        Ok(Self { signer })
    }

    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl Wallet for LocalWallet {
    async fn accounts(&self) -> anyhow::Result<Vec<String>> {
        Ok(vec![self.signer.address().to_checksum(None)])
    }

    async fn sign_typed_data(
        &self,
        account: &str,
        typed_data: &TypedData,
    ) -> anyhow::Result<String> {
        let account = Address::from_str(account)?;
        anyhow::ensure!(
            account == self.signer.address(),
            "Account {} is not managed by this wallet",
            account
        );

        let hash = typed_data.eip712_signing_hash()?;
        let signature = self.signer.sign_hash(&hash).await?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_data::{strip_hex_prefix, user_decrypt_authorization};
    use alloy::primitives::Signature;
    use veil_config::NetworkConfig;

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[tokio::test]
    async fn test_local_wallet_accounts() -> anyhow::Result<()> {
        let wallet = LocalWallet::from_private_key(DEV_KEY)?;
        assert_eq!(wallet.accounts().await?, vec![DEV_ADDRESS.to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_local_wallet_signature_recovers() -> anyhow::Result<()> {
        let wallet = LocalWallet::from_private_key(DEV_KEY)?;
        let typed = user_decrypt_authorization(
            &NetworkConfig::local(),
            "0x01",
            &[DEV_ADDRESS.to_string()],
            "1700000000",
            7,
        )?;

        let signature = wallet.sign_typed_data(DEV_ADDRESS, &typed).await?;
        assert!(signature.starts_with("0x"));

        let bytes = hex::decode(strip_hex_prefix(&signature))?;
        let signature = Signature::try_from(bytes.as_slice())?;
        let recovered = signature.recover_address_from_prehash(&typed.eip712_signing_hash()?)?;
        assert_eq!(recovered, wallet.address());
        Ok(())
    }

    #[tokio::test]
    async fn test_local_wallet_refuses_foreign_account() -> anyhow::Result<()> {
        let wallet = LocalWallet::random();
        let typed =
            user_decrypt_authorization(&NetworkConfig::local(), "0x01", &[], "1700000000", 7)?;
        assert!(wallet.sign_typed_data(DEV_ADDRESS, &typed).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_user_address() -> anyhow::Result<()> {
        let wallet: Arc<dyn Wallet> = Arc::new(LocalWallet::from_private_key(DEV_KEY)?);

        let explicit = resolve_user_address(Some(&wallet), Some(" 0xabc ")).await?;
        assert_eq!(explicit, "0xabc");

        let from_wallet = resolve_user_address(Some(&wallet), Some("   ")).await?;
        assert_eq!(from_wallet, DEV_ADDRESS);

        assert!(matches!(
            resolve_user_address(None, None).await,
            Err(Error::WalletUnavailable)
        ));
        Ok(())
    }
}
