// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::address::first_candidate_or_raw;
use crate::backend::{HandleContractPair, UserDecryptParams};
use crate::clear_values::order_results;
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::keypair::Keypair;
use crate::session::Session;
use crate::typed_data::strip_hex_prefix;
use crate::wallet::{connected_account, resolve_user_address};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument};

/// How long a user decryption authorization stays valid
pub const DEFAULT_DURATION_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityWindow {
    /// Unix seconds, as text
    pub start_timestamp: String,
    pub duration_days: u64,
}

impl ValidityWindow {
    pub fn new(start_secs: u64, duration_days: u64) -> Self {
        Self {
            start_timestamp: start_secs.to_string(),
            duration_days,
        }
    }

    pub fn starting_now(duration_days: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::new(now, duration_days)
    }
}

/// A single authenticated decryption, built fresh per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptRequest {
    pub handles: Vec<Handle>,
    pub contract_address: String,
    pub user_address: String,
    pub validity: ValidityWindow,
}

impl DecryptRequest {
    pub fn into_params(self, keypair: &Keypair, signature: &str) -> UserDecryptParams {
        let pairs = self
            .handles
            .into_iter()
            .map(|handle| HandleContractPair {
                handle,
                contract_address: self.contract_address.clone(),
            })
            .collect();

        UserDecryptParams {
            pairs,
            private_key: keypair.private_key.clone(),
            public_key: keypair.public_key.clone(),
            signature: strip_hex_prefix(signature).to_string(),
            contract_addresses: vec![self.contract_address],
            user_address: self.user_address,
            start_timestamp: self.validity.start_timestamp,
            duration_days: self.validity.duration_days,
        }
    }
}

/// Decrypt `handles` for `user_address` (or the connected account). The wallet signs a
/// typed-data authorization binding the session public key to `contract_address` for
/// [`DEFAULT_DURATION_DAYS`]. Results follow the order of `handles`.
///
/// Unlike [`crate::encrypt_value`], a contract address that does not normalize is passed
/// through unchanged.
#[instrument(skip_all, fields(handles = handles.len()))]
pub async fn user_decrypt(
    session: &Session,
    handles: &[Handle],
    user_address: Option<&str>,
    contract_address: &str,
) -> Result<Vec<u64>> {
    let wallet = session.wallet().ok_or(Error::WalletUnavailable)?;
    let user_address = resolve_user_address(Some(wallet), user_address).await?;
    let contract_address = first_candidate_or_raw(contract_address);

    let state = session.get().await?;
    let backend = state.backend();
    let keypair = state.keypair();

    let signer = connected_account(wallet).await?;
    if !signer.eq_ignore_ascii_case(&user_address) {
        debug!(%signer, user = %user_address, "Signing account differs from decryption user");
    }

    let request = DecryptRequest {
        handles: handles.to_vec(),
        contract_address,
        user_address,
        validity: ValidityWindow::starting_now(DEFAULT_DURATION_DAYS),
    };

    let typed_data = backend
        .create_eip712(
            &keypair.public_key,
            std::slice::from_ref(&request.contract_address),
            &request.validity.start_timestamp,
            request.validity.duration_days,
        )
        .map_err(Error::DecryptRequestFailed)?;

    let signature = wallet
        .sign_typed_data(&signer, &typed_data)
        .await
        .map_err(|e| Error::SignatureDeclined(format!("{e:#}")))?;

    let params = request.into_params(keypair, &signature);
    let response = backend
        .user_decrypt(params)
        .await
        .map_err(Error::DecryptRequestFailed)?;

    let values = order_results(handles, response)?;
    info!("Decrypted {} handles for user", values.len());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_pair_every_handle_with_contract() {
        let keypair = Keypair {
            public_key: "0xpub".to_string(),
            private_key: "0xpriv".to_string(),
        };
        let request = DecryptRequest {
            handles: vec![Handle::from("0x01"), Handle::from("0x02")],
            contract_address: "0xcontract".to_string(),
            user_address: "0xuser".to_string(),
            validity: ValidityWindow::new(1_700_000_000, DEFAULT_DURATION_DAYS),
        };

        let params = request.into_params(&keypair, "0xdeadbeef");

        assert_eq!(params.signature, "deadbeef");
        assert_eq!(params.contract_addresses, vec!["0xcontract".to_string()]);
        assert_eq!(params.start_timestamp, "1700000000");
        assert_eq!(params.duration_days, 7);
        assert_eq!(params.pairs.len(), 2);
        assert_eq!(params.pairs[1].handle, Handle::from("0x02"));
        assert!(params
            .pairs
            .iter()
            .all(|pair| pair.contract_address == "0xcontract"));
        assert_eq!(params.private_key, "0xpriv");
    }

    #[test]
    fn test_window_starts_now() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let window = ValidityWindow::starting_now(DEFAULT_DURATION_DAYS);
        let start: u64 = window.start_timestamp.parse().unwrap();
        assert!(start >= before && start <= before + 5);
        assert_eq!(window.duration_days, 7);
    }
}
