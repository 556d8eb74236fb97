// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::address::normalize_strict;
use crate::attempts::AttemptLog;
use crate::backend::{Backend, CallShape, EncryptedInput, InputMetadata, InputRequest};
use crate::error::{Error, MissingField, Result};
use crate::handle::EncryptedValue;
use crate::session::Session;
use crate::wallet::resolve_user_address;
use tracing::{debug, info, instrument, warn};
use veil_config::NetworkConfig;

/// Encrypt `value` for `contract_address` on behalf of `user_address` (or the connected
/// wallet account).
///
/// Every contract x user address candidate pair is tried in order. For each pair the
/// structured call shape is tried first and the positional one only when the structured
/// builder could not be constructed. When everything fails the most recent error is returned,
/// wrapped in [`Error::EncryptFailedAllVariants`].
#[instrument(skip_all, fields(contract = contract_address))]
pub async fn encrypt_value(
    session: &Session,
    contract_address: &str,
    user_address: Option<&str>,
    value: u64,
) -> Result<EncryptedValue> {
    let user_address = resolve_user_address(session.wallet(), user_address).await?;
    let contract_candidates = normalize_strict(contract_address)?;
    let user_candidates = normalize_strict(&user_address)?;

    let state = session.get().await?;
    let backend = state.backend();

    let mut attempts = AttemptLog::default();
    let mut last_error = None;

    for contract in &contract_candidates {
        for user in &user_candidates {
            let (shape, input) = match build_input(backend.as_ref(), contract, user, &mut attempts)
            {
                Ok(built) => built,
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            };

            let metadata = input_metadata(session.network(), contract, user);
            match seal(input, metadata, value).await {
                Ok(encrypted) => {
                    info!(
                        handle = %encrypted.handle,
                        %shape,
                        failed_attempts = attempts.len(),
                        "Encrypted input accepted"
                    );
                    return Ok(encrypted);
                }
                Err(e) => {
                    warn!(contract, user, %shape, "Encryption attempt failed: {e}");
                    attempts.record(contract, user, shape, &e);
                    last_error = Some(e);
                }
            }
        }
    }

    match last_error {
        Some(last) => Err(Error::EncryptFailedAllVariants {
            last: Box::new(last),
            attempts,
        }),
        None => Err(Error::InvalidAddress(contract_address.to_string())),
    }
}

/// Construct a builder with the structured shape, falling back to the positional shape.
fn build_input(
    backend: &dyn Backend,
    contract: &str,
    user: &str,
    attempts: &mut AttemptLog,
) -> Result<(CallShape, Box<dyn EncryptedInput>)> {
    let mut last_error = None;
    for shape in [CallShape::Structured, CallShape::Positional] {
        match backend.create_encrypted_input(InputRequest::new(shape, contract, user)) {
            Ok(input) => return Ok((shape, input)),
            Err(e) => {
                let e = Error::Backend(e);
                debug!(contract, user, %shape, "Input builder refused: {e}");
                attempts.record(contract, user, shape, &e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| Error::InvalidAddress(contract.to_string())))
}

fn input_metadata(network: &NetworkConfig, contract: &str, user: &str) -> InputMetadata {
    InputMetadata {
        chain_id: network.chain_id,
        user_address: user.to_string(),
        contract_address: contract.to_string(),
        acl_contract_address: network.acl_contract_address,
        kms_contract_address: network.kms_contract_address,
    }
}

async fn seal(
    mut input: Box<dyn EncryptedInput>,
    metadata: InputMetadata,
    value: u64,
) -> Result<EncryptedValue> {
    input.set_metadata(metadata);
    input.add64(value);
    let output = input.encrypt().await.map_err(Error::Backend)?;

    let handle = output
        .handles
        .into_iter()
        .next()
        .filter(|handle| !handle.is_empty())
        .ok_or(Error::EncryptionResultMalformed(MissingField::Handle))?;

    let attestation = output
        .input_proof
        .filter(|proof| !proof.is_empty())
        .or(output.proof.filter(|proof| !proof.is_empty()))
        .ok_or(Error::EncryptionResultMalformed(MissingField::Proof))?;

    Ok(EncryptedValue {
        handle,
        attestation,
    })
}
