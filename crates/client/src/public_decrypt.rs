// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::clear_values::order_results;
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::session::Session;
use tracing::{info, instrument};

/// Decrypt handles the contract layer has marked publicly decryptable. No signature is
/// involved and publish status is not checked locally.
#[instrument(skip_all, fields(handles = handles.len()))]
pub async fn public_decrypt(session: &Session, handles: &[Handle]) -> Result<Vec<u64>> {
    let backend = session.backend().await?;
    let response = backend
        .public_decrypt(handles)
        .await
        .map_err(Error::DecryptRequestFailed)?;

    let values = order_results(handles, response)?;
    info!("Publicly decrypted {} handles", values.len());
    Ok(values)
}
