// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::attempts::AttemptLog;
use std::fmt;
use thiserror::Error as ThisError;

/// Field missing from an encryption result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Handle,
    Proof,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Handle => write!(f, "ciphertext handle"),
            MissingField::Proof => write!(f, "input proof"),
        }
    }
}

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("No wallet provider is configured, cannot open a session")]
    ConfigurationMissing,
    #[error("Encryption backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Invalid address: '{0}'")]
    InvalidAddress(String),
    #[error("No wallet account is connected")]
    NoConnectedAccount,
    #[error("Wallet is not available")]
    WalletUnavailable,
    #[error("Encryption result is missing the {0}")]
    EncryptionResultMalformed(MissingField),
    /// Every address/call-shape variant failed. Only the last error is surfaced, the full
    /// history is kept in `attempts`.
    #[error("Encryption failed for all {} variants: {last}", attempts.len())]
    EncryptFailedAllVariants {
        last: Box<Error>,
        attempts: AttemptLog,
    },
    #[error("Signature declined: {0}")]
    SignatureDeclined(String),
    #[error("Decrypt request failed: {0:#}")]
    DecryptRequestFailed(anyhow::Error),
    #[error("No decrypted value returned for handle {0}")]
    MissingClearValue(String),
    #[error("Decrypted value is not a valid u64: {0}")]
    InvalidClearValue(String),
    #[error("Backend returned {actual} decrypted values for {expected} handles")]
    ResultLengthMismatch { expected: usize, actual: usize },
    /// Backend failure for a single encryption attempt
    #[error("{0:#}")]
    Backend(anyhow::Error),
}

/// Result that returns a type T or a veil client Error
pub type Result<T> = std::result::Result<T, Error>;
