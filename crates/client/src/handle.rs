// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a ciphertext held by the contract layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Lowercase `0x`-prefixed rendering, used as the secondary lookup key in keyed responses
    pub fn string_form(&self) -> String {
        let trimmed = self.0.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        format!("0x{}", body.to_lowercase())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<B256> for Handle {
    fn from(value: B256) -> Self {
        Self(value.to_string())
    }
}

/// A handle together with the proof that certifies it was produced for a given
/// contract/user pair. Both parts are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedValue {
    pub handle: Handle,
    pub attestation: Bytes,
}
