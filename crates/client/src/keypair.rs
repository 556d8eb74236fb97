// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use std::fmt;

/// Ephemeral keypair used to authenticate user decryption. Hex encoded, `0x` prefixed.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Source of session keypairs. Backends may provide their own, otherwise
/// [`LocalKeypairGenerator`] is used.
pub trait KeypairGenerator: Send + Sync {
    fn generate(&self) -> Result<Keypair>;
}

/// Generates a random secp256k1 keypair
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalKeypairGenerator;

impl KeypairGenerator for LocalKeypairGenerator {
    fn generate(&self) -> Result<Keypair> {
        let signer = PrivateKeySigner::random();
        let key = signer.credential();
        Ok(Keypair {
            public_key: format!("0x{}", hex::encode(key.verifying_key().to_sec1_bytes())),
            private_key: format!("0x{}", hex::encode(key.to_bytes())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_generator_produces_fresh_keys() -> Result<()> {
        let first = LocalKeypairGenerator.generate()?;
        let second = LocalKeypairGenerator.generate()?;
        assert_ne!(first, second);
        assert!(first.public_key.starts_with("0x") && first.public_key.len() > 2);
        assert_eq!(first.private_key.len(), 2 + 64);
        Ok(())
    }

    #[test]
    fn test_debug_redacts_private_key() -> Result<()> {
        let keypair = LocalKeypairGenerator.generate()?;
        let printed = format!("{:?}", keypair);
        assert!(!printed.contains(&keypair.private_key[2..]));
        Ok(())
    }
}
