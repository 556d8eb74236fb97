// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Address normalization.
//!
//! Backends disagree on whether they want EIP-55 checksummed or lowercase addresses, so every
//! address is expanded into the set of textual forms that encode the same 20 bytes.

use crate::error::{Error, Result};
use alloy::primitives::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is a valid regex"));

const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Returns the deduplicated candidate encodings of `address`, checksummed form first.
///
/// An empty result means the address is invalid.
pub fn normalize(address: &str) -> Vec<String> {
    let stripped: String = address.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect();
    let cleaned = stripped.trim();

    let mut candidates = Vec::with_capacity(2);
    if let Some(checksummed) = checksummed(cleaned) {
        candidates.push(checksummed);
    }
    candidates.push(cleaned.to_lowercase());

    candidates.retain(|candidate| ADDRESS_PATTERN.is_match(candidate));
    candidates.dedup();
    candidates
}

/// Like [`normalize`] but an empty candidate set is an [`Error::InvalidAddress`].
pub fn normalize_strict(address: &str) -> Result<Vec<String>> {
    let candidates = normalize(address);
    if candidates.is_empty() {
        return Err(Error::InvalidAddress(address.to_string()));
    }
    Ok(candidates)
}

/// First candidate, or the raw input unchanged when nothing normalizes.
pub fn first_candidate_or_raw(address: &str) -> String {
    normalize(address)
        .into_iter()
        .next()
        .unwrap_or_else(|| address.to_string())
}

fn checksummed(address: &str) -> Option<String> {
    Address::from_str(address)
        .ok()
        .map(|parsed| parsed.to_checksum(None))
}
