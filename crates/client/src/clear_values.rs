// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::{Error, Result};
use crate::handle::Handle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Decryption results as returned by a backend. Older backends return a list in request
/// order, newer ones a map keyed by handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecryptResponse {
    Ordered(Vec<Value>),
    Keyed(HashMap<String, Value>),
}

/// Rebuild the results in the order of `handles`, whatever shape the backend used.
pub fn order_results(handles: &[Handle], response: DecryptResponse) -> Result<Vec<u64>> {
    match response {
        DecryptResponse::Ordered(values) => {
            if values.len() != handles.len() {
                return Err(Error::ResultLengthMismatch {
                    expected: handles.len(),
                    actual: values.len(),
                });
            }
            values.iter().map(to_u64).collect()
        }
        DecryptResponse::Keyed(values) => handles
            .iter()
            .map(|handle| {
                let value = values
                    .get(handle.as_str())
                    .or_else(|| values.get(&handle.string_form()))
                    .ok_or_else(|| Error::MissingClearValue(handle.to_string()))?;
                to_u64(value)
            })
            .collect(),
    }
}

/// Accepts integers, decimal or `0x` hex strings and booleans
fn to_u64(value: &Value) -> Result<u64> {
    let invalid = || Error::InvalidClearValue(value.to_string());
    match value {
        Value::Number(number) => number.as_u64().ok_or_else(invalid),
        Value::Bool(flag) => Ok(u64::from(*flag)),
        Value::String(text) => {
            let text = text.trim();
            match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16).map_err(|_| invalid()),
                None => text.parse::<u64>().map_err(|_| invalid()),
            }
        }
        _ => Err(invalid()),
    }
}
