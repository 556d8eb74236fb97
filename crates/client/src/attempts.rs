// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::backend::CallShape;

/// One failed encryption attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub contract_address: String,
    pub user_address: String,
    pub shape: CallShape,
    pub error: String,
}

/// Ordered history of the encryption variant matrix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptLog(Vec<Attempt>);

impl AttemptLog {
    pub fn record(
        &mut self,
        contract_address: &str,
        user_address: &str,
        shape: CallShape,
        error: impl ToString,
    ) {
        self.0.push(Attempt {
            contract_address: contract_address.to_string(),
            user_address: user_address.to_string(),
            shape,
            error: error.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.0.last()
    }
}
