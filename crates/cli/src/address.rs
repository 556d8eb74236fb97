// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use veil_client::normalize_strict;

pub fn execute(address: &str) -> Result<()> {
    for candidate in normalize_strict(address)? {
        println!("{}", candidate);
    }
    Ok(())
}
