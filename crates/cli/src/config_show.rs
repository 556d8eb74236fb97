// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use veil_config::AppConfig;

pub fn execute(config: &AppConfig) -> Result<()> {
    println!("preset: {}", config.preset());
    print!("{}", serde_yaml::to_string(config.network())?);
    Ok(())
}
