// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::ConfigSearch;
use crate::network::{NetworkConfig, NetworkPreset};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env, fmt,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "veil.config.yaml";
pub const ENV_PREFIX: &str = "VEIL_";

/// The config actually used throughout the app
#[derive(Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Preset the network section was built on
    #[serde(default)]
    preset: NetworkPreset,
    /// Network record handed to every session
    network: NetworkConfig,
    /// Private key for the local development wallet
    #[serde(default)]
    private_key: Option<String>,
    #[serde(skip)]
    config_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_preset(preset: NetworkPreset) -> Self {
        Self {
            preset,
            network: preset.network(),
            private_key: None,
            config_file: None,
        }
    }

    pub fn preset(&self) -> NetworkPreset {
        self.preset
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("preset", &self.preset)
            .field("network", &self.network)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("config_file", &self.config_file)
            .finish()
    }
}

#[derive(Deserialize)]
struct PresetSelection {
    #[serde(default)]
    preset: NetworkPreset,
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("veil"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Load the configuration. Layers, lowest first: preset defaults, yaml file, `VEIL_*` env
/// vars (`__` separates nesting, eg. `VEIL_NETWORK__CHAIN_ID`), then the preset override.
pub fn load_config(
    cli_file: Option<String>,
    preset_override: Option<NetworkPreset>,
) -> Result<AppConfig> {
    let cwd = env::current_dir()?;
    let config_dir = OsDirs::config_dir();
    let location = ConfigSearch {
        cwd: &cwd,
        config_dir: &config_dir,
        file_name: DEFAULT_CONFIG_NAME,
    }
    .locate(cli_file.as_deref().map(Path::new));

    if location.is_explicit() && !location.path().exists() {
        bail!(
            "Configuration file not found: {}",
            location.path().display()
        );
    }
    debug!("Configuration location: {:?}", location);
    let resolved_config_path = location.path().to_path_buf();

    let sources = Figment::new()
        .merge(Yaml::file(&resolved_config_path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let preset = match preset_override {
        Some(preset) => preset,
        None => {
            sources
                .extract::<PresetSelection>()
                .context("Could not read the network preset")?
                .preset
        }
    };
    debug!("Using network preset '{}'", preset);

    let mut config: AppConfig = Figment::from(Serialized::defaults(AppConfig::from_preset(preset)))
        .merge(sources)
        .merge(Serialized::default("preset", preset))
        .extract()
        .context("Could not parse configuration")?;

    if resolved_config_path.exists() {
        config.config_file = Some(resolved_config_path);
    }

    Ok(config)
}
