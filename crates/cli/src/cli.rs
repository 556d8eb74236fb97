// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::ensure_hex_zeroizing;
use crate::helpers::telemetry::setup_simple_tracing;
use crate::{address, config_show, roundtrip};
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, instrument, Level};
use veil_config::{load_config, AppConfig, NetworkPreset};
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(about = "Encrypt values for confidential contracts and decrypt their results", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Network preset (sepolia or local). Overrides the preset in the config file
    #[arg(long, global = true)]
    preset: Option<NetworkPreset>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `veil -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());

        let config = self.load_config()?;
        info!("Config loaded from: {:?}", config.config_file());

        match self.command {
            Commands::Config => config_show::execute(&config)?,
            Commands::Address { address } => address::execute(&address)?,
            Commands::Roundtrip {
                value,
                contract,
                private_key,
            } => roundtrip::execute(&config, &contract, value, private_key).await?,
        }

        Ok(())
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        load_config(self.config.clone(), self.preset)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved network configuration
    Config,

    /// Print the accepted encodings of an address
    Address {
        /// The address to normalize
        address: String,
    },

    /// Encrypt a value against the in-process dev backend and decrypt it again
    Roundtrip {
        /// The value to encrypt
        #[arg(long)]
        value: u64,

        /// Contract the value is encrypted for
        #[arg(long, default_value = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
        contract: String,

        /// Wallet private key. Falls back to the configured key, then to a random one
        #[arg(long = "private-key", value_parser = ensure_hex_zeroizing)]
        private_key: Option<Zeroizing<String>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_maps_to_level() {
        let cli = Cli::parse_from(["veil", "config"]);
        assert_eq!(cli.log_level(), Level::WARN);

        let cli = Cli::parse_from(["veil", "-vv", "config"]);
        assert_eq!(cli.log_level(), Level::DEBUG);

        let cli = Cli::parse_from(["veil", "config", "-q"]);
        assert_eq!(cli.log_level(), Level::ERROR);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["veil", "-v", "-q", "config"]).is_err());
    }

    #[test]
    fn test_parse_roundtrip() {
        let cli = Cli::parse_from(["veil", "--preset", "local", "roundtrip", "--value", "42"]);
        assert_eq!(cli.preset, Some(NetworkPreset::Local));
        match cli.command {
            Commands::Roundtrip {
                value, private_key, ..
            } => {
                assert_eq!(value, 42);
                assert!(private_key.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_private_key_must_be_hex() {
        let parsed = Cli::try_parse_from([
            "veil",
            "roundtrip",
            "--value",
            "1",
            "--private-key",
            "not-a-key",
        ]);
        assert!(parsed.is_err());
    }
}
