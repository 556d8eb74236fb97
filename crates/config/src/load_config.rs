// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

/// Where the configuration file was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Given on the command line. Must exist.
    Explicit(PathBuf),
    /// Nearest config file in the working directory or one of its parents
    Discovered(PathBuf),
    /// Fallback in the OS config dir. May not exist.
    Default(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path)
            | ConfigLocation::Discovered(path)
            | ConfigLocation::Default(path) => path,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, ConfigLocation::Explicit(_))
    }
}

/// Lookup of a single named config file
#[derive(Debug, Clone, Copy)]
pub struct ConfigSearch<'a> {
    pub cwd: &'a Path,
    pub config_dir: &'a Path,
    pub file_name: &'a str,
}

impl ConfigSearch<'_> {
    /// Explicit cli path (relative to cwd), then the nearest file above cwd, then the config dir
    pub fn locate(&self, cli_file: Option<&Path>) -> ConfigLocation {
        if let Some(cli_file) = cli_file {
            if cli_file.is_absolute() {
                return ConfigLocation::Explicit(cli_file.to_path_buf());
            }
            return ConfigLocation::Explicit(clean(self.cwd.join(cli_file)));
        }

        match nearest_ancestor_file(self.cwd, self.file_name) {
            Some(found) => ConfigLocation::Discovered(found),
            None => ConfigLocation::Default(clean(self.config_dir.join(self.file_name))),
        }
    }
}

fn nearest_ancestor_file(start: &Path, file_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}
