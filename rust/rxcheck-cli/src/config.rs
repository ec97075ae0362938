//! Configuration file parsing for `rxcheck.toml`.
//!
//! Searches the current directory then its ancestors. A missing file means
//! default options.

use rxcheck_checker::CheckOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "rxcheck.toml";

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct RxcheckConfig {
    #[serde(default)]
    pub check: CheckOptions,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct LogSection {
    /// `tracing` filter directives, e.g. `rxcheck=debug`. `RXCHECK_LOG` wins.
    pub filter: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl RxcheckConfig {
    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Find `rxcheck.toml` in `start` or the nearest ancestor and load it.
    /// Returns the default config, without a path, when there is none.
    pub fn discover(start: &Path) -> Result<(Option<PathBuf>, Self), ConfigError> {
        match find_config(start) {
            Some(path) => {
                let cfg = Self::load_from(&path)?;
                Ok((Some(path), cfg))
            }
            None => Ok((None, Self::default())),
        }
    }

    pub fn default_template() -> &'static str {
        r#"# rxcheck configuration

[check]
# "error" reports same-type members with different values composed from
# different enum classes; "first_wins" keeps the one composed first.
value_conflict = "error"
# Trust the non_escaping flag on allocation sites.
trust_declared_escapes = true
parallel = true

[log]
# filter = "rxcheck=debug"
"#
    }
}

fn find_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
