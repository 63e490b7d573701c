//! Configuration file handling.
//!
//! Settings come from `profdiff.toml`; command-line flags override them.

use std::path::Path;

use anyhow::{Context, Result};
use profdiff_core::aggregate::AggregateOptions;
use profdiff_core::views::DisplayOptions;
use serde::{Deserialize, Serialize};

use crate::cli::Args;

pub const DEFAULT_PATH: &str = "profdiff.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How captures are folded into statistics.
    #[serde(default)]
    pub aggregate: AggregateOptions,

    /// Table and chart settings.
    #[serde(default)]
    pub display: DisplayOptions,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// `path` when given, else `./profdiff.toml` when it exists, else
    /// defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides. Only flags the user actually passed
    /// replace file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(sort) = args.sort {
            self.display.sort = sort;
        }
        if let Some(limit) = args.limit {
            self.display.row_limit = limit;
        }
        if args.paths {
            self.display.show_paths = true;
        }
    }

    /// The default configuration as commented TOML.
    pub fn default_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .context("failed to serialize default config")?;
        Ok(format!(
            "# profdiff configuration\n\
             #\n\
             # display.row_limit = 0 shows every row.\n\
             # display.sort is one of renders, duration, improvement, name.\n\n\
             {body}"
        ))
    }
}
