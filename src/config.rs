use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::recording::RewriteOptions;

/// Name of the optional config file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".fixture-updater.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration loaded from .fixture-updater.toml.
///
/// All fields are optional. The fixtures root and the SDK version are not
/// part of the file; they only come from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Naming patterns for bundles and fixtures
    #[serde(default)]
    pub patterns: PatternConfig,

    /// How recorded requests are rewritten
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    /// Glob matched against bundle directory names
    #[serde(default = "default_bundle_pattern")]
    pub bundle: String,

    /// Glob matched against fixture file names inside a bundle
    #[serde(default = "default_fixture_pattern")]
    pub fixture: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            bundle: default_bundle_pattern(),
            fixture: default_fixture_pattern(),
        }
    }
}

fn default_bundle_pattern() -> String {
    "*.bundle".to_string()
}

fn default_fixture_pattern() -> String {
    "*.plist".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteConfig {
    /// Query parameter carrying the SDK version
    #[serde(default = "default_param")]
    pub param: String,

    /// Store the rewritten URL back into `request['URL']`
    #[serde(default = "default_true")]
    pub apply_rewritten_url: bool,

    /// Keep only `currentRequest`/`originalRequest` in a request bundle
    #[serde(default)]
    pub narrow_requests: bool,

    /// Drop the whole query string of URLs that lack the parameter
    #[serde(default)]
    pub strip_query_without_param: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            param: default_param(),
            apply_rewritten_url: true,
            narrow_requests: false,
            strip_query_without_param: false,
        }
    }
}

fn default_param() -> String {
    "pnsdk".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from an explicit path, or from .fixture-updater.toml
    /// in the current directory. Returns default config if neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rewrite options from the `[rewrite]` table. `legacy` overrides every
    /// boolean with the original script's behaviour; `param` is kept.
    pub fn rewrite_options(&self, legacy: bool) -> RewriteOptions {
        if legacy {
            return RewriteOptions {
                param: self.rewrite.param.clone(),
                ..RewriteOptions::legacy()
            };
        }
        RewriteOptions {
            param: self.rewrite.param.clone(),
            apply_rewritten_url: self.rewrite.apply_rewritten_url,
            narrow_requests: self.rewrite.narrow_requests,
            strip_query_without_param: self.rewrite.strip_query_without_param,
        }
    }
}
