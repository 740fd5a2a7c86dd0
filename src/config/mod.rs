//! Configuration loading.
//!
//! Precedence, highest first: command-line flags (applied by the binary),
//! `CZDS_*` environment variables, the config file, built-in defaults.
//! File discovery lives in `sources`, env handling in `env`.

mod defaults;
mod env;
mod sources;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub use defaults::{DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use sources::config_root_dir;

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub account: AccountConfig,
    pub api: ApiConfig,
}

/// Account identity and where its password comes from.
///
/// Only a password *source* can be configured; literal passwords are
/// accepted on the command line alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountConfig {
    pub username: String,
    pub passin: Option<String>,
}

/// Registry endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub auth_url: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// On-disk `czds.toml` shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    account: AccountConfig,
    api: ApiConfig,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(crate) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = sources::read_config_text(path_override, &read_file, &config_root)?;
    tracing::debug!(source = %source, "loaded configuration");
    let parsed: FileConfig = toml::from_str(&text)?;
    let mut config = Config {
        account: parsed.account,
        api: parsed.api,
    };
    env::apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    for (key, url) in [
        ("api.auth_url", &config.api.auth_url),
        ("api.base_url", &config.api.base_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "{key} `{url}` must be an http(s) URL"
            )));
        }
    }
    Ok(())
}
