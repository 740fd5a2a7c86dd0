//! `CZDS_*` environment overrides.

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(username) = non_empty(env_lookup, "CZDS_USERNAME") {
        config.account.username = username;
    }
    if let Some(passin) = env_lookup("CZDS_PASSIN") {
        // An empty value is meaningful: it selects the terminal prompt.
        config.account.passin = Some(passin);
    }
    if let Some(url) = non_empty(env_lookup, "CZDS_AUTH_URL") {
        config.api.auth_url = url;
    }
    if let Some(url) = non_empty(env_lookup, "CZDS_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(timeout) = non_empty(env_lookup, "CZDS_TIMEOUT_SECS") {
        let parsed = timeout.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid CZDS_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        // Clamp to at least 1 second; zero would disable the timeout.
        config.api.timeout_secs = parsed.max(1);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name).filter(|value| !value.trim().is_empty())
}
