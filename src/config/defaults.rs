//! Default configuration constants.

/// ICANN account authentication endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://account-api.icann.org/api/authenticate";
/// CZDS API base URL.
pub const DEFAULT_BASE_URL: &str = "https://czds-api.icann.org";
/// Per-request HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// File name looked up locally and under the global config directory.
pub(super) const CONFIG_FILE_NAME: &str = "czds.toml";
/// Directory under the config root holding the global config file.
pub(super) const CONFIG_DIR_NAME: &str = "czds";
