//! CLI argument parsing via clap.

use clap::Parser;
use czds_request::build_info;
use czds_request::orchestrator::{Plan, Selection};
use czds_request::zones::resolve_explicit;

/// Request, extend and cancel access to zone files in ICANN CZDS.
#[derive(Debug, Parser)]
#[command(
    name = "czds-request",
    version = build_info::VERSION,
    long_version = build_info::LONG_VERSION
)]
pub struct Args {
    /// Path to config file (default: ./czds.toml or ~/.config/czds/czds.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Username to authenticate with.
    #[arg(long = "username")]
    pub username: Option<String>,

    /// Password to authenticate with.
    #[arg(long = "password")]
    pub password: Option<String>,

    /// Password source (default: prompt on tty; other options: cmd:command,
    /// env:var, file:path, keychain:name, lpass:name, op:name).
    #[arg(long = "passin")]
    pub passin: Option<String>,

    /// Enable verbose logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Reason to request zone access.
    #[arg(long = "reason", default_value = "")]
    pub reason: String,

    /// Print CZDS Terms & Conditions.
    #[arg(long = "terms")]
    pub terms: bool,

    /// Print status of zones.
    #[arg(long = "status")]
    pub status: bool,

    /// Comma separated list of zones to request.
    #[arg(long = "request", value_name = "ZONES")]
    pub request: Option<String>,

    /// Request all available zones.
    #[arg(long = "request-all")]
    pub request_all: bool,

    /// Comma separated list of zones to request extensions for.
    #[arg(long = "extend", value_name = "ZONES")]
    pub extend: Option<String>,

    /// Extend all possible zones.
    #[arg(long = "extend-all")]
    pub extend_all: bool,

    /// Comma separated list of zones to exclude from --request-all or --extend-all.
    #[arg(long = "exclude", value_name = "ZONES", default_value = "")]
    pub exclude: String,

    /// Comma separated list of zones to cancel outstanding requests for.
    #[arg(long = "cancel", value_name = "ZONES")]
    pub cancel: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Translate flags into the workflows to run.
    ///
    /// `--request-all`/`--extend-all` win over their list forms. Empty list
    /// flags are treated as absent.
    pub fn plan(&self) -> Plan {
        let exclusions = resolve_explicit(&self.exclude);
        let selection = |all: bool, list: &Option<String>| {
            if all {
                Some(Selection::AllExcept(exclusions.clone()))
            } else {
                non_empty(list).map(|raw| Selection::Explicit(resolve_explicit(raw)))
            }
        };
        Plan {
            terms: self.terms,
            status: self.status,
            request: selection(self.request_all, &self.request),
            extend: selection(self.extend_all, &self.extend),
            cancel: non_empty(&self.cancel).map(resolve_explicit),
            reason: self.reason.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.is_empty())
}
