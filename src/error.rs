//! Unified error types for the request tool.

use std::fmt;

use crate::orchestrator::Workflow;

// ---------------------------------------------------------------------------
// CredentialError
// ---------------------------------------------------------------------------

/// The operator's password could not be obtained from its source.
#[derive(Debug)]
pub enum CredentialError {
    /// The `--passin` descriptor does not name a known source.
    UnknownSource(String),
    /// The source was reachable but produced no password.
    Empty(String),
    /// Reading a file or the terminal failed.
    Io(String, std::io::Error),
    /// An external secret helper exited unsuccessfully.
    Command(String, String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSource(source) => write!(f, "unknown password source `{source}`"),
            Self::Empty(source) => write!(f, "password source {source} returned nothing"),
            Self::Io(source, err) => write!(f, "password source {source}: {err}"),
            Self::Command(source, detail) => {
                write!(f, "password source {source} failed: {detail}")
            }
        }
    }
}

impl std::error::Error for CredentialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the registry API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
    },
    /// The API answered with a body we could not make sense of.
    InvalidResponse(String),
    /// A call that needs a bearer token was made before authenticating.
    NotAuthenticated,
    /// No request on record for the zone, so nothing to extend or cancel.
    NoOutstandingRequest(String),
}

impl ApiError {
    /// Build a status error.
    pub fn status(code: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body,
            retry_after_secs,
        }
    }

    /// HTTP status code, when the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Server-provided retry hint, when present.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::NoOutstandingRequest(zone) => write!(f, "no request found for zone {zone}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// WorkflowError (top level)
// ---------------------------------------------------------------------------

/// A fatal condition that ends the invocation.
#[derive(Debug)]
pub enum WorkflowError {
    /// Authentication failed; no workflow ran.
    Auth(ApiError),
    /// A remote call inside a workflow failed.
    Remote {
        workflow: Workflow,
        /// Zone being processed when the call failed, for per-zone calls.
        zone: Option<String>,
        source: ApiError,
    },
    /// Required input was missing; raised before any remote call.
    Precondition(String),
}

impl WorkflowError {
    pub(crate) fn remote(workflow: Workflow, source: ApiError) -> Self {
        Self::Remote {
            workflow,
            zone: None,
            source,
        }
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(e) => write!(f, "authentication failed: {e}"),
            Self::Remote {
                workflow,
                zone: Some(zone),
                source,
            } => write!(f, "{workflow} {zone}: {source}"),
            Self::Remote {
                workflow,
                zone: None,
                source,
            } => write!(f, "{workflow}: {source}"),
            Self::Precondition(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Auth(e) | Self::Remote { source: e, .. } => Some(e),
            Self::Precondition(_) => None,
        }
    }
}
