//! Password source resolution.
//!
//! A password source is either a literal `--password` value or a `--passin`
//! descriptor of the form `kind:argument`. An empty descriptor means "ask on
//! the terminal".

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::CredentialError;

/// Plaintext password whose `Debug` output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Where the operator's password comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Value passed directly on the command line.
    Literal(Password),
    /// Interactive, non-echoing terminal prompt.
    Prompt,
    /// Output of `sh -c <command>`.
    Command(String),
    /// Value of an environment variable.
    Environment(String),
    /// First line of a file.
    File(PathBuf),
    /// macOS keychain generic password by service name.
    Keychain(String),
    /// LastPass entry, read through the `lpass` CLI.
    LastPass(String),
    /// 1Password item or `op://` secret reference, read through the `op` CLI.
    OnePassword(String),
}

impl fmt::Debug for PasswordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordSource({self})")
    }
}

impl fmt::Display for PasswordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("--password"),
            Self::Prompt => f.write_str("prompt"),
            // Command lines can carry the secret itself.
            Self::Command(_) => f.write_str("cmd"),
            Self::Environment(var) => write!(f, "env:{var}"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Keychain(name) => write!(f, "keychain:{name}"),
            Self::LastPass(name) => write!(f, "lpass:{name}"),
            Self::OnePassword(name) => write!(f, "op:{name}"),
        }
    }
}

impl PasswordSource {
    /// Short name of the source, without its argument.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Prompt => "prompt",
            Self::Command(_) => "cmd",
            Self::Environment(_) => "env",
            Self::File(_) => "file",
            Self::Keychain(_) => "keychain",
            Self::LastPass(_) => "lpass",
            Self::OnePassword(_) => "op",
        }
    }

    /// Parse a `--passin` descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, CredentialError> {
        if descriptor.is_empty() {
            return Ok(Self::Prompt);
        }
        let Some((kind, arg)) = descriptor.split_once(':') else {
            return Err(CredentialError::UnknownSource(descriptor.to_string()));
        };
        let arg = arg.to_string();
        match kind {
            "cmd" => Ok(Self::Command(arg)),
            "env" => Ok(Self::Environment(arg)),
            "file" => Ok(Self::File(PathBuf::from(arg))),
            "keychain" => Ok(Self::Keychain(arg)),
            "lpass" => Ok(Self::LastPass(arg)),
            "op" => Ok(Self::OnePassword(arg)),
            _ => Err(CredentialError::UnknownSource(descriptor.to_string())),
        }
    }

    /// Pick the source from CLI/config inputs: a literal password wins over
    /// a descriptor, and no input at all means prompting.
    pub fn select(
        password: Option<&str>,
        passin: Option<&str>,
    ) -> Result<Self, CredentialError> {
        match (password.filter(|p| !p.is_empty()), passin) {
            (Some(literal), _) => Ok(Self::Literal(Password::new(literal))),
            (None, Some(descriptor)) => Self::parse(descriptor),
            (None, None) => Ok(Self::Prompt),
        }
    }

    /// Resolve against the process environment and terminal.
    pub fn resolve(&self) -> Result<Password, CredentialError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with<FEnv>(&self, env_lookup: FEnv) -> Result<Password, CredentialError>
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        tracing::debug!(source = self.kind(), "resolving password");
        let value = match self {
            Self::Literal(password) => password.expose().to_string(),
            Self::Prompt => rpassword::prompt_password("Password: ")
                .map_err(|e| CredentialError::Io(self.to_string(), e))?,
            Self::Command(cmd) => run_helper(self, "sh", &["-c", cmd.as_str()])?,
            Self::Environment(var) => env_lookup(var.as_str()).unwrap_or_default(),
            Self::File(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| CredentialError::Io(self.to_string(), e))?;
                text.lines().next().unwrap_or_default().to_string()
            }
            Self::Keychain(name) => run_helper(
                self,
                "security",
                &["find-generic-password", "-w", "-s", name.as_str()],
            )?,
            Self::LastPass(name) => {
                run_helper(self, "lpass", &["show", "--password", name.as_str()])?
            }
            Self::OnePassword(name) if name.starts_with("op://") => {
                run_helper(self, "op", &["read", name.as_str()])?
            }
            Self::OnePassword(name) => run_helper(
                self,
                "op",
                &[
                    "item",
                    "get",
                    name.as_str(),
                    "--fields",
                    "label=password",
                    "--reveal",
                ],
            )?,
        };
        if value.is_empty() {
            return Err(CredentialError::Empty(self.to_string()));
        }
        Ok(Password(value))
    }
}

/// Run a secret helper and return its stdout minus the trailing newline.
fn run_helper(
    source: &PasswordSource,
    program: &str,
    args: &[&str],
) -> Result<String, CredentialError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CredentialError::Io(source.to_string(), e))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        };
        return Err(CredentialError::Command(source.to_string(), detail));
    }
    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}
