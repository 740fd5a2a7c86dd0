//! Operator intents for one invocation.

use crate::error::WorkflowError;

/// Which zones a request or extension targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every eligible zone except these identifiers (bulk mode).
    AllExcept(Vec<String>),
    /// This literal list, used verbatim (explicit mode).
    Explicit(Vec<String>),
}

/// Everything the operator asked for. Enabled workflows always run in the
/// order terms, status, request, extend, cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub terms: bool,
    pub status: bool,
    pub request: Option<Selection>,
    pub extend: Option<Selection>,
    /// Zones whose outstanding requests are canceled. Explicit only.
    pub cancel: Option<Vec<String>>,
    /// Reason text attached to access requests.
    pub reason: String,
}

impl Plan {
    /// True when no workflow is enabled.
    pub fn is_empty(&self) -> bool {
        !self.terms
            && !self.status
            && self.request.is_none()
            && self.extend.is_none()
            && self.cancel.is_none()
    }

    /// Check preconditions that must hold before any remote call.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.is_empty() {
            return Err(WorkflowError::Precondition("nothing to do".to_string()));
        }
        if self.request.is_some() {
            require_reason(&self.reason)?;
        }
        Ok(())
    }
}

pub(super) fn require_reason(reason: &str) -> Result<(), WorkflowError> {
    if reason.is_empty() {
        return Err(WorkflowError::Precondition(
            "a reason is required to request zones".to_string(),
        ));
    }
    Ok(())
}
