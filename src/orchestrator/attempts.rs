//! Sequential per-zone calls that stop at the first failure.

use crate::api::ZoneAccessApi;
use crate::error::ApiError;

use super::Workflow;

/// Remote operation applied to one zone in explicit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoneAction {
    Extend,
    /// Looks up the zone's outstanding request id, then cancels it. A failed
    /// lookup counts as a failed cancel.
    Cancel,
}

impl ZoneAction {
    pub(crate) fn workflow(self) -> Workflow {
        match self {
            Self::Extend => Workflow::Extend,
            Self::Cancel => Workflow::Cancel,
        }
    }

    async fn apply<C: ZoneAccessApi>(self, client: &C, zone: &str) -> Result<(), ApiError> {
        match self {
            Self::Extend => client.extend_zone(zone).await,
            Self::Cancel => {
                let request_id = client.outstanding_request_id(zone).await?;
                client.cancel_request(&request_id, zone).await
            }
        }
    }
}

/// Lazy, single-pass sequence of `(zone, result)` pairs.
///
/// A zone's remote call is issued only when `next` is awaited, so dropping
/// the sequence leaves the remaining zones unattempted.
pub(crate) struct ZoneAttempts<'a, C> {
    client: &'a C,
    action: ZoneAction,
    pending: std::vec::IntoIter<String>,
}

impl<'a, C: ZoneAccessApi> ZoneAttempts<'a, C> {
    pub(crate) fn new(client: &'a C, action: ZoneAction, zones: Vec<String>) -> Self {
        Self {
            client,
            action,
            pending: zones.into_iter(),
        }
    }

    pub(crate) async fn next(&mut self) -> Option<(String, Result<(), ApiError>)> {
        let zone = self.pending.next()?;
        tracing::debug!(%zone, workflow = %self.action.workflow(), "calling registry");
        let result = self.action.apply(self.client, &zone).await;
        Some((zone, result))
    }

    /// Consume attempts until one fails. Returns the zones attempted, in
    /// order, and the failing zone with its error.
    pub(crate) async fn until_first_failure(
        mut self,
    ) -> (Vec<String>, Option<(String, ApiError)>) {
        let mut attempted = Vec::new();
        while let Some((zone, result)) = self.next().await {
            attempted.push(zone.clone());
            if let Err(err) = result {
                return (attempted, Some((zone, err)));
            }
        }
        (attempted, None)
    }
}
