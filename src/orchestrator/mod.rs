//! Request orchestration.
//!
//! Turns a [`Plan`] into a fixed sequence of remote calls against an
//! authenticated [`Session`]:
//!
//! 1. validate the plan (no remote calls yet)
//! 2. authenticate once; failure ends the invocation
//! 3. terms, status, request, extend, cancel, each only when enabled
//!
//! Any failure is fatal for the invocation. Explicit extend and cancel issue
//! one call per zone and stop at the first failing zone.

mod attempts;
mod plan;

use std::fmt;

use crate::api::ZoneAccessApi;
use crate::error::WorkflowError;
use crate::report::Reporter;
use attempts::{ZoneAction, ZoneAttempts};

pub use plan::{Plan, Selection};

/// The workflows an invocation can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Terms,
    Status,
    Request,
    Extend,
    Cancel,
}

impl Workflow {
    /// Label for the "zones acted upon" summary line, if the workflow has one.
    pub fn summary_label(self) -> Option<&'static str> {
        match self {
            Self::Terms | Self::Status => None,
            Self::Request => Some("Requested"),
            Self::Extend => Some("Extended"),
            Self::Cancel => Some("Canceled"),
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Terms => "terms",
            Self::Status => "status",
            Self::Request => "request",
            Self::Extend => "extend",
            Self::Cancel => "cancel",
        })
    }
}

/// An authenticated client, created once per invocation.
pub struct Session<C> {
    client: C,
}

impl<C: ZoneAccessApi> Session<C> {
    /// Authenticate `client` and wrap it.
    pub async fn open(mut client: C) -> Result<Self, WorkflowError> {
        client.authenticate().await.map_err(WorkflowError::Auth)?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

/// Result of a request, extend or cancel workflow.
#[derive(Debug)]
pub struct Outcome {
    /// Zones reported as acted upon.
    ///
    /// For explicit extend and cancel this is the full input list even when
    /// iteration stopped at a failure.
    pub reported: Vec<String>,
    /// Zones a remote call was issued for, in order.
    pub attempted: Vec<String>,
    /// The failure that ended the workflow, if any.
    pub failure: Option<WorkflowError>,
}

impl Outcome {
    fn completed(zones: Vec<String>) -> Self {
        Self {
            reported: zones.clone(),
            attempted: zones,
            failure: None,
        }
    }

    fn failed(attempted: Vec<String>, failure: WorkflowError) -> Self {
        Self {
            reported: Vec::new(),
            attempted,
            failure: Some(failure),
        }
    }
}

/// Run every workflow enabled in `plan`, in order.
///
/// Stops at the first fatal condition and returns it; summaries are printed
/// only for workflows that completed.
pub async fn run<C: ZoneAccessApi>(
    plan: &Plan,
    client: C,
    reporter: &dyn Reporter,
) -> Result<(), WorkflowError> {
    plan.validate()?;
    let session = Session::open(client).await?;

    if plan.terms {
        show_terms(&session, reporter).await?;
    }
    if plan.status {
        show_status(&session, reporter).await?;
    }
    if let Some(selection) = &plan.request {
        let outcome = request_access(&session, selection, &plan.reason).await;
        finish(Workflow::Request, outcome, reporter)?;
    }
    if let Some(selection) = &plan.extend {
        let outcome = extend_access(&session, selection).await;
        finish(Workflow::Extend, outcome, reporter)?;
    }
    if let Some(zones) = &plan.cancel {
        let outcome = cancel_access(&session, zones).await;
        finish(Workflow::Cancel, outcome, reporter)?;
    }
    Ok(())
}

fn finish(
    workflow: Workflow,
    outcome: Outcome,
    reporter: &dyn Reporter,
) -> Result<(), WorkflowError> {
    if let Some(failure) = outcome.failure {
        return Err(failure);
    }
    if !outcome.reported.is_empty() {
        reporter.summary(workflow, &outcome.reported);
    }
    Ok(())
}

/// Print the current terms and conditions.
pub async fn show_terms<C: ZoneAccessApi>(
    session: &Session<C>,
    reporter: &dyn Reporter,
) -> Result<(), WorkflowError> {
    let terms = session
        .client()
        .terms()
        .await
        .map_err(|e| WorkflowError::remote(Workflow::Terms, e))?;
    tracing::debug!(version = %terms.version, "fetched terms");
    reporter.terms(&terms);
    Ok(())
}

/// Print one status line per zone.
pub async fn show_status<C: ZoneAccessApi>(
    session: &Session<C>,
    reporter: &dyn Reporter,
) -> Result<(), WorkflowError> {
    let statuses = session
        .client()
        .zone_status()
        .await
        .map_err(|e| WorkflowError::remote(Workflow::Status, e))?;
    for status in &statuses {
        reporter.zone_status(status);
    }
    Ok(())
}

/// Submit an access request.
///
/// Bulk mode reports the zones the registry client actually submitted;
/// explicit mode reports the literal input list.
pub async fn request_access<C: ZoneAccessApi>(
    session: &Session<C>,
    selection: &Selection,
    reason: &str,
) -> Outcome {
    if let Err(err) = plan::require_reason(reason) {
        return Outcome::failed(Vec::new(), err);
    }
    let client = session.client();
    match selection {
        Selection::AllExcept(exclusions) => {
            tracing::debug!(?exclusions, "requesting all zones");
            match client.request_all_except(reason, exclusions).await {
                Ok(requested) => Outcome::completed(requested),
                Err(e) => Outcome::failed(Vec::new(), WorkflowError::remote(Workflow::Request, e)),
            }
        }
        Selection::Explicit(zones) => {
            tracing::debug!(?zones, "requesting zones");
            match client.request_zones(zones, reason).await {
                Ok(()) => Outcome::completed(zones.clone()),
                Err(e) => Outcome::failed(zones.clone(), WorkflowError::remote(Workflow::Request, e)),
            }
        }
    }
}

/// Extend access, in bulk or zone by zone.
pub async fn extend_access<C: ZoneAccessApi>(
    session: &Session<C>,
    selection: &Selection,
) -> Outcome {
    match selection {
        Selection::AllExcept(exclusions) => {
            tracing::debug!(?exclusions, "requesting extension for all zones");
            match session.client().extend_all_except(exclusions).await {
                Ok(extended) => Outcome::completed(extended),
                Err(e) => Outcome::failed(Vec::new(), WorkflowError::remote(Workflow::Extend, e)),
            }
        }
        Selection::Explicit(zones) => each_zone(session, ZoneAction::Extend, zones).await,
    }
}

/// Cancel the outstanding request for each zone, in order.
pub async fn cancel_access<C: ZoneAccessApi>(session: &Session<C>, zones: &[String]) -> Outcome {
    each_zone(session, ZoneAction::Cancel, zones).await
}

async fn each_zone<C: ZoneAccessApi>(
    session: &Session<C>,
    action: ZoneAction,
    zones: &[String],
) -> Outcome {
    let (attempted, failure) = ZoneAttempts::new(session.client(), action, zones.to_vec())
        .until_first_failure()
        .await;
    // The reported set is the literal input, not the attempted prefix.
    Outcome {
        reported: zones.to_vec(),
        attempted,
        failure: failure.map(|(zone, source)| WorkflowError::Remote {
            workflow: action.workflow(),
            zone: Some(zone),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{RecordingReporter, StubApi};

    fn zones(items: &[&str]) -> Vec<String> {
        items.iter().map(|z| z.to_string()).collect()
    }

    fn everything() -> Plan {
        Plan {
            terms: true,
            status: true,
            request: Some(Selection::Explicit(zones(&["a"]))),
            extend: Some(Selection::Explicit(zones(&["b"]))),
            cancel: Some(zones(&["c"])),
            reason: "research".into(),
        }
    }

    #[tokio::test]
    async fn empty_reason_fails_before_any_remote_call() {
        let stub = StubApi::new();
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        let plan = Plan {
            request: Some(Selection::AllExcept(Vec::new())),
            ..Plan::default()
        };
        let err = run(&plan, stub, &reporter).await.expect_err("must fail");
        assert!(matches!(err, WorkflowError::Precondition(_)), "got: {err}");
        assert!(log.is_empty(), "calls: {:?}", log.calls());
        assert!(reporter.lines().is_empty());
    }

    #[tokio::test]
    async fn request_access_checks_reason_itself() {
        let stub = StubApi::new();
        let log = stub.log.clone();
        let session = Session::open(stub).await.unwrap();
        let outcome =
            request_access(&session, &Selection::Explicit(zones(&["a"])), "").await;
        assert!(matches!(
            outcome.failure,
            Some(WorkflowError::Precondition(_))
        ));
        assert_eq!(log.calls(), vec!["authenticate"]);
    }

    #[tokio::test]
    async fn auth_failure_blocks_every_workflow() {
        let stub = StubApi::new().failing("authenticate");
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        let err = run(&everything(), stub, &reporter).await.expect_err("auth fails");
        assert!(matches!(err, WorkflowError::Auth(_)), "got: {err}");
        assert_eq!(log.calls(), vec!["authenticate"]);
        assert!(reporter.lines().is_empty());
    }

    #[tokio::test]
    async fn workflows_run_in_fixed_order() {
        let stub = StubApi::new();
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        run(&everything(), stub, &reporter).await.expect("success");
        assert_eq!(
            log.calls(),
            vec![
                "authenticate",
                "terms",
                "zone_status",
                "request_zones a research",
                "extend_zone b",
                "outstanding_request_id c",
                "cancel_request id-c c",
            ]
        );
        assert_eq!(
            reporter.lines(),
            vec![
                "Terms and Conditions (version 1):\nstub terms",
                "a\tavailable",
                "b\tapproved",
                "c\texpired",
                "Requested: [a]",
                "Extended: [b]",
                "Canceled: [c]",
            ]
        );
    }

    #[tokio::test]
    async fn explicit_extend_reports_full_list_after_stopping() {
        let stub = StubApi::new().failing("extend_zone b");
        let log = stub.log.clone();
        let session = Session::open(stub).await.unwrap();
        let outcome =
            extend_access(&session, &Selection::Explicit(zones(&["a", "b", "c"]))).await;
        assert_eq!(outcome.reported, zones(&["a", "b", "c"]));
        assert_eq!(outcome.attempted, zones(&["a", "b"]));
        assert!(matches!(
            outcome.failure,
            Some(WorkflowError::Remote { workflow: Workflow::Extend, zone: Some(ref z), .. }) if z == "b"
        ));
        assert_eq!(
            log.calls(),
            vec!["authenticate", "extend_zone a", "extend_zone b"]
        );
    }

    #[tokio::test]
    async fn explicit_extend_failure_is_fatal_without_summary() {
        let stub = StubApi::new().failing("extend_zone b");
        let reporter = RecordingReporter::default();
        let plan = Plan {
            extend: Some(Selection::Explicit(zones(&["a", "b", "c"]))),
            cancel: Some(zones(&["a"])),
            ..Plan::default()
        };
        let log = stub.log.clone();
        let err = run(&plan, stub, &reporter).await.expect_err("extend fails");
        assert_eq!(err.to_string(), "extend b: invalid response: scripted failure: extend_zone b");
        assert!(reporter.lines().is_empty());
        assert!(!log.calls().iter().any(|c| c.starts_with("outstanding_request_id")));
    }

    #[tokio::test]
    async fn cancel_lookup_failure_stops_before_cancel_call() {
        let stub = StubApi::new().failing("outstanding_request_id x");
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        let plan = Plan {
            cancel: Some(zones(&["x", "y"])),
            ..Plan::default()
        };
        let err = run(&plan, stub, &reporter).await.expect_err("lookup fails");
        assert!(
            matches!(err, WorkflowError::Remote { workflow: Workflow::Cancel, zone: Some(ref z), .. } if z == "x"),
            "got: {err}"
        );
        assert_eq!(log.calls(), vec!["authenticate", "outstanding_request_id x"]);
    }

    #[tokio::test]
    async fn bulk_request_reports_what_the_client_submitted() {
        let stub = StubApi::new();
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        let plan = Plan {
            request: Some(Selection::AllExcept(zones(&["b", "zz"]))),
            reason: "research".into(),
            ..Plan::default()
        };
        run(&plan, stub, &reporter).await.expect("success");
        assert_eq!(log.calls(), vec!["authenticate", "request_all_except research"]);
        assert_eq!(reporter.lines(), vec!["Requested: [a c]"]);
    }

    #[tokio::test]
    async fn bulk_extend_with_nothing_extended_prints_no_summary() {
        let mut stub = StubApi::new();
        stub.universe.clear();
        let reporter = RecordingReporter::default();
        let plan = Plan {
            extend: Some(Selection::AllExcept(Vec::new())),
            ..Plan::default()
        };
        run(&plan, stub, &reporter).await.expect("success");
        assert!(reporter.lines().is_empty());
    }

    #[tokio::test]
    async fn explicit_request_failure_is_fatal() {
        let stub = StubApi::new().failing("request_zones a,b research");
        let reporter = RecordingReporter::default();
        let plan = Plan {
            request: Some(Selection::Explicit(zones(&["a", "b"]))),
            extend: Some(Selection::AllExcept(Vec::new())),
            reason: "research".into(),
            ..Plan::default()
        };
        let log = stub.log.clone();
        let err = run(&plan, stub, &reporter).await.expect_err("request fails");
        assert!(matches!(err, WorkflowError::Remote { workflow: Workflow::Request, .. }));
        assert!(!log.calls().contains(&"extend_all_except".to_string()));
    }

    #[tokio::test]
    async fn status_failure_stops_later_workflows() {
        let stub = StubApi::new().failing("zone_status");
        let log = stub.log.clone();
        let reporter = RecordingReporter::default();
        let err = run(&everything(), stub, &reporter).await.expect_err("status fails");
        assert_eq!(err.to_string(), "status: invalid response: scripted failure: zone_status");
        assert_eq!(log.calls(), vec!["authenticate", "terms", "zone_status"]);
        assert_eq!(reporter.lines().len(), 1);
    }
}
