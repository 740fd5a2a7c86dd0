//! Shared test fixtures: a scripted `ZoneAccessApi`, a recording reporter,
//! and a temp-dir helper.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::api::{AccessStatus, Terms, ZoneAccessApi, ZoneStatus};
use crate::error::ApiError;
use crate::orchestrator::Workflow;
use crate::report::{status_line, summary_line, terms_block, Reporter};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scratch directory removed on drop.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    pub fn new(label: &str) -> Self {
        let seq = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!("czds-{label}-{stamp}-{seq}"));
        fs::create_dir_all(&path).expect("create scratch dir");
        Self { path }
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write `content` under the scratch dir, creating parents.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let target = self.child(relative);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).expect("create fixture parent");
        }
        fs::write(&target, content).expect("write fixture");
        target
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Shared log of remote calls, readable after the stub was moved into a
/// session.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, call: String) {
        self.0.lock().expect("call log poisoned").push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().expect("call log poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// Scripted `ZoneAccessApi`.
///
/// Every call is logged as `name` or `name arg...`. A call whose log entry
/// appears in `failures` returns an error instead of succeeding.
#[derive(Debug, Clone)]
pub struct StubApi {
    pub log: CallLog,
    pub universe: Vec<ZoneStatus>,
    pub failures: Vec<String>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            universe: vec![
                ZoneStatus::new("a", AccessStatus::Available),
                ZoneStatus::new("b", AccessStatus::Approved),
                ZoneStatus::new("c", AccessStatus::Expired),
            ],
            failures: Vec::new(),
        }
    }

    pub fn failing(mut self, call: &str) -> Self {
        self.failures.push(call.to_string());
        self
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        let failed = self.failures.contains(&call);
        self.log.push(call.clone());
        if failed {
            return Err(ApiError::InvalidResponse(format!("scripted failure: {call}")));
        }
        Ok(())
    }

    fn zones(&self) -> Vec<String> {
        self.universe.iter().map(|s| s.zone.clone()).collect()
    }
}

#[async_trait]
impl ZoneAccessApi for StubApi {
    async fn authenticate(&mut self) -> Result<(), ApiError> {
        self.record("authenticate".into())
    }

    async fn terms(&self) -> Result<Terms, ApiError> {
        self.record("terms".into())?;
        Ok(Terms {
            version: "1".into(),
            content: "stub terms".into(),
        })
    }

    async fn zone_status(&self) -> Result<Vec<ZoneStatus>, ApiError> {
        self.record("zone_status".into())?;
        Ok(self.universe.clone())
    }

    async fn request_zones(&self, zones: &[String], reason: &str) -> Result<(), ApiError> {
        self.record(format!("request_zones {} {reason}", zones.join(",")))
    }

    async fn request_all_except(
        &self,
        reason: &str,
        exclusions: &[String],
    ) -> Result<Vec<String>, ApiError> {
        self.record(format!("request_all_except {reason}"))?;
        Ok(crate::zones::resolve_all_except(self.zones(), exclusions))
    }

    async fn extend_zone(&self, zone: &str) -> Result<(), ApiError> {
        self.record(format!("extend_zone {zone}"))
    }

    async fn extend_all_except(&self, exclusions: &[String]) -> Result<Vec<String>, ApiError> {
        self.record("extend_all_except".into())?;
        Ok(crate::zones::resolve_all_except(self.zones(), exclusions))
    }

    async fn outstanding_request_id(&self, zone: &str) -> Result<String, ApiError> {
        self.record(format!("outstanding_request_id {zone}"))?;
        Ok(format!("id-{zone}"))
    }

    async fn cancel_request(&self, request_id: &str, zone: &str) -> Result<(), ApiError> {
        self.record(format!("cancel_request {request_id} {zone}"))
    }
}

/// Reporter that keeps every line it would have printed.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("reporter poisoned").clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().expect("reporter poisoned").push(line);
    }
}

impl Reporter for RecordingReporter {
    fn terms(&self, terms: &Terms) {
        self.push(terms_block(terms));
    }

    fn zone_status(&self, status: &ZoneStatus) {
        self.push(status_line(status));
    }

    fn summary(&self, workflow: Workflow, zones: &[String]) {
        if let Some(line) = summary_line(workflow, zones) {
            self.push(line);
        }
    }

    fn error(&self, msg: &str) {
        self.push(format!("error: {msg}"));
    }
}
