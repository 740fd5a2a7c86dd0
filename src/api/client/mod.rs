//! HTTP implementation of [`ZoneAccessApi`] for ICANN CZDS.
//!
//! - `transport`: client construction and status handling
//! - `retry`: bounded backoff for transient failures
//! - `wire`: JSON payload shapes

mod retry;
mod transport;
mod wire;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;

use super::{AccessStatus, Terms, ZoneAccessApi, ZoneStatus};
use crate::config::ApiConfig;
use crate::credential::Password;
use crate::error::ApiError;
use crate::zones::resolve_all_except;
use retry::{Replay, RetryPolicy};
use wire::{
    AuthRequest, AuthResponse, CancelSubmission, RequestInfo, RequestSubmission, RequestsFilter,
    RequestsPage, TermsResponse, TldStatusRecord,
};

/// Client for the CZDS access-request API.
///
/// Holds the account credentials until [`ZoneAccessApi::authenticate`]
/// exchanges them for a bearer token, which every later call sends.
pub struct CzdsClient {
    http: reqwest::Client,
    auth_url: String,
    base_url: String,
    username: String,
    password: Password,
    access_token: Option<String>,
    retry_policy: RetryPolicy,
}

impl CzdsClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig, username: impl Into<String>, password: Password) -> Self {
        Self::new_with_retry_policy(config, username.into(), password, RetryPolicy::default())
    }

    fn new_with_retry_policy(
        config: &ApiConfig,
        username: String,
        password: Password,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http: transport::build_http_client(config.timeout()),
            auth_url: config.auth_url.trim().to_string(),
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            username,
            password,
            access_token: None,
            retry_policy,
        }
    }

    /// Endpoint the account credentials are posted to.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.access_token
            .as_deref()
            .ok_or(ApiError::NotAuthenticated)
    }

    async fn execute<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        bearer: Option<&str>,
        replay: Replay,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut attempt: u32 = 0;
        loop {
            let mut request = self
                .http
                .request(method.clone(), url)
                .header(ACCEPT, "application/json");
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            match transport::send(request).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !self.retry_policy.should_retry(&err, attempt, replay) {
                        return Err(err);
                    }
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    tracing::debug!(%url, attempt, ?delay, error = %err, "retrying request");
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.api_url(path);
        let response = self
            .execute::<()>(Method::GET, &url, None, Some(self.bearer()?), Replay::Safe)
            .await?;
        decode(response).await
    }

    async fn post<B>(
        &self,
        path: &str,
        body: Option<&B>,
        replay: Replay,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.api_url(path);
        self.execute(Method::POST, &url, body, Some(self.bearer()?), replay)
            .await
    }

    /// POST used as a query: safe to resend.
    async fn search<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        decode(self.post(path, Some(body), Replay::Safe).await?).await
    }

    async fn request_info(&self, request_id: &str) -> Result<RequestInfo, ApiError> {
        self.get_json(&format!("/czds/requests/{request_id}")).await
    }

    async fn extend_request(&self, request_id: &str) -> Result<(), ApiError> {
        let path = format!("/czds/requests/extension/{request_id}");
        self.post::<()>(&path, None, Replay::Submission).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl ZoneAccessApi for CzdsClient {
    async fn authenticate(&mut self) -> Result<(), ApiError> {
        tracing::debug!(url = %self.auth_url, "authenticating");
        let body = AuthRequest {
            username: &self.username,
            password: self.password.expose(),
        };
        let response = self
            .execute(Method::POST, &self.auth_url, Some(&body), None, Replay::Safe)
            .await?;
        let AuthResponse {
            access_token,
            message,
        } = decode(response).await?;
        let token = access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidResponse(
                    message.unwrap_or_else(|| "no access token in response".to_string()),
                )
            })?;
        self.access_token = Some(token);
        Ok(())
    }

    async fn terms(&self) -> Result<Terms, ApiError> {
        let terms: TermsResponse = self.get_json("/czds/terms/condition").await?;
        Ok(Terms {
            version: terms.version,
            content: terms.content,
        })
    }

    async fn zone_status(&self) -> Result<Vec<ZoneStatus>, ApiError> {
        let records: Vec<TldStatusRecord> = self.get_json("/czds/tlds").await?;
        Ok(records
            .into_iter()
            .map(|record| ZoneStatus::from_registry(record.tld, record.current_status))
            .collect())
    }

    async fn request_zones(&self, zones: &[String], reason: &str) -> Result<(), ApiError> {
        let terms = self.terms().await?;
        tracing::debug!(count = zones.len(), terms_version = %terms.version, "submitting request");
        let submission = RequestSubmission {
            all_tlds: false,
            tld_names: zones,
            reason,
            tc_version: &terms.version,
            additional_ftp_ips: Vec::new(),
        };
        self.post("/czds/requests/create", Some(&submission), Replay::Submission)
            .await?;
        Ok(())
    }

    async fn request_all_except(
        &self,
        reason: &str,
        exclusions: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let requestable = self
            .zone_status()
            .await?
            .into_iter()
            .filter(|record| record.status.is_requestable())
            .map(|record| record.zone);
        let zones = resolve_all_except(requestable, exclusions);
        if zones.is_empty() {
            tracing::debug!("no requestable zones");
            return Ok(zones);
        }
        self.request_zones(&zones, reason).await?;
        Ok(zones)
    }

    async fn extend_zone(&self, zone: &str) -> Result<(), ApiError> {
        let request_id = self.outstanding_request_id(zone).await?;
        self.extend_request(&request_id).await
    }

    async fn extend_all_except(&self, exclusions: &[String]) -> Result<Vec<String>, ApiError> {
        let approved = self
            .zone_status()
            .await?
            .into_iter()
            .filter(|record| record.status == AccessStatus::Approved)
            .map(|record| record.zone);
        let mut extended = Vec::new();
        for zone in resolve_all_except(approved, exclusions) {
            let request_id = self.outstanding_request_id(&zone).await?;
            if !self.request_info(&request_id).await?.extensible {
                tracing::debug!(%zone, "not extensible yet");
                continue;
            }
            tracing::debug!(%zone, "extending");
            self.extend_request(&request_id).await?;
            extended.push(zone);
        }
        Ok(extended)
    }

    async fn outstanding_request_id(&self, zone: &str) -> Result<String, ApiError> {
        let mut page = 0;
        let mut seen: u64 = 0;
        loop {
            let batch: RequestsPage = self
                .search("/czds/requests/all", &RequestsFilter::for_zone(zone, page))
                .await?;
            tracing::debug!(%zone, page, total = batch.total_requests, "looked up requests");
            let fetched = batch.requests.len() as u64;
            // Rows are newest first, so the first exact match is the latest.
            if let Some(found) = batch
                .requests
                .into_iter()
                .find(|request| request.tld.eq_ignore_ascii_case(zone))
            {
                return Ok(found.request_id);
            }
            seen += fetched;
            if fetched == 0 || seen >= batch.total_requests {
                return Err(ApiError::NoOutstandingRequest(zone.to_string()));
            }
            page += 1;
        }
    }

    async fn cancel_request(&self, request_id: &str, zone: &str) -> Result<(), ApiError> {
        let submission = CancelSubmission {
            integration_id: request_id,
            tld_name: zone,
        };
        self.post("/czds/requests/cancel", Some(&submission), Replay::Submission)
            .await?;
        Ok(())
    }
}
