//! JSON payloads exchanged with the account and CZDS APIs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct AuthRequest<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthResponse {
    #[serde(default)]
    pub(super) access_token: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TermsResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub(super) version: String,
    #[serde(default)]
    pub(super) content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TldStatusRecord {
    pub(super) tld: String,
    pub(super) current_status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RequestSubmission<'a> {
    pub(super) all_tlds: bool,
    pub(super) tld_names: &'a [String],
    pub(super) reason: &'a str,
    pub(super) tc_version: &'a str,
    #[serde(rename = "additionalFTPIps")]
    pub(super) additional_ftp_ips: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RequestsFilter<'a> {
    pub(super) status: &'a str,
    pub(super) filter: &'a str,
    pub(super) pagination: Pagination,
    pub(super) sort: Sort,
}

#[derive(Debug, Serialize)]
pub(super) struct Pagination {
    pub(super) size: u32,
    pub(super) page: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct Sort {
    pub(super) field: &'static str,
    pub(super) direction: &'static str,
}

/// Rows per page when searching a zone's requests.
pub(super) const LOOKUP_PAGE_SIZE: u32 = 100;

impl<'a> RequestsFilter<'a> {
    /// One page of requests whose TLD contains `zone`, newest first. The
    /// registry matches substrings, so `com` also returns `community`.
    pub(super) fn for_zone(zone: &'a str, page: u32) -> Self {
        Self {
            status: "",
            filter: zone,
            pagination: Pagination {
                size: LOOKUP_PAGE_SIZE,
                page,
            },
            sort: Sort {
                field: "created",
                direction: "desc",
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct RequestsPage {
    pub(super) requests: Vec<RequestSummary>,
    pub(super) total_requests: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RequestSummary {
    pub(super) request_id: String,
    pub(super) tld: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RequestInfo {
    #[serde(default)]
    pub(super) extensible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CancelSubmission<'a> {
    pub(super) integration_id: &'a str,
    pub(super) tld_name: &'a str,
}

/// Terms versions have been served both as strings and as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
