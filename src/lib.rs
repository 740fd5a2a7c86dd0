//! czds-request: manage zone file access requests with ICANN CZDS.
//!
//! The crate turns operator intents (show terms, show status, request,
//! extend or cancel access) into a fixed sequence of authenticated calls
//! against the registry's access-control API.
//!
//! # Quick start
//!
//! ```no_run
//! use czds_request::api::CzdsClient;
//! use czds_request::config::load_config;
//! use czds_request::credential::PasswordSource;
//! use czds_request::orchestrator::{run, Plan};
//! use czds_request::report::TerminalReporter;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let password = PasswordSource::Prompt.resolve().unwrap();
//! let client = CzdsClient::new(&config.api, config.account.username.clone(), password);
//! let plan = Plan { status: true, ..Plan::default() };
//! run(&plan, client, &TerminalReporter::new(true)).await.unwrap();
//! # }
//! ```

pub mod api;
pub mod build_info;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod report;
#[cfg(test)]
pub mod testsupport;
pub mod zones;
