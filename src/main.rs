//! CLI entry point for czds-request.

mod cli;

use std::io::IsTerminal;

use clap::Parser;
use czds_request::api::CzdsClient;
use czds_request::build_info;
use czds_request::config::load_config;
use czds_request::credential::PasswordSource;
use czds_request::logging::init_logging;
use czds_request::orchestrator;
use czds_request::report::{Reporter, TerminalReporter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();
    let color = !args.no_color && std::io::stderr().is_terminal();
    init_logging(args.verbose, color);
    let reporter = TerminalReporter::new(color);

    if let Err(msg) = run(args, &reporter).await {
        reporter.error(&msg);
        std::process::exit(1);
    }
}

async fn run(args: cli::Args, reporter: &TerminalReporter) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref()).map_err(|e| e.to_string())?;

    // Apply CLI overrides.
    if let Some(username) = &args.username {
        config.account.username = username.clone();
    }
    if config.account.username.is_empty() {
        return Err("must pass username".into());
    }

    // Nothing is resolved or sent before the intents check out.
    let plan = args.plan();
    plan.validate().map_err(|e| e.to_string())?;

    let passin = args.passin.as_deref().or(config.account.passin.as_deref());
    let password = PasswordSource::select(args.password.as_deref(), passin)
        .and_then(|source| source.resolve())
        .map_err(|e| e.to_string())?;

    let client = CzdsClient::new(&config.api, config.account.username.clone(), password);
    tracing::debug!(
        version = %build_info::version_line(),
        auth_url = client.auth_url(),
        base_url = %config.api.base_url,
        "starting"
    );
    orchestrator::run(&plan, client, reporter)
        .await
        .map_err(|e| e.to_string())
}
