//! MemoryDB resource provider CLI entrypoint.
//!
//! This is the main entrypoint for the memorydb-provider command-line tool.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use memorydb_provider::api::SdkMemoryDb;
use memorydb_provider::cli::{Cli, Commands, OutputFormatter, load_json, load_request};
use memorydb_provider::error::{ProviderError, Result};
use memorydb_provider::handler::{self, Action, ResourceKind};

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    // Load .env for local credentials
    dotenvy::dotenv().ok();

    let formatter = OutputFormatter::new(cli.output);
    let api = SdkMemoryDb::from_env().await;

    match cli.command {
        Commands::Invoke {
            resource,
            action,
            request,
            context,
        } => cmd_invoke(&api, resource, action, &request, context.as_deref(), &formatter).await,
        Commands::Run {
            resource,
            action,
            request,
            max_invocations,
        } => cmd_run(&api, resource, action, &request, max_invocations, &formatter).await,
    }
}

/// Run one handler invocation.
async fn cmd_invoke(
    api: &SdkMemoryDb,
    resource: ResourceKind,
    action: Action,
    request_path: &Path,
    context_path: Option<&Path>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let request = load_request(request_path)?;
    let context = context_path.map(load_json).transpose()?;

    let event = handler::dispatch(api, resource, action, request, context).await?;
    eprintln!("{}", formatter.format_event(&event));
    Ok(())
}

/// Drive an operation to a terminal event.
async fn cmd_run(
    api: &SdkMemoryDb,
    resource: ResourceKind,
    action: Action,
    request_path: &Path,
    max_invocations: u32,
    formatter: &OutputFormatter,
) -> Result<()> {
    let request = load_request(request_path)?;
    let mut context: Option<Value> = None;

    for invocation in 1..=max_invocations {
        debug!("Invocation {invocation} of {max_invocations}");
        let event =
            handler::dispatch(api, resource, action, request.clone(), context.take()).await?;

        if event["status"].as_str() != Some("IN_PROGRESS") {
            eprintln!("{}", formatter.format_event(&event));
            return Ok(());
        }

        info!("Operation in progress (invocation {invocation})");
        let delay = event["callbackDelaySeconds"].as_u64().unwrap_or(0);
        context = event.get("callbackContext").cloned();
        if delay > 0 {
            tokio::time::sleep(Duration::from_secs(delay)).await;
        }
    }

    Err(ProviderError::internal(
        "operation did not reach a terminal event within the invocation limit",
    ))
}
