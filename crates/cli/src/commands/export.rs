//! `export` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::{ContractError, ExportBlueprint, Observer};
use dispatcher::{create_dispatcher, DispatcherError, PersistOutcome};
use tracing::info;

use crate::cli::ExportArgs;
use crate::input::load_records;

/// Execute the `export` command
pub async fn run_export(args: &ExportArgs, observer: Arc<dyn Observer>) -> Result<()> {
    let blueprint = resolve_blueprint(args)?;
    let records = load_records(&args.input)?;
    let destination = blueprint.destination();

    info!(
        input = %args.input.display(),
        records = records.len(),
        destination = ?destination.as_ref().map(ToString::to_string),
        "Records loaded"
    );

    let dispatcher =
        create_dispatcher(&blueprint, observer).context("Failed to create dispatcher")?;

    match dispatcher.persist(&records, destination.as_ref()).await {
        Ok(outcome) => {
            record_outcome(&outcome);
            println!("{outcome}");
            Ok(())
        }
        Err(e) => {
            record_failure(&e);
            Err(e).context("Export failed")
        }
    }
}

/// Load the configuration file (or defaults), apply CLI overrides, validate the result
pub fn resolve_blueprint(args: &ExportArgs) -> Result<ExportBlueprint> {
    let mut blueprint = match &args.config {
        Some(path) => config_loader::ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ExportBlueprint::default(),
    };

    apply_overrides(&mut blueprint, args);

    config_loader::ConfigLoader::validate(&blueprint)
        .context("Configuration invalid after applying command-line overrides")?;
    Ok(blueprint)
}

fn apply_overrides(blueprint: &mut ExportBlueprint, args: &ExportArgs) {
    if let Some(ref path) = args.output {
        info!(path = %path.display(), "Overriding output path from CLI");
        blueprint.output.path = Some(path.clone());
    }
    if let Some(ref url) = args.url {
        info!(url = %url, "Overriding endpoint from CLI");
        blueprint.output.url = Some(url.clone());
    }
    if let Some(ref table) = args.table {
        blueprint.output.table_name = table.clone();
    }
    if let Some(max_attempts) = args.max_attempts {
        blueprint.delivery.max_attempts = max_attempts;
    }
    if let Some(delay) = args.retry_delay {
        blueprint.delivery.retry_delay_secs = delay;
    }
    if let Some(timeout) = args.timeout {
        blueprint.delivery.timeout_secs = timeout;
    }
}

fn record_outcome(outcome: &PersistOutcome) {
    match outcome {
        PersistOutcome::Written { format, rows, .. } => {
            observability::record_persisted(format.as_str(), *rows)
        }
        PersistOutcome::Delivered { attempts, .. } => {
            observability::record_delivery(*attempts, true)
        }
        PersistOutcome::Skipped(_) => {}
    }
}

fn record_failure(error: &DispatcherError) {
    if let DispatcherError::Contract(ContractError::DeliveryFailed { attempts, .. }) = error {
        observability::record_delivery(*attempts, false);
    }
    observability::record_persist_failure(error.kind());
}
