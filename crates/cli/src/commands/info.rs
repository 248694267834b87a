//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{Destination, ExportBlueprint, OutputFormat};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    destination: DestinationInfo,
    table_name: String,
    delivery: DeliveryInfo,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum DestinationInfo {
    File {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<OutputFormat>,
    },
    Remote {
        url: String,
    },
    None,
}

#[derive(Serialize)]
struct DeliveryInfo {
    max_attempts: u32,
    retry_delay_secs: f64,
    timeout_secs: f64,
    success_statuses: Vec<u16>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&blueprint);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &ExportBlueprint) -> ConfigInfo {
    let destination = match blueprint.destination() {
        Some(Destination::File(path)) => DestinationInfo::File {
            format: OutputFormat::from_path(&path).ok(),
            path: path.display().to_string(),
        },
        Some(Destination::Remote(url)) => DestinationInfo::Remote {
            url: url.to_string(),
        },
        None => DestinationInfo::None,
    };

    let delivery = &blueprint.delivery;
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        destination,
        table_name: blueprint.output.table_name.clone(),
        delivery: DeliveryInfo {
            max_attempts: delivery.max_attempts,
            retry_delay_secs: delivery.retry_delay_secs,
            timeout_secs: delivery.timeout_secs,
            success_statuses: delivery.success_statuses.clone(),
        },
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("Listing Export Configuration ({})\n", info.version);

    println!("Destination");
    match &info.destination {
        DestinationInfo::File { path, format } => {
            println!("   ├─ File: {}", path);
            match format {
                Some(format) => println!("   └─ Format: {}", format),
                None => println!("   └─ Format: (unrecognised suffix)"),
            }
        }
        DestinationInfo::Remote { url } => {
            println!("   └─ POST {}", url);
        }
        DestinationInfo::None => {
            println!("   └─ (none) - exports will be skipped");
        }
    }

    println!("\nSQLite table: {}", info.table_name);

    let delivery = &info.delivery;
    println!("\nDelivery");
    println!("   ├─ Attempts: {}", delivery.max_attempts);
    println!("   ├─ Delay between attempts: {}s", delivery.retry_delay_secs);
    println!("   ├─ Request timeout: {}s", delivery.timeout_secs);
    println!("   └─ Success statuses: {:?}", delivery.success_statuses);

    println!();
}
