//! veer — gradual traffic shifting for function deployments.
//!
//! Publishes a new revision of a configured function, walks its alias
//! through the configured traffic percentages with an observation pause
//! after each shift, and rolls back automatically if the observed error
//! rate breaches the threshold.
//!
//! # Usage
//!
//! ```text
//! veer --config veer.toml billing-webhook
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use veer_core::VeerConfig;
use veer_rollout::{Deployer, HttpMetricsSource, HttpRevisionStore};

#[derive(Parser)]
#[command(
    name = "veer",
    about = "Gradual traffic shifting for function deployments",
    version,
)]
struct Cli {
    /// Path to the deployment config file.
    #[arg(long, default_value = "veer.toml")]
    config: PathBuf,

    /// Function to deploy (must match a [[deployment]] entry).
    function: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,veer=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = VeerConfig::from_file(&cli.config)?;

    // Missing or unknown function: print the configured names and exit
    // non-zero without touching any platform service.
    let Some(function) = cli.function else {
        eprint!("{}", usage(&config));
        std::process::exit(1);
    };
    let Some(deployment) = config.find(&function) else {
        eprintln!("no deployment configured for function: {function}");
        eprint!("{}", usage(&config));
        std::process::exit(1);
    };

    let timeout = Duration::from_secs(config.platform.request_timeout_secs);
    let revisions = HttpRevisionStore::new(&config.platform.revision_api, timeout)?;
    let metrics = HttpMetricsSource::new(&config.platform.metrics_api, timeout)?;

    let deployer = Deployer::new(revisions, metrics);
    let report = deployer.deploy(deployment).await?;

    info!(
        function = %report.function,
        old_revision = %report.old_revision,
        new_revision = %report.new_revision,
        steps = report.steps_completed,
        "deployment complete"
    );
    Ok(())
}

fn usage(config: &VeerConfig) -> String {
    let mut out = String::from("usage: veer [--config <path>] <function-name>\n");
    out.push_str("configured functions:\n");
    for name in config.function_names() {
        out.push_str("  - ");
        out.push_str(name);
        out.push('\n');
    }
    out
}
