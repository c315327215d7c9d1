use clap::Parser;
use deploy::{
    common::constants::PRODUCT,
    config::DeployConfig,
    deploy::{Deployer, Outcome},
};
use opts::CliArgs;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod opts;

#[tokio::main]
async fn main() {
    init_logging();

    let opts = match CliArgs::try_parse() {
        Ok(opts) => opts,
        Err(error) => {
            // Usage errors exit with 1, not clap's default of 2.
            let _ = error.print();
            std::process::exit(1);
        }
    };

    if let Err(error) = run(&opts).await {
        error!(%error, "Failed to deploy {PRODUCT}");
        console_logger::error(&format!("Error: {error}"));
        std::process::exit(1);
    }
}

/// Initialize logging components -- tracing. Diagnostics go to stderr and are off unless
/// RUST_LOG asks for them, the console output covers the operator.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(opts: &CliArgs) -> deploy::common::error::Result<()> {
    let mut config = DeployConfig::default();
    match env::current_dir() {
        Ok(dir) => config = config.with_work_dir(dir),
        Err(error) => warn!(%error, "Failed to read the working directory"),
    }

    let outcome = Deployer::builder()
        .with_config(config)
        .build()?
        .deploy(opts.port_forward())
        .await?;

    match outcome {
        Outcome::Declined => info!("Deployment declined by the operator"),
        Outcome::Installed(summary) | Outcome::Upgraded(summary) => info!(
            running = summary.running(),
            total = summary.total(),
            "Deployment finished"
        ),
    }
    Ok(())
}
