//! locker-gcd: the trash collection daemon.

use anyhow::Context;
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use locker_core::AppConfig;
use locker_gc::TrashCollector;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "locker-gcd", about = "Trash retention garbage collector")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "LOCKER_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut figment = Figment::new();
    if let Some(path) = &args.config {
        figment = figment.merge(Toml::file(path));
    }
    let config: AppConfig = figment
        .merge(Env::prefixed("LOCKER_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let metadata = locker_metadata::from_config(&config.metadata)
        .await
        .context("failed to open metadata store")?;
    let blobs =
        locker_storage::from_config(&config.storage).context("failed to open blob store")?;

    let collector = TrashCollector::new(metadata, blobs, config.gc.clone());

    if config.gc.schedule_enabled {
        let interval = config.gc.schedule_interval();
        info!(interval_secs = interval.as_secs(), "running on a schedule");
        loop {
            let report = collector.run().await;
            if !report.success() {
                error!(errors = report.errors.len(), "collection run had errors");
            }
            info!(
                report = %serde_json::to_string(&report).context("report serialization")?,
                "run report"
            );
            tokio::time::sleep(interval).await;
        }
    } else {
        let report = collector.run().await;
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("report serialization")?
        );
        if !report.success() {
            std::process::exit(1);
        }
    }
    Ok(())
}
