mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "obscan")]
#[command(about = "Open-box pickup availability scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan every configured seed and write the pickup hits
    Scan {
        /// Scan file to use instead of `OBSCAN_SCAN_CONFIG_PATH`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file to use instead of `OBSCAN_OUTPUT_PATH`
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seeds in flight at once (overrides `OBSCAN_MAX_CONCURRENT_SEEDS`)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Validate the scan file and print the seed plan without sending requests
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the request body that would be sent for one seed
    Template {
        #[arg(long)]
        seed: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the built-in metro seed list
    Seeds,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = obscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            config: scan_path,
            output,
            concurrency,
            dry_run,
        } => {
            let args = scan::ScanArgs {
                scan_path: scan_path.unwrap_or_else(|| config.scan_config_path.clone()),
                output_path: output.unwrap_or_else(|| config.output_path.clone()),
                concurrency: concurrency.unwrap_or(config.max_concurrent_seeds),
                dry_run,
            };
            scan::run_scan(&config, &args).await?;
        }
        Commands::Template {
            seed,
            config: scan_path,
        } => {
            let scan_path = scan_path.unwrap_or_else(|| config.scan_config_path.clone());
            scan::run_template(&scan_path, &seed)?;
        }
        Commands::Seeds => {
            for seed in obscan_core::DEFAULT_METRO_SEEDS {
                println!("{}\t{}", seed.postal_code, seed.metro);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
