// src/main.rs

//! galpull CLI
//!
//! Crawls a paginated image-gallery site and bulk-downloads set images with
//! checkpointed, resumable progress.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use galpull::error::Result;
use galpull::models::Config;
use galpull::pipeline;
use galpull::storage::FsCheckpoint;

/// galpull - gallery crawler and bulk image downloader
#[derive(Parser, Debug)]
#[command(
    name = "galpull",
    version,
    about = "Gallery crawler and bulk image downloader"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl pending listing pages and download their sets
    Run {
        /// Override the last listing-page number to crawl
        #[arg(long)]
        last_page: Option<u32>,

        /// Override the download output directory
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run { last_page, output } => {
            let mut config = Config::load_or_default(&cli.config);
            if let Some(last_page) = last_page {
                config.site.last_page = last_page;
            }
            if let Some(output) = output {
                config.download.output_dir = output;
            }
            config.validate()?;

            let checkpoint = FsCheckpoint::new(&config.download.checkpoint_file);
            pipeline::run_crawl(&config, &checkpoint).await?;
        }
        Command::Validate => {
            let config = Config::load(&cli.config)?;
            config.validate()?;
            log::info!("Configuration OK: {}", cli.config.display());
        }
    }

    Ok(())
}
