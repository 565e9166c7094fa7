//! CLI for the BDL batch downloader.

mod commands;

use anyhow::Result;
use bdl_core::config::{self, BdlConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_get, run_links, BatchOptions};

/// Top-level CLI for the BDL batch downloader.
#[derive(Debug, Parser)]
#[command(name = "bdl")]
#[command(about = "BDL: concurrent batch downloader with resumable transfers", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the XDG default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every URL listed in a links file (one per line).
    Run {
        /// Path to the links file.
        #[arg(default_value = "links.txt", value_name = "LINKS_FILE")]
        links: PathBuf,

        /// Maximum number of simultaneous transfers (default from config).
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,

        /// Directory to save files into (default from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Print the batch outcome as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Download the given URLs.
    Get {
        /// Direct HTTP/HTTPS URLs.
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// Maximum number of simultaneous transfers (default from config).
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,

        /// Directory to save files into (default from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Print the batch outcome as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                links,
                jobs,
                dir,
                json,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_links(&cfg, &links, BatchOptions { jobs, dir, json }).await?;
            }
            CliCommand::Get {
                urls,
                jobs,
                dir,
                json,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_get(&cfg, &urls, BatchOptions { jobs, dir, json }).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<BdlConfig> {
    let cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
