//! CLI for the PBDL playlist downloader.

mod commands;
mod display;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pbdl_core::config;
use std::path::PathBuf;

use commands::{run_download, run_list, run_show_config, DownloadArgs};

/// Top-level CLI for the PBDL playlist downloader.
#[derive(Debug, Parser)]
#[command(name = "pbdl")]
#[command(about = "PBDL: download a video playlist as audio, in polite batches", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/pbdl/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every entry of a playlist as audio.
    Download {
        /// Playlist URL.
        url: String,
        /// Netscape-format cookies file (for age-restricted or region-locked videos).
        #[arg(long, value_name = "FILE")]
        cookies: Option<PathBuf>,
        /// Root directory for downloads (overrides config).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Items per batch (overrides config).
        #[arg(long, value_name = "N")]
        batch_size: Option<usize>,
        /// Attempts per item, including the first (overrides config).
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,
        /// Do not zip the playlist folder after the run.
        #[arg(long)]
        no_archive: bool,
        /// Write the run result as JSON to this file.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// List playlist entries without downloading.
    List {
        /// Playlist URL.
        url: String,
        /// Netscape-format cookies file.
        #[arg(long, value_name = "FILE")]
        cookies: Option<PathBuf>,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match cli.config {
            Some(ref path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                url,
                cookies,
                output_dir,
                batch_size,
                max_attempts,
                no_archive,
                report,
            } => run_download(
                &cfg,
                DownloadArgs {
                    url,
                    cookies,
                    output_dir,
                    batch_size,
                    max_attempts,
                    no_archive,
                    report,
                },
            )?,
            CliCommand::List { url, cookies } => run_list(&cfg, &url, cookies)?,
            CliCommand::Config => run_show_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
