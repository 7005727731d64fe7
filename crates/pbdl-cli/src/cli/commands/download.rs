//! `pbdl download <url>` – fetch a playlist and download every entry as audio.

use anyhow::{Context, Result};
use pbdl_core::archive;
use pbdl_core::config::PbdlConfig;
use pbdl_core::delay::ThreadSleeper;
use pbdl_core::naming::safe_playlist_dir;
use pbdl_core::orchestrator::{BatchOrchestrator, RunEnv, RunSettings};
use pbdl_core::provider::{AudioOptions, YtDlp};
use std::fs;
use std::path::PathBuf;

use crate::cli::display::ConsoleObserver;

/// Arguments of the `download` subcommand.
#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    pub url: String,
    pub cookies: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub max_attempts: Option<u32>,
    pub no_archive: bool,
    pub report: Option<PathBuf>,
}

impl DownloadArgs {
    /// Config with this command's overrides applied.
    pub fn effective_config(&self, base: &PbdlConfig) -> PbdlConfig {
        let mut cfg = base.clone();
        if let Some(ref dir) = self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(n) = self.batch_size {
            cfg.batch_size = n;
        }
        if let Some(n) = self.max_attempts {
            cfg.retry.max_attempts = n;
        }
        if self.no_archive {
            cfg.create_archive = false;
        }
        cfg
    }
}

pub fn run_download(base: &PbdlConfig, args: DownloadArgs) -> Result<()> {
    let cfg = args.effective_config(base);
    let settings = RunSettings::from_config(&cfg).context("invalid settings")?;

    if let Some(ref cookies) = args.cookies {
        if !cookies.is_file() {
            anyhow::bail!("cookies file not found: {}", cookies.display());
        }
    }

    let provider = YtDlp::discover(cfg.yt_dlp_path.as_deref(), cfg.output_dir.clone())?
        .with_cookies(args.cookies.clone())
        .with_audio(AudioOptions::from(&cfg.audio));

    println!("Fetching playlist information...");
    let mut sleeper = ThreadSleeper;
    let playlist = provider.list_playlist(&args.url, &settings.retry, &mut sleeper)?;
    println!(
        "Found {} videos in playlist: {}",
        playlist.downloadable(),
        playlist.title
    );
    let unavailable = playlist.unavailable();
    if unavailable > 0 {
        println!("{unavailable} entries have no video id and will be recorded as failed");
    }

    let dir_name = safe_playlist_dir(&playlist.title);
    let target = cfg.output_dir.join(&dir_name);
    fs::create_dir_all(&target)
        .with_context(|| format!("create output dir: {}", target.display()))?;
    let provider = provider.with_output_dir(target.clone());

    let mut orchestrator = BatchOrchestrator::new(&provider, settings);
    let mut observer = ConsoleObserver::new();
    let mut rng = rand::thread_rng();
    let result = orchestrator.run(
        &playlist.items,
        RunEnv {
            sleeper: &mut sleeper,
            rng: &mut rng,
            observer: &mut observer,
        },
    )?;

    println!();
    println!(
        "Done: {} downloaded, {} failed (files in {})",
        result.succeeded.len(),
        result.failed.len(),
        target.display()
    );
    for failed in &result.failed {
        let id = if failed.id.is_empty() { "<no id>" } else { failed.id.as_str() };
        println!("  {id}: {}", failed.reason);
    }

    if cfg.create_archive {
        if result.succeeded.is_empty() {
            tracing::info!("nothing downloaded; skipping archive");
        } else {
            let zip_path = cfg.output_dir.join(format!("{dir_name}.zip"));
            let n = archive::zip_dir(&target, &zip_path)?;
            println!("Archived {n} file(s) to {}", zip_path.display());
        }
    }

    if let Some(ref report) = args.report {
        result.write_json(report)?;
        println!("Report written to {}", report.display());
    }
    Ok(())
}
