//! `pbdl list <url>` – show playlist entries without downloading.

use anyhow::Result;
use pbdl_core::config::PbdlConfig;
use pbdl_core::delay::ThreadSleeper;
use pbdl_core::naming::display_truncate;
use pbdl_core::orchestrator::RunSettings;
use pbdl_core::provider::YtDlp;
use std::path::PathBuf;

pub fn run_list(cfg: &PbdlConfig, url: &str, cookies: Option<PathBuf>) -> Result<()> {
    let settings = RunSettings::from_config(cfg)?;
    let provider =
        YtDlp::locate(cfg.yt_dlp_path.as_deref(), cfg.output_dir.clone())?.with_cookies(cookies);
    let playlist = provider.list_playlist(url, &settings.retry, &mut ThreadSleeper)?;

    println!("{} ({} entries)", playlist.title, playlist.items.len());
    if playlist.items.is_empty() {
        println!("No videos found in playlist or playlist is private/empty.");
        return Ok(());
    }
    println!("{:<5} {:<14} {}", "#", "ID", "TITLE");
    for (i, item) in playlist.items.iter().enumerate() {
        println!(
            "{:<5} {:<14} {}",
            i + 1,
            item.id().unwrap_or("-"),
            display_truncate(item.display_title(), 60)
        );
    }
    let batches = playlist.items.len().div_ceil(settings.batch_size.get());
    println!(
        "{} batch(es) of up to {} at the current settings",
        batches,
        settings.batch_size
    );
    Ok(())
}
