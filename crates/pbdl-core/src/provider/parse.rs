//! Parse yt-dlp JSON dumps and progress lines.

use serde::Deserialize;

use super::Playlist;
use crate::item::{ItemMetadata, WorkItem};
use crate::progress::TransferEvent;

/// Marker at the start of every progress line we ask yt-dlp to print.
pub const PROGRESS_PREFIX: &str = "pbdl-progress";

const DEFAULT_PLAYLIST_TITLE: &str = "playlist";

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    playlist_title: Option<String>,
    #[serde(default)]
    entries: Option<Vec<Option<RawEntry>>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    filesize: Option<f64>,
    #[serde(default)]
    filesize_approx: Option<f64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse `yt-dlp --flat-playlist --dump-single-json` output.
///
/// `null` entries (deleted or private videos) are skipped. Entries without an
/// `id` are kept so the run can report them.
pub fn parse_playlist(json: &str) -> Result<Playlist, serde_json::Error> {
    let raw: RawPlaylist = serde_json::from_str(json)?;
    let title = non_empty(raw.title)
        .or_else(|| non_empty(raw.playlist_title))
        .unwrap_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string());
    let items = raw
        .entries
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|e| WorkItem {
            id: non_empty(e.id),
            title: non_empty(e.title),
            url: non_empty(e.url).filter(|u| u.starts_with("http")),
        })
        .collect();
    Ok(Playlist { title, items })
}

/// Parse `yt-dlp --dump-json` output for a single video.
pub fn parse_entry_metadata(json: &str) -> Result<ItemMetadata, serde_json::Error> {
    let raw: RawVideo = serde_json::from_str(json)?;
    let size_estimate = raw
        .filesize
        .or(raw.filesize_approx)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n as u64);
    Ok(ItemMetadata {
        title: non_empty(raw.title),
        size_estimate,
    })
}

/// Parse one stdout line printed by our progress template:
/// `pbdl-progress <status> <downloaded_bytes>`.
///
/// Returns `None` for any other output.
pub fn parse_progress_line(line: &str) -> Option<TransferEvent> {
    let mut parts = line.split_whitespace();
    if parts.next()? != PROGRESS_PREFIX {
        return None;
    }
    match parts.next()? {
        "finished" => Some(TransferEvent::Finished),
        "downloading" => {
            let bytes = parts.next()?;
            // yt-dlp prints "NA" for missing fields, and floats for some extractors.
            let downloaded_bytes = bytes
                .parse::<u64>()
                .ok()
                .or_else(|| bytes.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))?;
            Some(TransferEvent::Downloading { downloaded_bytes })
        }
        _ => None,
    }
}
