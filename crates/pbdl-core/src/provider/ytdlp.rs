//! `yt-dlp` driven provider: playlist listing, metadata lookup and audio download.
//!
//! Every call shells out to the binary and blocks until it exits. Audio
//! extraction is done by yt-dlp's ffmpeg post-processor, so `ffmpeg` must be
//! on PATH as well.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use url::Url;

use super::parse::{parse_entry_metadata, parse_playlist, parse_progress_line, PROGRESS_PREFIX};
use super::{MediaProvider, Playlist};
use crate::delay::Sleeper;
use crate::error::{MetadataLookupError, OperationError, ProviderError, RunError};
use crate::item::{ItemMetadata, WorkItem};
use crate::progress::TransferEvent;
use crate::retry::{run_with_retry, RetryExhausted, RetryPolicy};

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Audio extraction settings passed to yt-dlp's `-x` post-processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioOptions {
    /// Target codec (`--audio-format`), e.g. "mp3".
    pub format: String,
    /// Target quality (`--audio-quality`), e.g. "320K" or "0".
    pub quality: String,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            format: "mp3".to_string(),
            quality: "320K".to_string(),
        }
    }
}

/// Handle to a `yt-dlp` binary plus per-run options.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    output_dir: PathBuf,
    cookies: Option<PathBuf>,
    audio: AudioOptions,
}

impl YtDlp {
    /// Create with an explicit binary path. Downloads land in `output_dir`.
    pub fn new(binary: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            binary,
            output_dir,
            cookies: None,
            audio: AudioOptions::default(),
        }
    }

    /// Locate `yt-dlp` only (explicit path or PATH lookup). Enough for listing.
    pub fn locate(explicit: Option<&Path>, output_dir: PathBuf) -> Result<Self, ProviderError> {
        let binary = match explicit {
            Some(p) if p.exists() => p.to_path_buf(),
            Some(p) => return Err(ProviderError::MissingBinary(p.to_path_buf())),
            None => which::which("yt-dlp").map_err(|source| ProviderError::ToolNotFound {
                tool: "yt-dlp",
                source,
            })?,
        };
        Ok(Self::new(binary, output_dir))
    }

    /// Locate `yt-dlp` and check that `ffmpeg` is available for audio extraction.
    pub fn discover(explicit: Option<&Path>, output_dir: PathBuf) -> Result<Self, ProviderError> {
        let tool = Self::locate(explicit, output_dir)?;
        let ffmpeg = which::which("ffmpeg").map_err(|source| ProviderError::ToolNotFound {
            tool: "ffmpeg",
            source,
        })?;
        tracing::debug!(yt_dlp = %tool.binary.display(), ffmpeg = %ffmpeg.display(), "media tools found");
        Ok(tool)
    }

    /// Pass a Netscape-format cookies file to every invocation.
    pub fn with_cookies(mut self, cookies: Option<PathBuf>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_audio(mut self, audio: AudioOptions) -> Self {
        self.audio = audio;
        self
    }

    /// Change where downloads are written (e.g. once the playlist title is known).
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// List playlist entries, retrying transient failures under `policy`.
    pub fn list_playlist(
        &self,
        playlist_url: &str,
        policy: &RetryPolicy,
        sleeper: &mut dyn Sleeper,
    ) -> Result<Playlist, RunError> {
        let url = validate_playlist_url(playlist_url)?;
        run_with_retry(policy, sleeper, |attempt| {
            tracing::debug!(attempt, url = %url, "fetching playlist info");
            self.dump_playlist(url.as_str())
        })
        .map(|(playlist, _)| playlist)
        .map_err(|RetryExhausted { attempts, last_error }| RunError::PlaylistLookup {
            attempts,
            message: last_error.0,
        })
    }

    fn dump_playlist(&self, url: &str) -> Result<Playlist, OperationError> {
        let output = self
            .command()
            .args(["--flat-playlist", "--dump-single-json", url])
            .output()
            .map_err(|e| OperationError::new(format!("failed to execute yt-dlp: {e}")))?;
        if !output.status.success() {
            return Err(OperationError::new(failure_message(
                &output.stderr,
                output.status,
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_playlist(&stdout)
            .map_err(|e| OperationError::new(format!("unreadable playlist JSON: {e}")))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-warnings");
        if let Some(ref cookies) = self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.stdin(Stdio::null());
        cmd
    }
}

/// Page URL for an item: its own URL, or a watch URL built from the id.
pub(crate) fn item_url(item: &WorkItem) -> Option<String> {
    if let Some(ref u) = item.url {
        return Some(u.clone());
    }
    let id = item.id()?;
    Url::parse_with_params(WATCH_URL, &[("v", id)])
        .ok()
        .map(String::from)
}

fn validate_playlist_url(raw: &str) -> Result<Url, RunError> {
    match Url::parse(raw.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => Ok(u),
        _ => Err(RunError::InvalidUrl(raw.to_string())),
    }
}

/// Last non-empty stderr line, or the exit status when stderr is silent.
fn failure_message(stderr: &[u8], status: std::process::ExitStatus) -> String {
    let text = String::from_utf8_lossy(stderr);
    last_line(&text).unwrap_or_else(|| format!("yt-dlp exited with {status}"))
}

/// Feeds every line to `f` until EOF. Bytes that are not UTF-8 are replaced,
/// so the pipe keeps draining whatever the child's locale emits.
fn for_each_lossy_line<R: BufRead>(mut reader: R, mut f: impl FnMut(&str)) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                f(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading yt-dlp output");
                break;
            }
        }
    }
}

fn last_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
}

impl MediaProvider for YtDlp {
    fn resolve(&self, item: &WorkItem) -> Result<ItemMetadata, MetadataLookupError> {
        let url = item_url(item).ok_or_else(|| MetadataLookupError("no item URL".to_string()))?;
        let output = self
            .command()
            .args(["--dump-json", "--skip-download", "--no-playlist", url.as_str()])
            .output()
            .map_err(|e| MetadataLookupError(format!("failed to execute yt-dlp: {e}")))?;
        if !output.status.success() {
            return Err(MetadataLookupError(failure_message(
                &output.stderr,
                output.status,
            )));
        }
        parse_entry_metadata(&String::from_utf8_lossy(&output.stdout))
            .map_err(|e| MetadataLookupError(e.to_string()))
    }

    fn perform(
        &self,
        item: &WorkItem,
        on_event: &mut dyn FnMut(TransferEvent),
    ) -> Result<(), OperationError> {
        let url = item_url(item).ok_or_else(|| OperationError::new("no-id"))?;
        let template = self.output_dir.join("%(title)s.%(ext)s");
        let progress_template = format!(
            "download:{PROGRESS_PREFIX} %(progress.status)s %(progress.downloaded_bytes)s"
        );

        let mut child = self
            .command()
            .args(["-f", "bestaudio/best", "-x"])
            .args(["--audio-format", self.audio.format.as_str()])
            .args(["--audio-quality", self.audio.quality.as_str()])
            .args(["--no-overwrites", "--no-playlist", "--newline"])
            .args(["--progress-template", progress_template.as_str()])
            .arg("-o")
            .arg(&template)
            .arg(&url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OperationError::new(format!("failed to execute yt-dlp: {e}")))?;

        // Drain stderr on a helper thread so a chatty tool cannot block on a full pipe.
        let stderr_handle = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            for_each_lossy_line(BufReader::new(stdout), |line| {
                if let Some(event) = parse_progress_line(line) {
                    on_event(event);
                }
            });
        }

        let status = child
            .wait()
            .map_err(|e| OperationError::new(format!("waiting for yt-dlp: {e}")))?;
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(OperationError::new(failure_message(
                stderr.as_bytes(),
                status,
            )))
        }
    }
}
