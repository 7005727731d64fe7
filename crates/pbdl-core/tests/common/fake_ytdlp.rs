//! Shell-script stand-in for the yt-dlp binary (unix only).
//!
//! Playlist listing prints a fixed three-entry playlist; metadata lookups
//! report a 1000-byte file; downloads print progress lines in our template's
//! format and write `<id>.mp3` next to the `-o` template. Any URL containing
//! "bad" fails with an error on stderr.

use std::fs;
use std::path::{Path, PathBuf};

pub const PLAYLIST_SCRIPT: &str = r#"#!/bin/sh
mode=download
out=""
url=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  case "$a" in
    --flat-playlist) mode=playlist ;;
    --dump-json) mode=meta ;;
  esac
  prev="$a"
  url="$a"
done
case "$mode" in
  playlist)
    echo '{"title": "Fake: Mix!", "entries": [{"id": "good1", "title": "One"}, {"id": "bad2", "title": "Two"}, null, {"id": "good3", "title": "Three"}]}'
    ;;
  meta)
    echo '{"title": "Meta title", "filesize": 1000}'
    ;;
  download)
    case "$url" in
      *bad*) echo "WARNING: retrying" >&2; echo "ERROR: [youtube] bad2: Video unavailable" >&2; exit 1 ;;
    esac
    echo "[youtube] Extracting URL: $url"
    echo "pbdl-progress downloading 250"
    echo "pbdl-progress downloading NA"
    echo "pbdl-progress downloading 1000"
    echo "pbdl-progress finished 1000"
    dir=$(dirname "$out")
    id=${url##*=}
    printf 'audio' > "$dir/$id.mp3"
    ;;
esac
"#;

pub const BROKEN_SCRIPT: &str = r#"#!/bin/sh
echo "ERROR: Unable to download API page: HTTP Error 429" >&2
exit 1
"#;

/// Writes `body` as an executable script named `yt-dlp` under `dir`.
#[cfg(unix)]
pub fn install(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("yt-dlp");
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
