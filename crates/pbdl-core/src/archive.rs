//! Zip a downloaded playlist folder for hand-off.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Leftovers of interrupted yt-dlp transfers; never archived.
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// Zips every file under `src_dir` into `dest`, with entries rooted at the
/// folder's own name (`<folder>/<file>`). Returns the number of files written.
pub fn zip_dir(src_dir: &Path, dest: &Path) -> Result<usize> {
    let root_name = src_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "playlist".to_string());

    let mut files = Vec::new();
    collect_files(src_dir, &mut files)
        .with_context(|| format!("scan {}", src_dir.display()))?;
    files.sort();

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let out = File::create(dest).with_context(|| format!("create archive: {}", dest.display()))?;
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut written = 0usize;
    for path in &files {
        let rel = path.strip_prefix(src_dir).unwrap_or(path);
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            continue;
        }
        zip.start_file(format!("{root_name}/{name}"), options)?;
        let mut input = File::open(path).with_context(|| format!("open {}", path.display()))?;
        io::copy(&mut input, &mut zip)?;
        written += 1;
    }
    zip.finish()?;
    tracing::info!(files = written, archive = %dest.display(), "archive written");
    Ok(written)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let ty = entry.file_type()?;
        if ty.is_dir() {
            collect_files(&path, out)?;
        } else if ty.is_file() {
            out.push(path);
        }
    }
    Ok(())
}
