//! Safe local names for playlist folders and archives.

/// Folder name used when a playlist title has nothing usable in it.
pub const DEFAULT_PLAYLIST_DIR: &str = "playlist";

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Derives a folder name from a playlist title.
///
/// - Keeps alphanumerics (any script), spaces, `_` and `-`; drops everything else
/// - Trims leading/trailing whitespace
/// - Limits length to 255 bytes
/// - Falls back to `"playlist"` when nothing is left
pub fn safe_playlist_dir(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let trimmed = truncate_to_boundary(kept.trim(), NAME_MAX).trim_end();
    if trimmed.is_empty() {
        DEFAULT_PLAYLIST_DIR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shortens `title` to at most `max_chars` characters for one-line display.
pub fn display_truncate(title: &str, max_chars: usize) -> &str {
    match title.char_indices().nth(max_chars) {
        Some((idx, _)) => &title[..idx],
        None => title,
    }
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut take = max_bytes;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_slashes() {
        assert_eq!(safe_playlist_dir("Best of 2023: Vol/1!"), "Best of 2023 Vol1");
        assert_eq!(safe_playlist_dir("../../etc"), "etc");
    }

    #[test]
    fn keeps_dash_underscore_and_unicode() {
        assert_eq!(safe_playlist_dir("  lo-fi_beats  "), "lo-fi_beats");
        assert_eq!(safe_playlist_dir("Música 日本"), "Música 日本");
    }

    #[test]
    fn falls_back_when_empty() {
        assert_eq!(safe_playlist_dir("!!!"), DEFAULT_PLAYLIST_DIR);
        assert_eq!(safe_playlist_dir(""), DEFAULT_PLAYLIST_DIR);
    }

    #[test]
    fn limits_length() {
        let long = "é".repeat(300);
        let out = safe_playlist_dir(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn display_truncate_counts_chars() {
        assert_eq!(display_truncate("abcdef", 3), "abc");
        assert_eq!(display_truncate("ab", 60), "ab");
        assert_eq!(display_truncate("日本語", 2), "日本");
    }
}
