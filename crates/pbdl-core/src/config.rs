use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::delay::DelayRange;
use crate::error::ConfigError;
use crate::orchestrator::RunSettings;
use crate::provider::AudioOptions;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per item (including the first).
    pub max_attempts: u32,
    /// Linear backoff step in seconds: the n-th failure waits `n * base_delay_secs`.
    pub base_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 5.0,
        }
    }
}

/// Randomized pause bounds, in seconds (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub item_min_secs: f64,
    pub item_max_secs: f64,
    pub batch_min_secs: f64,
    pub batch_max_secs: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            item_min_secs: 2.0,
            item_max_secs: 5.0,
            batch_min_secs: 8.0,
            batch_max_secs: 20.0,
        }
    }
}

/// Audio extraction settings (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Codec passed to `--audio-format`.
    pub format: String,
    /// Quality passed to `--audio-quality`.
    pub quality: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let opts = AudioOptions::default();
        Self {
            format: opts.format,
            quality: opts.quality,
        }
    }
}

impl From<&AudioConfig> for AudioOptions {
    fn from(cfg: &AudioConfig) -> Self {
        AudioOptions {
            format: cfg.format.clone(),
            quality: cfg.quality.clone(),
        }
    }
}

/// Global configuration loaded from `~/.config/pbdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbdlConfig {
    /// Root directory for downloads; each playlist gets its own subfolder.
    pub output_dir: PathBuf,
    /// Items per batch; a longer pause follows each batch but the last.
    pub batch_size: usize,
    /// Zip the playlist folder after the run.
    #[serde(default = "default_true")]
    pub create_archive: bool,
    /// Explicit yt-dlp binary; if missing, `yt-dlp` is looked up on PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yt_dlp_path: Option<PathBuf>,
    #[serde(default)]
    pub delays: DelayConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

fn default_true() -> bool {
    true
}

impl Default for PbdlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("mp3_downloads"),
            batch_size: 8,
            create_archive: true,
            yt_dlp_path: None,
            delays: DelayConfig::default(),
            retry: RetryConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl PbdlConfig {
    /// Render as the TOML written to disk.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl RunSettings {
    /// Validate config values and convert them into typed run settings.
    pub fn from_config(cfg: &PbdlConfig) -> Result<Self, ConfigError> {
        let batch_size = NonZeroUsize::new(cfg.batch_size).ok_or(ConfigError::ZeroBatchSize)?;
        if cfg.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let base = cfg.retry.base_delay_secs;
        let base_delay = match Duration::try_from_secs_f64(base) {
            Ok(d) if base >= 0.0 => d,
            _ => return Err(ConfigError::InvalidBaseDelay(base)),
        };
        let d = &cfg.delays;
        Ok(Self {
            batch_size,
            item_delay: DelayRange::new("item", d.item_min_secs, d.item_max_secs)?,
            batch_delay: DelayRange::new("batch", d.batch_min_secs, d.batch_max_secs)?,
            retry: RetryPolicy::new(cfg.retry.max_attempts, base_delay),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pbdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PbdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PbdlConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<PbdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PbdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PbdlConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("mp3_downloads"));
        assert_eq!(cfg.batch_size, 8);
        assert!(cfg.create_archive);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.delays.batch_max_secs, 20.0);
        assert_eq!(cfg.audio.format, "mp3");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PbdlConfig::default();
        let toml = cfg.to_toml().unwrap();
        let parsed: PbdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_minimal_uses_section_defaults() {
        let toml = r#"
            output_dir = "/srv/music"
            batch_size = 4
        "#;
        let cfg: PbdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/music"));
        assert_eq!(cfg.batch_size, 4);
        assert!(cfg.create_archive);
        assert!(cfg.yt_dlp_path.is_none());
        assert_eq!(cfg.retry, RetryConfig::default());
        assert_eq!(cfg.delays, DelayConfig::default());
    }

    #[test]
    fn config_toml_custom_sections() {
        let toml = r#"
            output_dir = "out"
            batch_size = 10
            create_archive = false
            yt_dlp_path = "/opt/yt-dlp"

            [delays]
            item_min_secs = 0.5
            item_max_secs = 1.5
            batch_min_secs = 3
            batch_max_secs = 6

            [retry]
            max_attempts = 5
            base_delay_secs = 2.5

            [audio]
            format = "opus"
            quality = "0"
        "#;
        let cfg: PbdlConfig = toml::from_str(toml).unwrap();
        assert!(!cfg.create_archive);
        assert_eq!(cfg.yt_dlp_path, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(cfg.retry.max_attempts, 5);
        assert!((cfg.retry.base_delay_secs - 2.5).abs() < 1e-9);
        assert_eq!(cfg.delays.batch_min_secs, 3.0);
        assert_eq!(AudioOptions::from(&cfg.audio).format, "opus");
    }

    #[test]
    fn run_settings_from_default_config() {
        let s = RunSettings::from_config(&PbdlConfig::default()).unwrap();
        assert_eq!(s.batch_size.get(), 8);
        assert_eq!(s.retry.max_attempts(), 3);
        assert_eq!(s.retry.base_delay(), Duration::from_secs(5));
        assert_eq!(s.item_delay.min_secs(), 2.0);
        assert_eq!(s.batch_delay.max_secs(), 20.0);
    }

    #[test]
    fn run_settings_rejects_invalid_values() {
        let mut cfg = PbdlConfig::default();
        cfg.batch_size = 0;
        assert_eq!(RunSettings::from_config(&cfg), Err(ConfigError::ZeroBatchSize));

        let mut cfg = PbdlConfig::default();
        cfg.retry.max_attempts = 0;
        assert_eq!(RunSettings::from_config(&cfg), Err(ConfigError::ZeroAttempts));

        let mut cfg = PbdlConfig::default();
        cfg.delays.item_min_secs = 9.0;
        assert!(matches!(
            RunSettings::from_config(&cfg),
            Err(ConfigError::InvalidDelayRange { name: "item", .. })
        ));

        let mut cfg = PbdlConfig::default();
        cfg.retry.base_delay_secs = -1.0;
        assert_eq!(
            RunSettings::from_config(&cfg),
            Err(ConfigError::InvalidBaseDelay(-1.0))
        );
    }

    #[test]
    fn run_settings_rejects_delays_too_large_for_duration() {
        let mut cfg = PbdlConfig::default();
        cfg.retry.base_delay_secs = 1e20;
        assert_eq!(
            RunSettings::from_config(&cfg),
            Err(ConfigError::InvalidBaseDelay(1e20))
        );

        let mut cfg = PbdlConfig::default();
        cfg.delays.item_max_secs = 1e20;
        assert!(matches!(
            RunSettings::from_config(&cfg),
            Err(ConfigError::InvalidDelayRange { name: "item", .. })
        ));

        let mut cfg = PbdlConfig::default();
        cfg.retry.base_delay_secs = f64::NAN;
        assert!(matches!(
            RunSettings::from_config(&cfg),
            Err(ConfigError::InvalidBaseDelay(_))
        ));
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "batch_size = \"many\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));
    }
}
