//! `pbdl config` – show where the config lives and what is in effect.

use anyhow::Result;
use pbdl_core::config::{self, PbdlConfig};
use pbdl_core::logging;
use std::path::Path;

pub fn run_show_config(cfg: &PbdlConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# config: {}", path.display());
    if let Ok(log) = logging::log_file_path() {
        println!("# log:    {}", log.display());
    }
    print!("{}", cfg.to_toml()?);
    Ok(())
}
