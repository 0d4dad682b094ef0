use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::state::ensure_config_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// IANA timezone the bank produces its exports in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Where parsed rows go when `--output` is not given (default: stdout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

fn default_timezone() -> String {
    bankparse_core::DEFAULT_SOURCE_TZ.name().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            output_file: None,
        }
    }
}

impl Config {
    pub fn source_tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {}", self.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_config_home()?.join("config.toml"))
}

/// Load `explicit` if given (it must exist), else the default config file,
/// writing a default one there on first use.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }

    let p = config_path()?;
    if !p.exists() {
        let cfg = Config::default();
        save_config(&p, &cfg)?;
        info!(path = %p.display(), "initialized default config");
        return Ok(cfg);
    }
    read_config(&p)
}

pub fn read_config(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.source_tz()
        .with_context(|| format!("parse {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config to `p` unless something is already there.
/// Returns whether a file was written.
pub fn init_config(p: &Path) -> Result<bool> {
    if p.exists() {
        return Ok(false);
    }
    save_config(p, &Config::default())?;
    Ok(true)
}
