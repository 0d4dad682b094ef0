use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const CONFIG_SUBDIR: &str = "bankparse";

pub fn config_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_SUBDIR))
}

pub fn ensure_config_home() -> Result<PathBuf> {
    let dir = config_home()?;
    create_private_dir(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[cfg(unix)]
fn create_private_dir(dir: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &std::path::Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
