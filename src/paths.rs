//! Common paths for SwipePedia data storage
//!
//! All SwipePedia data is stored under ~/.config/swipepedia/ on all platforms:
//! - config.toml - User configuration
//! - swipepedia.sqlite - Key-value store (bookmarks)
//! - events.jsonl - Local analytics log

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the SwipePedia data directory (~/.config/swipepedia/)
pub fn swipepedia_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("swipepedia");
    fs::create_dir_all(&dir).context("Failed to create swipepedia directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/swipepedia/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(swipepedia_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/swipepedia/swipepedia.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(swipepedia_dir()?.join("swipepedia.sqlite"))
}

/// Get the analytics log path (~/.config/swipepedia/events.jsonl)
pub fn events_path() -> Result<PathBuf> {
    Ok(swipepedia_dir()?.join("events.jsonl"))
}
