// ~/src/paths.rs

use std::path::PathBuf;

use crate::{info, warn};

pub fn user_home_dir() -> Option<PathBuf> {
    // Primary (always set in a login session)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }

    // Fallback (launchd jobs occasionally strip HOME)
    match std::env::var("USERPROFILE") {
        Ok(profile) => {
            info!("Resolved home directory from USERPROFILE: {}", profile);
            Some(PathBuf::from(profile))
        }
        Err(_) => {
            warn!("Could not resolve home directory using HOME or USERPROFILE");
            None
        }
    }
}

/// The canonical app root is always `~/.zen-wallpaper/`.
/// The config, the managed wallpaper copies, and the log live here.
pub fn app_root_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ZEN_WALLPAPER_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = user_home_dir() {
        home.join(".zen-wallpaper")
    } else {
        warn!("Could not resolve home directory, falling back to working directory");
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".zen-wallpaper")
    }
}

pub fn wallpapers_dir() -> PathBuf {
    app_root_dir().join("wallpapers")
}

pub fn config_path() -> PathBuf {
    app_root_dir().join("config.yaml")
}

/// Where Zen keeps its profile directories. `ZEN_PROFILES_DIR` overrides
/// the conventional location.
pub fn zen_profiles_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ZEN_PROFILES_DIR") {
        return Some(PathBuf::from(dir));
    }

    user_home_dir().map(|home| home.join("Library/Application Support/zen/Profiles"))
}
