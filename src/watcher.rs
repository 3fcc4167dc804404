use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant, SystemTime},
};

use crate::{
    data_loaders::prefs::extract_active_workspace,
    info,
    wallpaper_engine::{WallpaperError, WallpaperStore},
    warn, DEBUG_NAME,
};

const TICK_SLEEP: Duration = Duration::from_millis(100);

/// Watches prefs.js and drives the store when the active workspace
/// changes. Applies run inline on the watcher's thread, so they are
/// serialized and every poll reads the latest value; bursts coalesce
/// into whatever the file says by the time it is read.
pub struct PrefsWatcher {
    prefs_path: PathBuf,
    interval: Duration,
    last_modified: Option<SystemTime>,
    last_applied: Option<String>,
}

impl PrefsWatcher {
    pub fn new(prefs_path: PathBuf, interval: Duration) -> Self {
        Self {
            prefs_path,
            interval: interval.max(Duration::from_millis(100)),
            last_modified: None,
            last_applied: None,
        }
    }

    /// Poll until `shutdown` is raised. The mtime baseline is taken on
    /// entry, so only edits made after watching begins trigger an apply.
    pub fn watch(&mut self, store: &WallpaperStore, shutdown: &AtomicBool) {
        self.last_modified = self.modified();
        let mut last_poll = Instant::now();
        info!(
            "[{}][WATCHER] Watching {} for workspace changes",
            DEBUG_NAME,
            self.prefs_path.display()
        );

        while !shutdown.load(Ordering::Relaxed) {
            if last_poll.elapsed() >= self.interval {
                last_poll = Instant::now();
                self.tick(store);
            }
            thread::sleep(TICK_SLEEP);
        }
        info!("[{}][WATCHER] Shutdown requested, watcher stopping", DEBUG_NAME);
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.prefs_path).and_then(|m| m.modified()).ok()
    }

    /// One poll step: detect a rewrite, re-read the file, and apply the
    /// active workspace if it differs from the last one applied.
    fn tick(&mut self, store: &WallpaperStore) {
        let current = self.modified();
        let changed = match (self.last_modified, current) {
            (Some(prev), Some(curr)) => curr > prev,
            (None, Some(_)) => true,
            _ => false,
        };
        if !changed {
            return;
        }
        self.last_modified = current;

        let contents = match fs::read_to_string(&self.prefs_path) {
            Ok(text) => text,
            Err(e) => {
                // Zen replaces the file on save; a racing read can lose.
                warn!(
                    "[{}][WATCHER] Failed to read {}: {e}",
                    DEBUG_NAME,
                    self.prefs_path.display()
                );
                return;
            }
        };

        let Some(token) = extract_active_workspace(&contents) else {
            return;
        };
        if self.last_applied.as_deref() == Some(token) {
            return;
        }

        match store.apply(token) {
            Ok(()) => {
                info!(
                    "[{}][WATCHER] Applied wallpaper for workspace '{token}'",
                    DEBUG_NAME
                );
                self.last_applied = Some(token.to_string());
            }
            Err(e @ WallpaperError::NotAssigned { .. }) => {
                warn!(
                    "[{}][WATCHER] {e}; keeping the previous wallpaper",
                    DEBUG_NAME
                );
            }
            Err(e) => {
                warn!("[{}][WATCHER] Apply failed for '{token}': {e}", DEBUG_NAME);
            }
        }
    }
}
