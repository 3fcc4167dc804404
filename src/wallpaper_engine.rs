use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    desktop::{Desktop, DesktopError},
    info,
    utility::sanitize_workspace_id,
    warn, DEBUG_NAME,
};

/// Slot the pre-existing wallpaper is backed up under.
pub const DEFAULT_SLOT: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum WallpaperError {
    #[error("no wallpaper assigned for workspace '{id}'")]
    NotAssigned { id: String },
    #[error("failed to copy '{src}' to '{dst}': {source}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create wallpaper directory '{dir}': {source}")]
    DirFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Desktop(#[from] DesktopError),
}

/// Owns the managed wallpaper directory and the workspace → image map,
/// and talks to the desktop on behalf of the watcher.
pub struct WallpaperStore {
    dir: PathBuf,
    assignments: HashMap<String, PathBuf>,
    desktop: Box<dyn Desktop>,
    backup_captured: bool,
}

impl WallpaperStore {
    pub fn new(dir: PathBuf, desktop: Box<dyn Desktop>) -> Self {
        Self {
            dir,
            assignments: HashMap::new(),
            desktop,
            backup_captured: false,
        }
    }

    /// Idempotent; the directory survives across runs and a re-run
    /// overwrites its contents.
    pub fn ensure_directory(&self) -> Result<(), WallpaperError> {
        fs::create_dir_all(&self.dir).map_err(|e| WallpaperError::DirFailed {
            dir: self.dir.clone(),
            source: e,
        })
    }

    /// Copy `src` into the managed directory under the sanitized
    /// identifier and record the assignment.
    pub fn store_and_assign(&mut self, id: &str, src: &Path) -> Result<PathBuf, WallpaperError> {
        let slot = sanitize_workspace_id(id);
        let dst = self.dir.join(&slot);

        match image::image_dimensions(src) {
            Ok((w, h)) => info!(
                "[{}][STORE] '{}' decodes as a {w}x{h} image",
                DEBUG_NAME,
                src.display()
            ),
            Err(_) => warn!(
                "[{}][STORE] '{}' does not decode as an image; storing it anyway",
                DEBUG_NAME,
                src.display()
            ),
        }

        // Re-running with the stored copy as the source must not truncate it.
        let same_file = match (fs::canonicalize(src), fs::canonicalize(&dst)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            fs::copy(src, &dst).map_err(|e| WallpaperError::CopyFailed {
                src: src.to_path_buf(),
                dst: dst.clone(),
                source: e,
            })?;
        }

        self.assignments.insert(slot, dst.clone());
        Ok(dst)
    }

    pub fn assignment(&self, id: &str) -> Option<&Path> {
        self.assignments
            .get(&sanitize_workspace_id(id))
            .map(PathBuf::as_path)
    }

    /// Point the desktop at the stored wallpaper for `id`. An identifier
    /// nobody assigned is recoverable; callers log it and keep going.
    pub fn apply(&self, id: &str) -> Result<(), WallpaperError> {
        let slot = sanitize_workspace_id(id);
        let Some(stored) = self.assignments.get(&slot) else {
            return Err(WallpaperError::NotAssigned { id: id.to_string() });
        };
        self.desktop.set_wallpaper(stored)?;
        Ok(())
    }

    /// Capture whatever is on the desktop right now under the `default`
    /// slot and return its original path. Failure leaves the run without
    /// a restore target, which is survivable.
    pub fn backup_current(&mut self) -> Option<PathBuf> {
        let current = match self.desktop.current_wallpaper() {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "[{}][BACKUP] Could not read the current wallpaper: {e}",
                    DEBUG_NAME
                );
                return None;
            }
        };

        match self.store_and_assign(DEFAULT_SLOT, &current) {
            Ok(stored) => {
                self.backup_captured = true;
                info!(
                    "[{}][BACKUP] Saved current wallpaper {} -> {}",
                    DEBUG_NAME,
                    current.display(),
                    stored.display()
                );
                Some(current)
            }
            Err(e) => {
                warn!(
                    "[{}][BACKUP] Could not store the current wallpaper: {e}",
                    DEBUG_NAME
                );
                None
            }
        }
    }

    pub fn has_backup(&self) -> bool {
        self.backup_captured
    }

    /// Put the pre-run wallpaper back. No-op when the backup was never
    /// captured.
    pub fn restore_backup(&self) -> Result<(), WallpaperError> {
        if !self.backup_captured {
            return Ok(());
        }
        self.apply(DEFAULT_SLOT)
    }
}
