mod bootstrap;
mod data_loaders;
mod desktop;
mod logging;
mod paths;
mod utility;
mod wallpaper_engine;
mod watcher;

use std::{
    fs,
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{
    data_loaders::{config::AppConfig, session},
    desktop::FinderDesktop,
    paths::{config_path, wallpapers_dir, zen_profiles_dir},
    wallpaper_engine::WallpaperStore,
    watcher::PrefsWatcher,
};

pub const APP_NAME: &str = "zen-wallpaper";
pub const DEBUG_NAME: &str = "ZEN";

const SESSION_FILE: &str = "zen-sessions.jsonlz4";
const PREFS_FILE: &str = "prefs.js";

fn main() -> ExitCode {
    logging::init(false);

    let config = AppConfig::load(&config_path()).unwrap_or_default();
    logging::set_debug(config.debug);

    std::panic::set_hook(Box::new(|panic_info| {
        error!("[{}] Panic: {}", DEBUG_NAME, panic_info);
    }));

    info!("!---------- [{}] Starting {} ----------!", DEBUG_NAME, APP_NAME);

    let Some(profiles_root) = zen_profiles_dir() else {
        eprintln!("Could not resolve the Zen profiles directory (set ZEN_PROFILES_DIR to override).");
        error!("[{}] No profiles root resolved", DEBUG_NAME);
        return ExitCode::FAILURE;
    };

    let profiles = bootstrap::discover_profiles(&profiles_root);
    if profiles.is_empty() {
        eprintln!("No Zen profiles found under {}.", profiles_root.display());
        error!(
            "[{}] No profiles under {}",
            DEBUG_NAME,
            profiles_root.display()
        );
        return ExitCode::FAILURE;
    }

    let Some(profile) = bootstrap::choose_profile(&profiles, &config) else {
        eprintln!("No profile selected.");
        return ExitCode::FAILURE;
    };

    let profile_dir = profiles_root.join(&profile);
    let session_path = profile_dir.join(SESSION_FILE);
    let prefs_path = profile_dir.join(PREFS_FILE);

    let raw = match fs::read(&session_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Could not read session file {}: {e}", session_path.display());
            error!("[{}] Session read failed: {e}", DEBUG_NAME);
            return ExitCode::FAILURE;
        }
    };

    // A container we cannot decode is fatal: without workspace data there
    // is nothing to assign wallpapers to.
    let workspaces = match session::decode(&raw).and_then(|doc| session::extract_workspaces(&doc)) {
        Ok(list) => list,
        Err(e) => {
            eprintln!(
                "Could not decode session file {}: {e}",
                session_path.display()
            );
            error!("[{}] Session decode failed: {e}", DEBUG_NAME);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "[{}] Decoded {} workspace(s) from {}",
        DEBUG_NAME,
        workspaces.len(),
        session_path.display()
    );
    if workspaces.is_empty() {
        warn!(
            "[{}] Session lists no workspaces; only the backup slot will exist",
            DEBUG_NAME
        );
    }

    let restore_timeout = Duration::from_millis(config.settings.restore.timeout_ms);
    let mut store = WallpaperStore::new(
        wallpapers_dir(),
        Box::new(FinderDesktop::new(restore_timeout)),
    );
    if let Err(e) = store.ensure_directory() {
        eprintln!("{e}");
        error!("[{}] {e}", DEBUG_NAME);
        return ExitCode::FAILURE;
    }

    let previous = store.backup_current();
    if previous.is_none() {
        warn!(
            "[{}] Continuing without a restorable wallpaper",
            DEBUG_NAME
        );
    }

    for space in &workspaces {
        let Some(source) = bootstrap::resolve_source_image(space, &config, previous.as_deref())
        else {
            warn!(
                "[{}] No image supplied for workspace '{}'; it keeps the previous wallpaper",
                DEBUG_NAME, space.name
            );
            continue;
        };

        match store.store_and_assign(&space.uuid, &source) {
            Ok(stored) => println!(
                "Set wallpaper for workspace \"{}\" to \"{}\"",
                space.name,
                stored.display()
            ),
            Err(e) => {
                // The path came from the user; report it and keep setting
                // up the remaining workspaces.
                eprintln!("Could not store image for workspace \"{}\": {e}", space.name);
                error!("[{}] Store failed for '{}': {e}", DEBUG_NAME, space.uuid);
            }
        }
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed)) {
            warn!(
                "[{}] Could not install termination handler: {e}",
                DEBUG_NAME
            );
        }
    }

    println!("Watching for workspace changes...");
    let interval = Duration::from_millis(config.settings.watcher.interval_ms);
    let mut watcher = PrefsWatcher::new(prefs_path, interval);
    watcher.watch(&store, &shutdown);

    // Only reached after a termination signal; put the desktop back the
    // way we found it before the process dies. The desktop call itself
    // is bounded, so shutdown cannot hang on a wedged script.
    if store.has_backup() {
        match store.restore_backup() {
            Ok(()) => println!("Restored previous wallpaper."),
            Err(e) => {
                eprintln!("Could not restore previous wallpaper: {e}");
                error!("[{}] Restore failed: {e}", DEBUG_NAME);
            }
        }
    }

    info!("!---------- [{}] {} stopped ----------!", DEBUG_NAME, APP_NAME);
    ExitCode::SUCCESS
}
