// ~/src/bootstrap.rs

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    data_loaders::{config::AppConfig, session::WorkspaceRecord},
    info,
    utility::expand_tilde,
    warn, DEBUG_NAME,
};

/// Profile directories under the Zen profiles root, sorted for a stable
/// menu. Empty means there is nothing to run against.
pub fn discover_profiles(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut profiles: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    profiles.sort();
    profiles
}

/// Pick the profile to run against: a configured name wins, a lone
/// profile is auto-selected, anything else asks.
pub fn choose_profile(profiles: &[String], config: &AppConfig) -> Option<String> {
    if let Some(wanted) = &config.profile {
        if profiles.iter().any(|p| p == wanted) {
            info!(
                "[{}][BOOTSTRAP] Using configured profile '{wanted}'",
                DEBUG_NAME
            );
            return Some(wanted.clone());
        }
        warn!(
            "[{}][BOOTSTRAP] Configured profile '{wanted}' not found; asking instead",
            DEBUG_NAME
        );
    }

    match profiles {
        [] => None,
        [only] => {
            info!(
                "[{}][BOOTSTRAP] Single profile '{only}' auto-selected",
                DEBUG_NAME
            );
            Some(only.clone())
        }
        _ => prompt_profile(profiles),
    }
}

fn prompt_profile(profiles: &[String]) -> Option<String> {
    println!("Available Zen profiles (about:support shows the active one):");
    for (index, profile) in profiles.iter().enumerate() {
        println!("  {}) {profile}", index + 1);
    }

    loop {
        let answer = prompt_line(&format!("Select a profile [1-{}]: ", profiles.len()))?;
        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=profiles.len()).contains(&n) => return Some(profiles[n - 1].clone()),
            _ => println!("Please enter a number between 1 and {}.", profiles.len()),
        }
    }
}

/// Resolve the source image for one workspace: a config rule wins,
/// otherwise ask, defaulting to the backed-up current wallpaper.
pub fn resolve_source_image(
    space: &WorkspaceRecord,
    config: &AppConfig,
    fallback: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(rule) = config.rule_for(&space.uuid, &space.name) {
        info!(
            "[{}][BOOTSTRAP] Workspace '{}' uses configured image {}",
            DEBUG_NAME,
            space.name,
            rule.image.display()
        );
        return Some(rule.image.clone());
    }

    let hint = fallback
        .map(|p| format!(" (default: current wallpaper {})", p.display()))
        .unwrap_or_default();
    let message = format!("Image path for \"{}\" ({}){hint}: ", space.name, space.uuid);

    loop {
        let answer = prompt_line(&message)?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            match fallback {
                Some(path) => return Some(path.to_path_buf()),
                None => {
                    println!("No default available; please enter a path.");
                    continue;
                }
            }
        } else {
            return Some(expand_tilde(trimmed));
        }
    }
}

fn prompt_line(message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        // EOF: a headless run without a matching config rule.
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            warn!("[{}][BOOTSTRAP] Failed to read stdin: {e}", DEBUG_NAME);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_skips_plain_files_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("zeta.default")).unwrap();
        fs::create_dir(root.path().join("alpha.dev")).unwrap();
        fs::write(root.path().join("profiles.ini"), b"[General]").unwrap();

        assert_eq!(
            discover_profiles(root.path()),
            vec!["alpha.dev".to_string(), "zeta.default".to_string()]
        );
    }

    #[test]
    fn discover_on_a_missing_root_is_empty() {
        assert!(discover_profiles(Path::new("/nonexistent/Profiles")).is_empty());
    }

    #[test]
    fn a_configured_profile_wins() {
        let mut config = AppConfig::default();
        config.profile = Some("beta".to_string());
        let profiles = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(choose_profile(&profiles, &config), Some("beta".to_string()));
    }

    #[test]
    fn a_lone_profile_is_auto_selected() {
        let profiles = vec!["only.default".to_string()];
        assert_eq!(
            choose_profile(&profiles, &AppConfig::default()),
            Some("only.default".to_string())
        );
    }

    #[test]
    fn no_profiles_means_no_choice() {
        assert_eq!(choose_profile(&[], &AppConfig::default()), None);
    }

    #[test]
    fn a_config_rule_skips_the_prompt() {
        let config = AppConfig::from_yaml(
            &serde_yaml::from_str("wallpapers:\n  Work: /img/work.png\n").unwrap(),
        )
        .unwrap();
        let space = WorkspaceRecord {
            uuid: "{abc}".to_string(),
            name: "Work".to_string(),
        };

        assert_eq!(
            resolve_source_image(&space, &config, None),
            Some(PathBuf::from("/img/work.png"))
        );
    }
}
