use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use super::yaml::load_yaml;
use crate::utility::{expand_tilde, sanitize_workspace_id};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub profile: Option<String>,
    pub settings: Settings,
    pub wallpapers: Vec<WallpaperRule>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub watcher: WatcherSettings,
    pub restore: RestoreSettings,
}

#[derive(Debug, Clone)]
pub struct WatcherSettings {
    pub interval_ms: u64,
}

#[derive(Debug, Clone)]
pub struct RestoreSettings {
    pub timeout_ms: u64,
}

/// One `wallpapers:` entry. The key matches a workspace UUID (braces
/// optional) or a workspace display name.
#[derive(Debug, Clone)]
pub struct WallpaperRule {
    pub key: String,
    pub image: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            profile: None,
            settings: Settings::default(),
            wallpapers: Vec::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watcher: WatcherSettings::default(),
            restore: RestoreSettings::default(),
        }
    }
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Option<Self> {
        let value = load_yaml(path)?;
        Self::from_yaml(&value)
    }

    pub fn from_yaml(root: &Value) -> Option<Self> {
        let map = root.as_mapping()?;

        Some(Self {
            debug: bool_at(map, "debug").unwrap_or(false),
            profile: str_at(map, "profile").map(str::to_string),
            settings: parse_settings(map),
            wallpapers: parse_wallpaper_rules(map),
        })
    }

    /// Find the rule covering a workspace, matching the UUID with or
    /// without its braces, or the display name exactly.
    pub fn rule_for(&self, uuid: &str, name: &str) -> Option<&WallpaperRule> {
        let bare = sanitize_workspace_id(uuid);
        self.wallpapers.iter().find(|rule| {
            sanitize_workspace_id(&rule.key) == bare || (!name.is_empty() && rule.key == name)
        })
    }
}

fn parse_settings(root: &Mapping) -> Settings {
    let mut settings = Settings::default();

    let settings_map = mapping_at(root, "settings");

    if let Some(watcher) = settings_map.and_then(|m| mapping_at(m, "watcher")) {
        settings.watcher.interval_ms = u64_at(watcher, "interval_ms")
            .unwrap_or(settings.watcher.interval_ms)
            .max(100);
    }

    if let Some(restore) = settings_map.and_then(|m| mapping_at(m, "restore")) {
        settings.restore.timeout_ms = u64_at(restore, "timeout_ms")
            .unwrap_or(settings.restore.timeout_ms)
            .max(500);
    }

    settings
}

fn parse_wallpaper_rules(map: &Mapping) -> Vec<WallpaperRule> {
    let Some(rules) = mapping_at(map, "wallpapers") else {
        return Vec::new();
    };

    let mut parsed = Vec::<WallpaperRule>::new();
    for (k, v) in rules.iter() {
        let (Some(key), Some(raw)) = (k.as_str(), v.as_str()) else {
            continue;
        };
        if key.is_empty() || raw.trim().is_empty() {
            continue;
        }
        parsed.push(WallpaperRule {
            key: key.to_string(),
            image: expand_tilde(raw.trim()),
        });
    }

    parsed
}

fn bool_at(map: &Mapping, key: &str) -> Option<bool> {
    map.get(Value::String(key.to_string()))?.as_bool()
}

fn str_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(Value::String(key.to_string()))?.as_str()
}

fn mapping_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(Value::String(key.to_string()))?.as_mapping()
}

fn u64_at(map: &Mapping, key: &str) -> Option<u64> {
    map.get(Value::String(key.to_string()))?
        .as_i64()
        .and_then(|v| if v >= 0 { Some(v as u64) } else { None })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> AppConfig {
        AppConfig::from_yaml(&serde_yaml::from_str(doc).unwrap()).unwrap()
    }

    #[test]
    fn full_document_parses() {
        let config = parse(
            r#"
debug: true
profile: alpha
settings:
  watcher:
    interval_ms: 250
  restore:
    timeout_ms: 2000
wallpapers:
  "{abc}": /img/work.png
  Home: /img/home.png
"#,
        );

        assert!(config.debug);
        assert_eq!(config.profile.as_deref(), Some("alpha"));
        assert_eq!(config.settings.watcher.interval_ms, 250);
        assert_eq!(config.settings.restore.timeout_ms, 2000);
        assert_eq!(config.wallpapers.len(), 2);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = parse("{}");
        assert!(!config.debug);
        assert_eq!(config.profile, None);
        assert_eq!(config.settings.watcher.interval_ms, 1000);
        assert_eq!(config.settings.restore.timeout_ms, 3000);
        assert!(config.wallpapers.is_empty());
    }

    #[test]
    fn intervals_are_clamped_to_sane_minimums() {
        let config = parse(
            r#"
settings:
  watcher:
    interval_ms: 5
  restore:
    timeout_ms: 1
"#,
        );
        assert_eq!(config.settings.watcher.interval_ms, 100);
        assert_eq!(config.settings.restore.timeout_ms, 500);
    }

    #[test]
    fn rule_lookup_ignores_uuid_braces() {
        let config = parse("wallpapers:\n  abc-123: /img/a.png\n");
        assert!(config.rule_for("{abc-123}", "Work").is_some());
        assert!(config.rule_for("abc-123", "").is_some());
        assert!(config.rule_for("{other}", "").is_none());
    }

    #[test]
    fn rule_lookup_matches_display_names() {
        let config = parse("wallpapers:\n  Home: /img/home.png\n");
        assert!(config.rule_for("{xyz}", "Home").is_some());
        // An empty name must not match anything.
        assert!(config.rule_for("{xyz}", "").is_none());
    }

    #[test]
    fn load_returns_none_for_a_missing_file() {
        assert!(AppConfig::load(Path::new("/nonexistent/config.yaml")).is_none());
    }
}
