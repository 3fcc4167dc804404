// ~/src/data_loaders/prefs.rs

use std::sync::LazyLock;

use regex::Regex;

/// The pref line Zen rewrites on every workspace switch.
static ACTIVE_WORKSPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"user_pref\("zen\.workspaces\.active",\s*"([^"]+)"\);"#)
        .expect("active-workspace pattern is valid")
});

/// Extract the active workspace token from prefs.js contents. A missing
/// pref is not an error; the file may be mid-write or the update may be
/// unrelated.
pub fn extract_active_workspace(contents: &str) -> Option<&str> {
    ACTIVE_WORKSPACE
        .captures(contents)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
