use std::path::PathBuf;

use crate::paths::user_home_dir;

/// Strip the `{` / `}` delimiters Zen wraps around workspace UUIDs so
/// the identifier is safe to use as a file name. Idempotent.
pub fn sanitize_workspace_id(id: &str) -> String {
    id.chars().filter(|c| *c != '{' && *c != '}').collect()
}

/// Expand a leading `~/` against the user's home directory.
pub fn expand_tilde(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = user_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_braces() {
        assert_eq!(sanitize_workspace_id("{abc-123}"), "abc-123");
        assert_eq!(sanitize_workspace_id("abc-123"), "abc-123");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_workspace_id("{abc-123}");
        assert_eq!(sanitize_workspace_id(&once), once);
    }

    #[test]
    fn sanitize_handles_stray_delimiters() {
        assert_eq!(sanitize_workspace_id("{a}{b}"), "ab");
        assert_eq!(sanitize_workspace_id(""), "");
    }

    #[test]
    fn expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("/tmp/x.png"), PathBuf::from("/tmp/x.png"));
        assert_eq!(expand_tilde("relative.png"), PathBuf::from("relative.png"));
    }
}
