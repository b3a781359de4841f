use std::path::PathBuf;

pub const ROOT_ENV: &str = "GROUPDESK_ROOT";

/// Returns the groupdesk state directory.
///
/// Resolution order:
/// 1. `GROUPDESK_ROOT` environment variable (if set)
/// 2. Current working directory + `.groupdesk`
pub fn groupdesk_root() -> PathBuf {
    if let Ok(root) = std::env::var(ROOT_ENV) {
        PathBuf::from(root)
    } else {
        PathBuf::from(".groupdesk")
    }
}
