//! Platform-specific path detection for osu!lazer data directories

use std::path::{Path, PathBuf};

use crate::lazer::REALM_FILE_NAME;

/// Default lazer data directory for this platform
///
/// - Windows: `%APPDATA%\osu`
/// - Linux: `~/.local/share/osu`
/// - macOS: `~/Library/Application Support/osu`
pub fn default_lazer_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("osu"))
}

/// Detect an existing osu!lazer data directory
pub fn detect_lazer_path() -> Option<PathBuf> {
    default_lazer_path().filter(|path| validate_lazer_path(path))
}

/// Check if a path is a valid osu!lazer data directory
/// Looks for: client.realm file
pub fn validate_lazer_path(path: &Path) -> bool {
    path.is_dir() && path.join(REALM_FILE_NAME).exists()
}
