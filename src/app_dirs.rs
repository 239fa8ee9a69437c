use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "carrot-field";
const LOG_FILE: &str = "carrot-field.log";

/// Where the game keeps files that are not settings.
pub struct AppDirs;

impl AppDirs {
    /// Log file under the platform state dir, or the local data dir on
    /// platforms without one.
    pub fn log_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", APP_NAME)?;
        let base = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
        Some(base.join(LOG_FILE))
    }
}
