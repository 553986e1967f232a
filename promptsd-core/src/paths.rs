//! Where the server keeps its config and log files.
//!
//! Defaults follow the desktop layout (`~/.config/promptsd`, logs in the
//! platform cache dir). Setting `PROMPTSD_CONFIG_DIR` moves both into one
//! directory, which suits containers and service accounts without a home.

use std::ffi::OsString;
use std::path::PathBuf;

/// The name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "promptsd";

/// The name of the main configuration file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The name of the log file written when file logging is enabled
pub const LOG_FILE_NAME: &str = "promptsd.log";

/// Environment variable overriding the config and log directory
pub const CONFIG_DIR_ENV: &str = "PROMPTSD_CONFIG_DIR";

/// Configuration directory: `$PROMPTSD_CONFIG_DIR`, else `~/.config/promptsd/`
#[must_use]
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV), dirs::home_dir())
}

/// Get the config file path (`<config_dir>/config.toml`)
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Log file path: the overridden directory when set, else the platform cache dir
#[must_use]
pub fn log_file_path() -> PathBuf {
    resolve_log_dir(
        std::env::var_os(CONFIG_DIR_ENV),
        dirs::cache_dir(),
        dirs::home_dir(),
    )
    .join(LOG_FILE_NAME)
}

fn non_empty(dir: Option<OsString>) -> Option<PathBuf> {
    dir.filter(|d| !d.is_empty()).map(PathBuf::from)
}

fn resolve_config_dir(override_dir: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    non_empty(override_dir).unwrap_or_else(|| {
        home.unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(CONFIG_DIR_NAME)
    })
}

fn resolve_log_dir(
    override_dir: Option<OsString>,
    cache: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = non_empty(override_dir) {
        return dir;
    }
    cache.map_or_else(
        || resolve_config_dir(None, home),
        |dir| dir.join(CONFIG_DIR_NAME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/artist"))
    }

    #[test]
    fn test_default_dirs() {
        assert_eq!(
            resolve_config_dir(None, home()),
            PathBuf::from("/home/artist/.config/promptsd")
        );
        assert_eq!(
            resolve_log_dir(None, Some(PathBuf::from("/home/artist/.cache")), home()),
            PathBuf::from("/home/artist/.cache/promptsd")
        );
    }

    #[test]
    fn test_override_moves_config_and_logs() {
        let dir = Some(OsString::from("/srv/promptsd"));
        assert_eq!(resolve_config_dir(dir.clone(), home()), PathBuf::from("/srv/promptsd"));
        assert_eq!(
            resolve_log_dir(dir, Some(PathBuf::from("/home/artist/.cache")), home()),
            PathBuf::from("/srv/promptsd")
        );
    }

    #[test]
    fn test_empty_override_and_missing_dirs_fall_back() {
        assert_eq!(
            resolve_config_dir(Some(OsString::new()), home()),
            PathBuf::from("/home/artist/.config/promptsd")
        );
        // No cache dir: logs sit next to the config
        assert_eq!(
            resolve_log_dir(None, None, home()),
            PathBuf::from("/home/artist/.config/promptsd")
        );
        assert_eq!(resolve_config_dir(None, None), PathBuf::from("./.config/promptsd"));
    }
}
