// src/infra/paths.rs — Path management
//
// All paths respect the MILES_HOME environment variable for isolation.
// When MILES_HOME is set, config lives under that directory; when unset,
// config uses ~/.miles/.

use std::path::PathBuf;

fn miles_home() -> Option<PathBuf> {
    std::env::var_os("MILES_HOME").map(PathBuf::from)
}

/// Configuration directory: $MILES_HOME/ or ~/.miles/
pub fn config_dir() -> PathBuf {
    if let Some(home) = miles_home() {
        return home;
    }
    dirs_home().join(".miles")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
