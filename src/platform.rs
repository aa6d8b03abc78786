// Lokal Jobs platform paths
// Linux:   $XDG_CONFIG_HOME/lokaljobs, $XDG_DATA_HOME/lokaljobs (XDG defaults otherwise)
// macOS:   ~/Library/Application Support/LokalJobs
// Windows: %APPDATA%\LokalJobs

use std::env;
use std::path::PathBuf;

fn home() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var_os(var) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir).join("lokaljobs"),
        _ => fallback
            .iter()
            .fold(home(), |path, part| path.join(part))
            .join("lokaljobs"),
    }
}

#[cfg(target_os = "macos")]
fn app_support_dir() -> PathBuf {
    home()
        .join("Library")
        .join("Application Support")
        .join("LokalJobs")
}

#[cfg(target_os = "windows")]
fn app_data_dir() -> PathBuf {
    env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| home().join("AppData").join("Roaming"))
        .join("LokalJobs")
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        app_data_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Directory holding the bookmark database.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        app_data_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}
