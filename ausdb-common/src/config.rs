//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = load_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_folder) = config.get("data_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(get_default_data_folder())
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/ausdb/config.toml first, then /etc/ausdb/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("ausdb").join("config.toml"));
        let system_config = PathBuf::from("/etc/ausdb/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("ausdb").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data folder path
fn get_default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("ausdb"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/ausdb"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("ausdb"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/ausdb"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("ausdb"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\ausdb"))
    } else {
        PathBuf::from("./ausdb_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let resolved = resolve_data_folder(Some("/tmp/from-cli"), "AUSDB_TEST_UNSET_VAR").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
    }

    #[test]
    fn test_env_var_used_when_no_cli_arg() {
        std::env::set_var("AUSDB_TEST_DATA_FOLDER", "/tmp/from-env");
        let resolved = resolve_data_folder(None, "AUSDB_TEST_DATA_FOLDER").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
        std::env::remove_var("AUSDB_TEST_DATA_FOLDER");
    }

    #[test]
    fn test_fallback_returns_some_path() {
        // With neither CLI arg nor env var, resolution still succeeds
        let resolved = resolve_data_folder(None, "AUSDB_TEST_UNSET_VAR_2").unwrap();
        assert!(!resolved.as_os_str().is_empty());
    }
}
