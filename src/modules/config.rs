use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const DATA_DIR: &str = ".branch_proxy";
const CONFIG_FILE: &str = "config.json";

/// Get data directory path, creating it if needed
pub fn get_data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?;
    let data_dir = home.join(DATA_DIR);

    // Ensure directory exists
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

pub fn default_config_path() -> AppResult<PathBuf> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

/// Load application config; a missing file yields defaults
pub fn load_app_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_path.exists() {
        tracing::debug!("No config file at {:?}, using defaults", config_path);
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(&config_path)?;
    serde_json::from_str(&content).map_err(|e| {
        AppError::Config(format!(
            "Failed to parse config file {:?}: {}",
            config_path, e
        ))
    })
}

/// Save application config, returning the path written
pub fn save_app_config(config: &AppConfig, path: Option<&Path>) -> AppResult<PathBuf> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, content)?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_app_config(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config.proxy.port, 8000);
        assert!(!config.file_logging);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::new();
        config.proxy.port = 9123;
        config.proxy.request_timeout = Some(30);
        config.file_logging = true;

        let written = save_app_config(&config, Some(path.as_path())).unwrap();
        assert_eq!(written, path);

        let loaded = load_app_config(Some(path.as_path())).unwrap();
        assert_eq!(loaded.proxy.port, 9123);
        assert_eq!(loaded.proxy.request_timeout, Some(30));
        assert!(loaded.file_logging);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_app_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
