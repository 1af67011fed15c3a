use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pagination::WindowPolicy;
use crate::selection::{DEFAULT_ENDPOINT, normalize_endpoint};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedEndpoint {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub default_endpoint: String,
    pub window_policy: WindowPolicy,
    pub page_size: usize,
    pub reset_page_on_date_filter: bool,
    pub clamp_next_page: bool,
    pub saved_endpoints: Vec<SavedEndpoint>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_endpoint: DEFAULT_ENDPOINT.to_string(),
            window_policy: WindowPolicy::Paged,
            page_size: 10,
            reset_page_on_date_filter: false,
            clamp_next_page: false,
            saved_endpoints: Vec::new(),
            path: None,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file in the user's home directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".rowscope").join("config.json"))
    }

    /// Load from the home directory, falling back to defaults on any failure
    pub fn load_or_default() -> Self {
        match Self::config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, creating a default file if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            serde_json::from_str::<AppConfig>(&contents)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?
        } else {
            AppConfig::default()
        };
        config.path = Some(path.to_path_buf());

        if !path.exists() {
            config.save()?;
        }
        log::info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save configuration to its backing file, if it has one
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            log::debug!("Configuration has no backing file, not saving");
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a saved endpoint, ensuring unique names
    pub fn add_endpoint(&mut self, name: &str, url: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("Endpoint name must not be empty"));
        }
        if !self.is_name_unique(name) {
            return Err(anyhow::anyhow!("Endpoint name '{}' already exists", name));
        }

        self.saved_endpoints.push(SavedEndpoint {
            name: name.to_string(),
            url: normalize_endpoint(url),
        });
        self.save()?;
        Ok(())
    }

    pub fn remove_endpoint(&mut self, name: &str) -> Result<()> {
        let initial_len = self.saved_endpoints.len();
        self.saved_endpoints.retain(|e| e.name != name);

        if self.saved_endpoints.len() < initial_len {
            self.save()?;
            Ok(())
        } else {
            Err(anyhow::anyhow!("Endpoint '{}' not found", name))
        }
    }

    pub fn get_endpoint(&self, name: &str) -> Option<&SavedEndpoint> {
        self.saved_endpoints.iter().find(|e| e.name == name)
    }

    pub fn is_name_unique(&self, name: &str) -> bool {
        !self.saved_endpoints.iter().any(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_endpoint, "http://127.0.0.1:8001/");
        assert_eq!(config.window_policy, WindowPolicy::Paged);
        assert_eq!(config.page_size, 10);
        assert!(!config.reset_page_on_date_filter);
        assert!(!config.clamp_next_page);
    }

    #[test]
    fn test_add_endpoint() {
        let mut config = AppConfig::default();

        assert!(config.add_endpoint("local", "http://localhost:8001").is_ok());
        assert_eq!(config.saved_endpoints.len(), 1);
        assert_eq!(
            config.get_endpoint("local").unwrap().url,
            "http://localhost:8001/"
        );

        // Test duplicate name
        assert!(config.add_endpoint("local", "http://other:8001").is_err());
        assert_eq!(config.saved_endpoints.len(), 1);
        assert!(config.add_endpoint("  ", "http://other:8001").is_err());
    }

    #[test]
    fn test_name_uniqueness() {
        let mut config = AppConfig::default();

        assert!(config.is_name_unique("local"));
        config.add_endpoint("local", "http://localhost:8001/").unwrap();
        assert!(!config.is_name_unique("local"));
        assert!(config.is_name_unique("remote"));
    }

    #[test]
    fn test_remove_endpoint() {
        let mut config = AppConfig::default();
        config.add_endpoint("local", "http://localhost:8001/").unwrap();

        assert!(config.remove_endpoint("local").is_ok());
        assert!(config.saved_endpoints.is_empty());
        assert!(config.remove_endpoint("local").is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "window_policy": "single_row", "clamp_next_page": true }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.window_policy, WindowPolicy::SingleRow);
        assert!(config.clamp_next_page);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::load_from(&path).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_saved_endpoints_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::load_from(&path).unwrap();
        config.add_endpoint("staging", "https://staging.example.com").unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            reloaded.get_endpoint("staging").unwrap().url,
            "https://staging.example.com/"
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
