//! Configuration management
//!
//! Compatible with the mobile app settings.json format:
//! ```json
//! {
//!   "app": { "serverUrl": "https://api.example.com", "demoMode": false, ... }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080/api";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    server_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Skillet configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub server_url: String,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            server_url: DEFAULT_SERVER_URL.to_string(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the skillet directory
    ///
    /// Overrides, mainly for CI/testing:
    /// - `SKILLET_DEMO_MODE` switches the mock backend on or off
    /// - `SKILLET_SERVER_URL` points at a different backend
    pub fn load(skillet_dir: &Path) -> Result<Self> {
        let settings_path = skillet_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("SKILLET_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let server_url = std::env::var("SKILLET_SERVER_URL")
            .ok()
            .or_else(|| raw.app.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Ok(Self {
            demo_mode,
            server_url,
            _raw_settings: raw,
        })
    }

    /// Save config to the skillet directory
    /// Preserves settings that this client doesn't manage
    pub fn save(&self, skillet_dir: &Path) -> Result<()> {
        let settings_path = skillet_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.app.server_url = Some(self.server_url.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"serverUrl":"https://api.test","notifications":true},"theme":{"accent":"green"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.server_url, "https://api.test");
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["theme"]["accent"], "green");
        assert_eq!(value["app"]["notifications"], true);
    }
}
