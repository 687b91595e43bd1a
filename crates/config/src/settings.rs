// Client settings
// Loaded from ~/.config/transcheck/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use transcheck_engine::{Limits, MAX_FILE_BYTES, MAX_ROWS_PER_SHEET};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Checking service
    #[serde(rename = "api.base")]
    pub api_base: String,

    #[serde(rename = "api.timeoutSecs")]
    pub timeout_secs: Option<u64>,  // None = HTTP client default

    // Page address used for project links
    #[serde(rename = "page.baseUrl")]
    pub page_base_url: String,

    // Pre-check limits
    #[serde(rename = "limits.maxFileSizeMb")]
    pub max_file_size_mb: u64,

    #[serde(rename = "limits.maxRowsPerSheet")]
    pub max_rows_per_sheet: u32,

    // Downloads
    #[serde(rename = "download.directory")]
    pub download_directory: Option<PathBuf>,  // None = current directory
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000".to_string(),
            timeout_secs: None,
            page_base_url: "http://localhost:5000/index.html".to_string(),
            max_file_size_mb: MAX_FILE_BYTES / (1024 * 1024),
            max_rows_per_sheet: MAX_ROWS_PER_SHEET,
            download_directory: None,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Checking service (requests go to <api.base>/api/...)
    "api.base": "http://localhost:5000",
    // Seconds before a request is abandoned; null = no client-side limit
    "api.timeoutSecs": null,

    // Page address used when printing project links
    "page.baseUrl": "http://localhost:5000/index.html",

    // Pre-check limits (keep in step with the server)
    "limits.maxFileSizeMb": 10,
    "limits.maxRowsPerSheet": 70000,

    // Where checked files are saved; null = current directory
    "download.directory": null
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("transcheck");
        config_dir.join("settings.json")
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file means defaults; an unreadable
    /// or malformed one is reported and also means defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}", path.display(), e);
                    log::warn!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Write the commented default file to `path` unless one already exists.
    /// Returns whether a file was written.
    pub fn create_default_file(path: &Path) -> Result<bool, String> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Error creating config directory: {}", e))?;
        }
        fs::write(path, DEFAULT_FILE)
            .map_err(|e| format!("Error writing {}: {}", path.display(), e))?;
        Ok(true)
    }

    /// Pre-check limits in the engine's terms.
    pub fn limits(&self) -> Limits {
        Limits {
            max_file_bytes: self.max_file_size_mb.saturating_mul(1024 * 1024),
            max_rows_per_sheet: self.max_rows_per_sheet,
        }
    }

    /// Directory downloads are written to.
    pub fn download_dir(&self) -> PathBuf {
        self.download_directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
