use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the stored draft
    pub storage_dir: PathBuf,
    pub editor: EditorConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before a changed draft is written
    pub debounce_ms: u64,
    /// How long a notification stays visible
    pub notification_ms: u64,
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub default_width: u32,
    pub default_height: u32,
    pub file_prefix: String,
    /// Where exported files are written
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("~/.local/share/draftpad"),
            editor: EditorConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            notification_ms: 3000,
            storage_key: "draftpad-content".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 450,
            default_width: 400,
            default_height: 300,
            file_prefix: "draft".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config.with_expanded_paths()))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The config file's contents, or the defaults when there is no file
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from_path(Self::config_path())
    }

    pub fn load_or_default_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        match Self::load_from_path(config_path)? {
            Some(config) => Ok(config),
            None => Ok(Self::default().with_expanded_paths()),
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/draftpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand shell variables and tilde in every path value. Paths that fail
    /// to expand are kept as written.
    pub fn with_expanded_paths(mut self) -> Self {
        self.storage_dir = Self::expand_path(&self.storage_dir).unwrap_or(self.storage_dir);
        self.export.output_dir =
            Self::expand_path(&self.export.output_dir).unwrap_or(self.export.output_dir);
        self
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
