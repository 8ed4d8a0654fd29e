use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key under which the whole plugin configuration is stored as one JSON blob.
pub const STORAGE_KEY: &str = "callout-config";

pub const DEFAULT_GRID_COLUMNS: u8 = 3;
pub const MAX_GRID_COLUMNS: u8 = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read stored config {key} at {path}: {source}")]
    StorageRead {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write stored config {key} at {path}: {source}")]
    StorageWrite {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse stored config {key}: {source}")]
    Parse {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Visual theme applied to every callout type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Gradient backgrounds with a soft border.
    #[default]
    Modern,
    /// Solid swatch background with a thick left border.
    Classic,
    /// Border only.
    Minimal,
}

/// Background for a user-defined type: either a single CSS color or a
/// two-stop gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundConfig {
    Solid(String),
    Gradient { from: String, to: String },
}

/// A user-defined callout type, or an override of a built-in with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTypeConfig {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub commands: Vec<String>,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub background: Option<BackgroundConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    pub theme: ThemeChoice,
    /// Column count of the type picker grid.
    pub grid_columns: u8,
    pub custom_types: Vec<CustomTypeConfig>,
    /// Built-in type ids the user removed.
    pub hidden_types: Vec<String>,
    pub debug_logging: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            grid_columns: DEFAULT_GRID_COLUMNS,
            custom_types: Vec::new(),
            hidden_types: Vec::new(),
            debug_logging: false,
        }
    }
}

impl PluginConfig {
    /// Load the configuration blob from `storage`, falling back to defaults
    /// when nothing has been stored yet.
    pub fn load(storage: &dyn ConfigStorage) -> Result<Self, ConfigError> {
        match storage.load(STORAGE_KEY)? {
            Some(blob) => Self::from_json(&blob),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, storage: &dyn ConfigStorage) -> Result<(), ConfigError> {
        let blob = serde_json::to_string_pretty(self)?;
        storage.save(STORAGE_KEY, &blob)
    }

    pub fn from_json(blob: &str) -> Result<Self, ConfigError> {
        let config: PluginConfig =
            serde_json::from_str(blob).map_err(|source| ConfigError::Parse {
                key: STORAGE_KEY.to_string(),
                source,
            })?;
        Ok(config.normalized())
    }

    /// Clamp out-of-range values and drop unusable entries.
    pub fn normalized(mut self) -> Self {
        self.grid_columns = self.grid_columns.clamp(1, MAX_GRID_COLUMNS);

        for custom in &mut self.custom_types {
            custom.id = custom.id.trim().to_string();
        }
        self.custom_types.retain(|c| !c.id.is_empty());

        let mut hidden: Vec<String> = self
            .hidden_types
            .iter()
            .map(|id| id.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .collect();
        hidden.sort();
        hidden.dedup();
        self.hidden_types = hidden;

        self
    }

    pub fn is_hidden(&self, type_id: &str) -> bool {
        let type_id = type_id.to_lowercase();
        self.hidden_types.iter().any(|h| *h == type_id)
    }
}

/// Key-value blob storage offered by the host to plugins.
pub trait ConfigStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn save(&self, key: &str, data: &str) -> Result<(), ConfigError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            dir: Self::expand_path(dir).unwrap_or_else(|| dir.to_path_buf()),
        }
    }

    pub fn default_dir() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/quote-callouts");
        PathBuf::from(config_dir.as_ref())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

impl ConfigStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| ConfigError::StorageRead {
                key: key.to_string(),
                path,
                source,
            })
    }

    fn save(&self, key: &str, data: &str) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, data)
        };
        write().map_err(|source| ConfigError::StorageWrite {
            key: key.to_string(),
            path: path.clone(),
            source,
        })
    }
}

/// In-process storage for hosts without a filesystem and for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, data: &str) -> Result<(), ConfigError> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn custom_warning() -> CustomTypeConfig {
        CustomTypeConfig {
            id: "deadline".to_string(),
            display_name: "Deadline".to_string(),
            commands: vec!["deadline".to_string(), "截止".to_string()],
            color: "#d9480f".to_string(),
            icon: "⏰".to_string(),
            border_color: None,
            background: Some(BackgroundConfig::Gradient {
                from: "#fff4e6".to_string(),
                to: "#ffe8cc".to_string(),
            }),
        }
    }

    #[test]
    fn test_default_dir() {
        let dir = FileStorage::default_dir();
        let dir_str = dir.to_string_lossy();

        assert!(!dir_str.starts_with('~'));
        assert!(dir_str.ends_with(".config/quote-callouts"));
    }

    #[test]
    fn test_missing_blob_yields_defaults() {
        let storage = MemoryStorage::new();
        let config = PluginConfig::load(&storage).unwrap();
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let config = PluginConfig::from_json(r#"{ "theme": "classic" }"#).unwrap();
        assert_eq!(config.theme, ThemeChoice::Classic);
        assert_eq!(config.grid_columns, DEFAULT_GRID_COLUMNS);
        assert!(!config.debug_logging);
    }

    #[test]
    fn test_grid_columns_clamped() {
        let wide = PluginConfig::from_json(r#"{ "gridColumns": 40 }"#).unwrap();
        assert_eq!(wide.grid_columns, MAX_GRID_COLUMNS);

        let zero = PluginConfig::from_json(r#"{ "gridColumns": 0 }"#).unwrap();
        assert_eq!(zero.grid_columns, 1);
    }

    #[test]
    fn test_malformed_blob_is_error() {
        let result = PluginConfig::from_json("{ theme: ");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_background_accepts_solid_and_gradient() {
        let blob = r##"{
            "customTypes": [
                { "id": "a", "displayName": "A", "color": "#111", "icon": "A", "background": "#eee" },
                { "id": "b", "displayName": "B", "color": "#222", "icon": "B",
                  "background": { "from": "#fff", "to": "#ddd" } }
            ]
        }"##;
        let config = PluginConfig::from_json(blob).unwrap();
        assert_eq!(
            config.custom_types[0].background,
            Some(BackgroundConfig::Solid("#eee".to_string()))
        );
        assert_eq!(
            config.custom_types[1].background,
            Some(BackgroundConfig::Gradient {
                from: "#fff".to_string(),
                to: "#ddd".to_string()
            })
        );
    }

    #[test]
    fn test_normalized_drops_blank_ids_and_dedups_hidden() {
        let mut blank = custom_warning();
        blank.id = "   ".to_string();
        let config = PluginConfig {
            custom_types: vec![blank, custom_warning()],
            hidden_types: vec!["Bug".to_string(), "bug".to_string(), " ".to_string()],
            ..PluginConfig::default()
        }
        .normalized();

        assert_eq!(config.custom_types.len(), 1);
        assert_eq!(config.hidden_types, vec!["bug".to_string()]);
        assert!(config.is_hidden("BUG"));
        assert!(!config.is_hidden("info"));
    }

    #[test]
    fn test_save_and_load_file_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));
        let config = PluginConfig {
            theme: ThemeChoice::Minimal,
            grid_columns: 4,
            custom_types: vec![custom_warning()],
            hidden_types: vec!["todo".to_string()],
            debug_logging: true,
        };

        config.save(&storage).unwrap();
        assert!(storage.path_for(STORAGE_KEY).exists());

        let loaded = PluginConfig::load(&storage).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_file_storage_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        assert_eq!(storage.load("nothing-here").unwrap(), None);
    }

    #[test]
    fn test_file_storage_expands_env_var() {
        unsafe {
            env::set_var("QUOTE_CALLOUTS_TEST_DIR", "/tmp/quote-callouts-env");
        }

        let storage = FileStorage::new("$QUOTE_CALLOUTS_TEST_DIR/store");
        assert_eq!(storage.dir(), Path::new("/tmp/quote-callouts-env/store"));

        unsafe {
            env::remove_var("QUOTE_CALLOUTS_TEST_DIR");
        }
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        let config = PluginConfig {
            hidden_types: vec!["quote".to_string()],
            ..PluginConfig::default()
        };
        config.save(&storage).unwrap();
        assert_eq!(PluginConfig::load(&storage).unwrap(), config);
    }
}
