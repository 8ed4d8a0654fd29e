use pretty_assertions::assert_eq;
use quote_callouts_config::{
    BackgroundConfig, ConfigError, ConfigStorage, FileStorage, PluginConfig, STORAGE_KEY,
    ThemeChoice,
};
use tempfile::TempDir;

#[test]
fn hand_written_blob_is_read_and_normalized() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("callout-config.json"),
        r##"{
            "theme": "minimal",
            "gridColumns": 9,
            "hiddenTypes": [" Bug ", "bug", "todo"],
            "customTypes": [
                {
                    "id": "memo",
                    "displayName": "Memo",
                    "commands": ["memo", "备忘"],
                    "color": "#6b5",
                    "icon": "📝",
                    "background": { "from": "#fff", "to": "#efe" }
                }
            ]
        }"##,
    )
    .unwrap();

    let config = PluginConfig::load(&FileStorage::new(temp_dir.path())).unwrap();

    assert_eq!(config.theme, ThemeChoice::Minimal);
    assert_eq!(config.grid_columns, 6);
    assert_eq!(config.hidden_types, vec!["bug".to_string(), "todo".to_string()]);
    assert!(config.is_hidden("BUG"));
    assert_eq!(config.custom_types[0].commands, vec!["memo", "备忘"]);
    assert_eq!(
        config.custom_types[0].background,
        Some(BackgroundConfig::Gradient {
            from: "#fff".to_string(),
            to: "#efe".to_string(),
        })
    );
    assert!(!config.debug_logging);
}

#[test]
fn save_creates_missing_directories() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("nested").join("plugin"));
    let config = PluginConfig {
        theme: ThemeChoice::Classic,
        debug_logging: true,
        ..PluginConfig::default()
    };

    config.save(&storage).unwrap();

    assert!(storage.path_for(STORAGE_KEY).exists());
    let reopened = FileStorage::new(storage.dir());
    assert_eq!(PluginConfig::load(&reopened).unwrap(), config);
}

#[test]
fn unreadable_blob_reports_its_path() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path());
    std::fs::create_dir(storage.path_for(STORAGE_KEY)).unwrap();

    let err = storage.load(STORAGE_KEY).unwrap_err();

    match err {
        ConfigError::StorageRead { key, path, .. } => {
            assert_eq!(key, STORAGE_KEY);
            assert_eq!(path, storage.path_for(STORAGE_KEY));
        }
        other => panic!("expected a read error, got {other}"),
    }
}
