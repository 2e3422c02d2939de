use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Optional overrides read from a JSON file passed with `--settings`.
#[derive(Deserialize, Default, Debug)]
pub struct PersistentSettings {
    pub api_base: Option<String>,
    pub page_length: Option<usize>,
    pub skip_count_field: Option<String>,
}

pub fn load_settings(path: &Path) -> PersistentSettings {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring invalid settings file {:?}: {}", path, e);
                PersistentSettings::default()
            }
        },
        Err(e) => {
            warn!("Settings file {:?} not readable: {}", path, e);
            PersistentSettings::default()
        }
    }
}
