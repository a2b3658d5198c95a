use serde::Deserialize;
use std::{env, fs, path::Path};

use crate::board::BoardLayout;
use crate::error::SettingsError;

pub const SETTINGS_FILENAME: &str = "settings.json";

const BASE_URL_ENV: &str = "AGENCY_BOARD_BASE_URL";
const CSRF_TOKEN_ENV: &str = "AGENCY_BOARD_CSRF_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    /// Anti-forgery token sent with every mutating request.
    pub csrf_token: String,
    pub layout: BoardLayout,
    /// Persist drops that only change order within a column. Status changes
    /// are always persisted.
    pub persist_reorders: bool,
    pub endpoints: Endpoints,
    pub upload: UploadSettings,
}

/// Paths relative to `base_url`. The `_base` ones get `<id>/` appended.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub update_task: String,
    pub create_task: String,
    pub delete_task_base: String,
    pub task_details_base: String,
    pub upload_file: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub file_field: String,
    pub owner_field: String,
    pub folder_field: String,
    /// Pause between consecutive uploads, in milliseconds. 0 disables it.
    pub pace_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "http://localhost:8000".to_string(),
            csrf_token: String::new(),
            layout: BoardLayout::General,
            persist_reorders: true,
            endpoints: Endpoints::default(),
            upload: UploadSettings::default(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            update_task: "/kanban/update-task/".to_string(),
            create_task: "/api/tasks/add/".to_string(),
            delete_task_base: "/api/tasks/delete/".to_string(),
            task_details_base: "/api/get-task/".to_string(),
            upload_file: "/api/upload/photo/".to_string(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            file_field: "foto".to_string(),
            owner_field: "client_id".to_string(),
            folder_field: "folder_id".to_string(),
            pace_ms: 200,
        }
    }
}

impl Settings {
    /// Load `settings.json` from the working directory, then apply
    /// environment overrides.
    pub fn load() -> Result<Settings, SettingsError> {
        Settings::load_from(SETTINGS_FILENAME)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings = Settings::parse(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        settings.apply_env(|key| env::var(key).ok());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Settings, serde_json::Error> {
        serde_json::from_str(content)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(token) = lookup(CSRF_TOKEN_ENV) {
            self.csrf_token = token;
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
