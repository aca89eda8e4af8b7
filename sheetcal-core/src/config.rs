//! Configuration at ~/.config/sheetcal/config.toml
//!
//! Every key can be overridden by an environment variable with the
//! `SHEETCAL_` prefix, e.g. `SHEETCAL_ACCESS_TOKEN`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};
use crate::sync::SyncSettings;

const ENV_PREFIX: &str = "SHEETCAL";

/// Google's alias for the authenticated user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_SHEET_NAME: &str = "Scheduler";
pub const DEFAULT_TIME_ZONE: &str = "Asia/Jakarta";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_sheets_api_base() -> String {
    DEFAULT_SHEETS_API_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetcalConfig {
    /// Id of the spreadsheet holding the schedule
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// IANA zone that row times are read in
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// OAuth access token with calendar and spreadsheet scopes
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default = "default_sheets_api_base")]
    pub sheets_api_base: String,
}

impl Default for SheetcalConfig {
    fn default() -> Self {
        SheetcalConfig {
            spreadsheet_id: None,
            sheet_name: default_sheet_name(),
            calendar_id: default_calendar_id(),
            time_zone: default_time_zone(),
            access_token: None,
            sheets_api_base: default_sheets_api_base(),
        }
    }
}

impl SheetcalConfig {
    pub fn config_path() -> SyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SyncError::Config("Could not determine config directory".into()))?
            .join("sheetcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default path, with environment overrides.
    pub fn load() -> SyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (which may not exist), with environment overrides.
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(path: &Path, env: Option<HashMap<String, String>>) -> SyncResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    pub fn zone(&self) -> SyncResult<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| SyncError::Config(format!("Unknown time zone '{}'", self.time_zone)))
    }

    pub fn require_spreadsheet_id(&self) -> SyncResult<&str> {
        self.spreadsheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SyncError::Config(
                    "No spreadsheet_id configured. Set it in config.toml or SHEETCAL_SPREADSHEET_ID"
                        .into(),
                )
            })
    }

    pub fn require_access_token(&self) -> SyncResult<&str> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SyncError::Config("No access token. Set SHEETCAL_ACCESS_TOKEN".into()))
    }

    /// Token with all but the last four characters masked.
    pub fn redacted_token(&self) -> Option<String> {
        self.access_token.as_deref().map(|token| {
            let visible: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{visible}")
        })
    }

    pub fn sync_settings(&self) -> SyncResult<SyncSettings> {
        Ok(SyncSettings {
            calendar_id: self.calendar_id.clone(),
            time_zone: self.zone()?,
        })
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> SyncResult<()> {
        let contents = format!(
            "\
# sheetcal configuration

# Spreadsheet to sync (the id in its URL):
# spreadsheet_id = \"\"

# Tab holding the schedule rows:
# sheet_name = \"{DEFAULT_SHEET_NAME}\"

# Calendar events are written to:
# calendar_id = \"{DEFAULT_CALENDAR_ID}\"

# Zone the start and end columns are read in:
# time_zone = \"{DEFAULT_TIME_ZONE}\"

# The access token is read from SHEETCAL_ACCESS_TOKEN.
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SyncError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SheetcalConfig::load_with_env(&dir.path().join("config.toml"), no_env()).unwrap();

        assert_eq!(config.sheet_name, "Scheduler");
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.time_zone, "Asia/Jakarta");
        assert_eq!(config.sheets_api_base, DEFAULT_SHEETS_API_BASE);
        assert!(config.spreadsheet_id.is_none());
        assert!(config.require_spreadsheet_id().is_err());
        assert!(config.require_access_token().is_err());
    }

    #[test]
    fn reads_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "spreadsheet_id = \"sheet-123\"\ncalendar_id = \"team@example.com\"\ntime_zone = \"Europe/Berlin\"\n",
        )
        .unwrap();

        let config = SheetcalConfig::load_with_env(&path, no_env()).unwrap();

        assert_eq!(config.require_spreadsheet_id().unwrap(), "sheet-123");
        assert_eq!(config.calendar_id, "team@example.com");
        assert_eq!(config.zone().unwrap(), chrono_tz::Europe::Berlin);
        assert_eq!(config.sheet_name, "Scheduler");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "calendar_id = \"from-file\"\n").unwrap();

        let env = HashMap::from([
            ("SHEETCAL_CALENDAR_ID".to_string(), "from-env".to_string()),
            ("SHEETCAL_ACCESS_TOKEN".to_string(), "ya29.secret-abcd".to_string()),
        ]);
        let config = SheetcalConfig::load_with_env(&path, Some(env)).unwrap();

        assert_eq!(config.calendar_id, "from-env");
        assert_eq!(config.require_access_token().unwrap(), "ya29.secret-abcd");
        assert_eq!(config.redacted_token().as_deref(), Some("****abcd"));
    }

    #[test]
    fn unknown_time_zone_is_a_config_error() {
        let config = SheetcalConfig {
            time_zone: "Nowhere/Special".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.zone(), Err(SyncError::Config(_))));
        assert!(config.sync_settings().is_err());
    }

    #[test]
    fn default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        SheetcalConfig::create_default_config(&path).unwrap();
        let config = SheetcalConfig::load_with_env(&path, no_env()).unwrap();

        assert_eq!(config.calendar_id, DEFAULT_CALENDAR_ID);
        assert_eq!(config.sheet_name, DEFAULT_SHEET_NAME);
    }
}
