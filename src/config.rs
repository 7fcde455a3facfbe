use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use iced::Theme;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CONFIG_FILE: &str = "config.json";
pub const SESSION_FILE: &str = "session.json";
pub const REPORTS_DIR: &str = "reports";
pub const DEFAULT_API_BASE_URL: &str = "https://lms-backend-flwq.onrender.com/api/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Process-wide settings read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub connect_timeout_secs: u64,
}

impl Settings {
    /// Reads `LMS_API_BASE_URL`, `LMS_DATA_DIR` and `LMS_CONNECT_TIMEOUT_SECS`,
    /// with a `.env` file honoured outside of tests.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_base_url = std::env::var("LMS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "LMS_API_BASE_URL".to_string(),
                format!("'{api_base_url}' is not an http(s) URL"),
            ));
        }

        let data_dir = std::env::var("LMS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let timeout_str =
            std::env::var("LMS_CONNECT_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string());
        let connect_timeout_secs = timeout_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("LMS_CONNECT_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            connect_timeout_secs,
        })
    }

    pub fn with_base_url(api_base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            data_dir: data_dir.into(),
            connect_timeout_secs: 10,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "Light"),
            ThemeMode::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarBehavior {
    #[default]
    Collapsible,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationPrefs {
    pub email_new_students: bool,
    pub email_assignments: bool,
    pub email_reviews: bool,
    pub push_messages: bool,
    pub push_reports: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email_new_students: true,
            email_assignments: true,
            email_reviews: false,
            push_messages: true,
            push_reports: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivacyPrefs {
    pub two_factor: bool,
    pub public_profile: bool,
    pub show_online_status: bool,
    pub allow_recommendations: bool,
}

impl Default for PrivacyPrefs {
    fn default() -> Self {
        Self {
            two_factor: false,
            public_profile: true,
            show_online_status: false,
            allow_recommendations: true,
        }
    }
}

/// UI preferences persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeMode,
    pub sidebar: SidebarBehavior,
    pub notifications: NotificationPrefs,
    pub privacy: PrivacyPrefs,
}

impl Preferences {
    /// Missing or unreadable files fall back to the defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    #[test]
    fn preferences_round_trip_through_file() {
        let dir = temp_dir("prefs");
        let path = dir.join(CONFIG_FILE);
        let prefs = Preferences {
            theme: ThemeMode::Dark,
            sidebar: SidebarBehavior::Expanded,
            privacy: PrivacyPrefs {
                two_factor: true,
                ..Default::default()
            },
            ..Default::default()
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn garbage_preferences_fall_back_to_default() {
        let dir = temp_dir("prefs-bad");
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Preferences::load(&path), Preferences::default());
        assert_eq!(
            Preferences::load(&dir.join("missing.json")),
            Preferences::default()
        );
    }

    #[test]
    fn partial_preferences_keep_known_fields() {
        let dir = temp_dir("prefs-partial");
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let prefs = Preferences::load(&path);
        assert_eq!(prefs.theme, ThemeMode::Dark);
        assert_eq!(prefs.sidebar, SidebarBehavior::Collapsible);
        assert!(prefs.notifications.email_new_students);
    }
}
