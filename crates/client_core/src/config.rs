use std::{path::Path, time::Duration};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{controller::ClearMode, render::HistoryOrder};

pub const DEFAULT_CONFIG_FILE: &str = "sentiment.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ABOUT_TEXT: &str = "This app analyzes the sentiment of a given text (positive or negative) \
using a machine learning model. You can also get an explanation of the model's decision using LIME.";

pub const PRESET_EXAMPLES: [&str; 5] = [
    "I love this product! It's amazing.",
    "This is the worst experience I've ever had.",
    "The service was okay, not great but not terrible.",
    "I'm so happy with the results!",
    "I regret buying this, it's awful.",
];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub history_order: HistoryOrder,
    pub show_history: bool,
    pub clear_mode: ClearMode,
    pub examples: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: crate::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            history_order: HistoryOrder::default(),
            show_history: true,
            clear_mode: ClearMode::default(),
            examples: PRESET_EXAMPLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Defaults, then the optional TOML file at `path`, then `APP__*` environment
/// variables (for example `APP__BASE_URL`).
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let settings: Settings = Config::builder()
        .add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    settings.validate()?;
    tracing::debug!(
        base_url = %settings.base_url,
        timeout_secs = settings.request_timeout_secs,
        "settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_file(name: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("sentiment_settings_{name}_{suffix}.toml"))
    }

    #[test]
    fn defaults_point_at_local_service_with_thirty_second_timeout() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://localhost:8000");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.examples.len(), 5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings(temp_file("missing")).expect("load");
        assert_eq!(settings.base_url, Settings::default().base_url);
        assert_eq!(settings.clear_mode, ClearMode::Immediate);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_file("override");
        fs::write(
            &path,
            r#"
base_url = "https://sentiment.example.com/api/"
history_order = "insertion_order"
clear_mode = "deferred"
"#,
        )
        .expect("write settings");

        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.base_url, "https://sentiment.example.com/api/");
        assert_eq!(settings.history_order, HistoryOrder::InsertionOrder);
        assert_eq!(settings.clear_mode, ClearMode::Deferred);
        assert_eq!(settings.examples.len(), 5);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn environment_overrides_file() {
        let path = temp_file("env");
        fs::write(&path, "show_history = true\n").expect("write settings");
        env::set_var("APP__SHOW_HISTORY", "false");

        let settings = load_settings(&path);
        env::remove_var("APP__SHOW_HISTORY");
        fs::remove_file(path).expect("cleanup");

        assert!(!settings.expect("load").show_history);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let settings = Settings {
            base_url: "ftp://example.com".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));

        let settings = Settings {
            base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::ZeroTimeout)));
    }

    #[test]
    fn renders_as_toml() {
        let raw = Settings::default().to_toml().expect("toml");
        assert!(raw.contains("base_url = \"http://localhost:8000\""));
        assert!(raw.contains("clear_mode = \"immediate\""));
    }
}
