use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookmarks_engine::ServiceSettings;
use bookmarks_logging::bm_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;
use super::ui::render::Variant;

const DEFAULT_CONFIG: &str = "bookmarks.ron";
const CONFIG_ENV: &str = "BOOKMARKS_CONFIG";
const TOKEN_ENV: &str = "BOOKMARKS_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Backend {
    /// Hosted service over HTTP.
    Rest,
    /// Process-local store with a fixed demo user.
    #[default]
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let defaults = ServiceSettings::default();
        Self {
            base_url: defaults.base_url,
            anon_key: defaults.anon_key,
            access_token: None,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn to_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            access_token: self.access_token.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ServiceSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInConfig {
    pub provider: String,
    pub redirect_to: Option<String>,
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            redirect_to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub user_id: String,
    pub email: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            user_id: "demo-user".to_string(),
            email: Some("demo@localhost".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub service: ServiceConfig,
    pub sign_in: SignInConfig,
    pub demo: DemoConfig,
    pub log: LogDestination,
    pub variant: Variant,
}

/// First CLI argument, then `BOOKMARKS_CONFIG`, then `./bookmarks.ron`.
pub(crate) fn config_path(arg: Option<String>) -> PathBuf {
    arg.or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

/// Reads the RON config; a missing file yields defaults. The access token
/// from the environment wins over the file.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(text) => parse_config(path, &text)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            bm_info!("No config at {:?}; using defaults", path);
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            config.service.access_token = Some(token);
        }
    }
    Ok(config)
}

fn parse_config(path: &Path, text: &str) -> Result<AppConfig, ConfigError> {
    ron::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
