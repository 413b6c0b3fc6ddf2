use std::path::{Path, PathBuf};

use log::{debug, info};
use reqwest::Url;
use serde::Deserialize;

use crate::errors::SpendviewError;

pub const APP_DIR: &str = "spendview";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "spendview.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base of the expense service, e.g. `http://127.0.0.1:8000/api`.
    pub api_url: String,
    pub timeout_secs: u64,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: 30,
            currency: "₹".to_string(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE))
}

impl Config {
    /// Reads the configuration file.
    ///
    /// An explicitly given path must exist. Without one the platform config
    /// directory is tried and the defaults are used when nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self, SpendviewError> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(SpendviewError::InvalidArgument(format!(
                    "No config file found at {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file, using defaults");
                    return Self::default().validated();
                }
            },
        };

        info!("Config file found at {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SpendviewError> {
        let config: Config = toml::from_str(contents)?;
        config.validated()
    }

    /// Applies command line (or environment) values on top of the file.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, SpendviewError> {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self, SpendviewError> {
        let url = Url::parse(self.api_url.trim()).map_err(|e| {
            SpendviewError::Config(format!("api_url {:?} is not a URL: {e}", self.api_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SpendviewError::Config(format!(
                "api_url must use http or https, got {}",
                url.scheme()
            )));
        }
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();

        if self.timeout_secs == 0 {
            return Err(SpendviewError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}
