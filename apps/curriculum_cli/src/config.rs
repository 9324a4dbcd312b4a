use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "curriculum_editor.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid submit url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub submit_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub dedupe_on_load: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_url: None,
            output_path: None,
            request_timeout_secs: 30,
            dedupe_on_load: false,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    submit_url: Option<String>,
    output_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    dedupe_on_load: Option<bool>,
}

/// Defaults, then the TOML file (if present), then the process environment.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    apply_file(&mut settings, path)?;
    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    validate(&settings)?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> Result<(), ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let file_cfg: FileSettings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(v) = file_cfg.submit_url {
        settings.submit_url = Some(v);
    }
    if let Some(v) = file_cfg.output_path {
        settings.output_path = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.dedupe_on_load {
        settings.dedupe_on_load = v;
    }
    Ok(())
}

pub(crate) fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = lookup("SUBMIT_URL") {
        settings.submit_url = Some(v);
    }
    if let Some(v) = lookup("APP__SUBMIT_URL") {
        settings.submit_url = Some(v);
    }

    if let Some(v) = lookup("OUTPUT_PATH") {
        settings.output_path = Some(PathBuf::from(v));
    }
    if let Some(v) = lookup("APP__OUTPUT_PATH") {
        settings.output_path = Some(PathBuf::from(v));
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "APP__REQUEST_TIMEOUT_SECS",
            value: v.clone(),
        })?;
    }

    if let Some(v) = lookup("APP__DEDUPE_ON_LOAD") {
        settings.dedupe_on_load = parse_flag(&v).ok_or(ConfigError::InvalidValue {
            key: "APP__DEDUPE_ON_LOAD",
            value: v.clone(),
        })?;
    }

    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let Some(raw) = settings.submit_url.as_deref() else {
        return Ok(());
    };

    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
