use directories::ProjectDirs;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::{CLI_NAME, CONTACT, VERSION};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not locate program directories")]
    NoConfigDir,
    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting `{0}`: {1}")]
    Invalid(&'static str, String),
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub musicbrainz: MusicBrainz,
    #[serde(default)]
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicBrainz {
    #[serde(default = "default_api_url")]
    pub url: url::Url,
    #[serde(default = "default_site_url")]
    pub site_url: url::Url,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Pause between two consecutive yearly searches, in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay: u64,
    #[serde(default = "default_calls_per_second")]
    pub calls_per_second: u32,
}

impl MusicBrainz {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }
}

impl Default for MusicBrainz {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            site_url: default_site_url(),
            user_agent: default_user_agent(),
            page_size: default_page_size(),
            timeout: default_timeout(),
            request_delay: default_request_delay(),
            calls_per_second: default_calls_per_second(),
        }
    }
}

fn default_api_url() -> url::Url {
    url::Url::parse("https://musicbrainz.org/ws/2/").unwrap()
}

fn default_site_url() -> url::Url {
    url::Url::parse("https://musicbrainz.org/").unwrap()
}

fn default_user_agent() -> String {
    format!("{}/{} ( {} )", CLI_NAME, VERSION, CONTACT)
}

fn default_page_size() -> u32 {
    50
}

fn default_timeout() -> u64 {
    30
}

fn default_request_delay() -> u64 {
    100
}

fn default_calls_per_second() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start year used when the form leaves it blank
    #[serde(default = "default_floor_year")]
    pub floor_year: i32,
    /// Maximum number of years searched by a single submission
    #[serde(default = "default_max_span")]
    pub max_span: i32,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            floor_year: default_floor_year(),
            max_span: default_max_span(),
        }
    }
}

fn default_floor_year() -> i32 {
    1990
}

fn default_max_span() -> i32 {
    25
}

pub fn load(path: Option<PathBuf>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path,
        None => ProjectDirs::from("com", "github", CLI_NAME)
            .ok_or(SettingsError::NoConfigDir)?
            .config_dir()
            .join("config.toml"),
    };
    tracing::info! {?path, "Loading config file"};
    let content = fs::read_to_string(path).unwrap_or_default();
    let set = parse(content.as_str())?;
    tracing::trace! {settings = ?set, "Loaded settings"};
    Ok(set)
}

pub fn parse(content: &str) -> Result<Settings, SettingsError> {
    let set: Settings = toml::from_str(content)?;
    validate(&set)?;
    Ok(set)
}

pub fn validate(set: &Settings) -> Result<(), SettingsError> {
    if set.range.max_span < 1 {
        return Err(SettingsError::Invalid(
            "range.max_span",
            "must be at least 1".to_string(),
        ));
    }
    if set.musicbrainz.page_size == 0 {
        return Err(SettingsError::Invalid(
            "musicbrainz.page_size",
            "must be at least 1".to_string(),
        ));
    }
    if set.musicbrainz.calls_per_second == 0 {
        return Err(SettingsError::Invalid(
            "musicbrainz.calls_per_second",
            "must be at least 1".to_string(),
        ));
    }
    for (key, url) in [
        ("musicbrainz.url", &set.musicbrainz.url),
        ("musicbrainz.site_url", &set.musicbrainz.site_url),
    ] {
        if !url.path().ends_with('/') {
            return Err(SettingsError::Invalid(key, format!("{} must end with /", url)));
        }
    }
    Ok(())
}
