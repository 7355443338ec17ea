//! Settings for one invocation.
//!
//! Values come from an optional JSON file and are overridden field by field
//! by command line flags or `HERALD_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{ConfigError, ConsumerPair, Endpoints, TokenPair};

pub const DEFAULT_WORK_DIRECTORY: &str = "target/twitter";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInfo {
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub message: Option<String>,
    pub recipient_screen_name: Option<String>,
    pub work_directory: Option<PathBuf>,
    pub api_base: Option<String>,
    pub project: ProjectInfo,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .field("message", &self.message)
            .field("recipient_screen_name", &self.recipient_screen_name)
            .field("work_directory", &self.work_directory)
            .field("api_base", &self.api_base)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadSettings(display.clone(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::ParseSettings(display, e))
    }

    /// Returns `self` with every value present in `other` replacing its own.
    pub fn overlay(self, other: Settings) -> Settings {
        Settings {
            consumer_key: other.consumer_key.or(self.consumer_key),
            consumer_secret: other.consumer_secret.or(self.consumer_secret),
            access_token: other.access_token.or(self.access_token),
            access_token_secret: other.access_token_secret.or(self.access_token_secret),
            message: other.message.or(self.message),
            recipient_screen_name: other.recipient_screen_name.or(self.recipient_screen_name),
            work_directory: other.work_directory.or(self.work_directory),
            api_base: other.api_base.or(self.api_base),
            project: ProjectInfo {
                artifact_id: other.project.artifact_id.or(self.project.artifact_id),
                version: other.project.version.or(self.project.version),
                url: other.project.url.or(self.project.url),
            },
        }
    }

    pub fn consumer(&self) -> Result<ConsumerPair, ConfigError> {
        let key = non_blank(&self.consumer_key)
            .ok_or(ConfigError::MissingCredentials("consumer key"))?;
        let secret = non_blank(&self.consumer_secret)
            .ok_or(ConfigError::MissingCredentials("consumer secret"))?;
        Ok(ConsumerPair::new(key, secret))
    }

    /// The access pair supplied directly, if both halves are present.
    pub fn configured_access(&self) -> Option<TokenPair> {
        let pair = TokenPair::from_parts(
            self.access_token.as_deref(),
            self.access_token_secret.as_deref(),
        );
        if pair.is_none()
            && (non_blank(&self.access_token).is_some()
                || non_blank(&self.access_token_secret).is_some())
        {
            warn!("ignoring access token settings: token and token secret must both be set");
        }
        pair
    }

    pub fn work_directory(&self) -> PathBuf {
        self.work_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIRECTORY))
    }

    /// The text to send: the configured message, or a release announcement
    /// built from the project coordinates.
    pub fn message(&self) -> Result<String, ConfigError> {
        if let Some(message) = non_blank(&self.message) {
            return Ok(message.to_string());
        }
        let artifact_id = non_blank(&self.project.artifact_id).ok_or(ConfigError::MissingMessage)?;
        let version = non_blank(&self.project.version).ok_or(ConfigError::MissingMessage)?;
        let mut message = format!("{}:{} released!", artifact_id, version);
        if let Some(url) = non_blank(&self.project.url) {
            message.push(' ');
            message.push_str(url);
        }
        Ok(message)
    }

    pub fn recipient(&self) -> Result<&str, ConfigError> {
        non_blank(&self.recipient_screen_name).ok_or(ConfigError::MissingRecipient)
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        match non_blank(&self.api_base) {
            Some(base) => Endpoints::with_base(base),
            None => Ok(Endpoints::default()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
