//! Publish settings.
//!
//! Settings come from three layers, highest priority first: command line and
//! environment (through clap), an optional `playpush.toml`, then built-in
//! defaults. Package name and key path have no default.

use crate::channel::Channel;
use crate::error::{PublishError, Result};
use crate::play::DEFAULT_API_BASE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "playpush.toml";

/// Edit lifetime requested from the service
pub const DEFAULT_EXPIRY_SECONDS: u64 = 600;

/// Artifact path used when none is configured
pub const DEFAULT_ARTIFACT_PATH: &str = "app.apk";

/// HTTP request timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// One layer of optional settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    /// Track name
    pub channel: Option<String>,
    /// Application id, e.g. `com.example.app`
    pub package: Option<String>,
    /// APK to upload
    pub artifact: Option<PathBuf>,
    /// Service-account JSON key
    pub key: Option<PathBuf>,
    /// Edit lifetime in seconds
    pub expiry_seconds: Option<u64>,
    /// Version code the upload must report
    pub expected_version_code: Option<u64>,
    /// Base URL of the Play API
    pub api_base: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_seconds: Option<u64>,
}

impl Settings {
    /// Parse a settings file
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PublishError::Config {
            reason: format!("invalid settings file: {}", e),
        })
    }

    /// Load settings from `path`.
    ///
    /// With `required == false` a missing file yields empty settings.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PublishError::Config {
                reason: format!("failed to read {}: {}", path.display(), e),
            }),
        }
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            channel: self.channel.or(fallback.channel),
            package: self.package.or(fallback.package),
            artifact: self.artifact.or(fallback.artifact),
            key: self.key.or(fallback.key),
            expiry_seconds: self.expiry_seconds.or(fallback.expiry_seconds),
            expected_version_code: self.expected_version_code.or(fallback.expected_version_code),
            api_base: self.api_base.or(fallback.api_base),
            timeout_seconds: self.timeout_seconds.or(fallback.timeout_seconds),
        }
    }
}

/// Fully resolved settings for one publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Track to release on
    pub channel: Channel,
    /// Application id
    pub package_name: String,
    /// APK to upload
    pub artifact_path: PathBuf,
    /// Service-account JSON key
    pub key_path: PathBuf,
    /// Edit lifetime in seconds
    pub expiry_seconds: u64,
    /// Version code the upload must report, if any
    pub expected_version_code: Option<u64>,
    /// Base URL of the Play API
    pub api_base: String,
    /// HTTP timeout
    pub timeout: Duration,
}

impl TryFrom<Settings> for PublishConfig {
    type Error = PublishError;

    fn try_from(settings: Settings) -> Result<Self> {
        let channel = Channel::select(settings.channel.as_deref())?;

        let package_name = settings
            .package
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| PublishError::Config {
                reason: "package name not set (use --package or PLAYPUSH_PACKAGE)".to_string(),
            })?;

        let key_path = settings.key.ok_or_else(|| PublishError::Config {
            reason: "service-account key not set (use --key or PLAYPUSH_KEY)".to_string(),
        })?;

        let expiry_seconds = settings.expiry_seconds.unwrap_or(DEFAULT_EXPIRY_SECONDS);
        if expiry_seconds == 0 {
            return Err(PublishError::Config {
                reason: "expiry-seconds must be greater than zero".to_string(),
            });
        }

        if settings.expected_version_code == Some(0) {
            return Err(PublishError::Config {
                reason: "expected-version-code must be a positive integer".to_string(),
            });
        }

        Ok(Self {
            channel,
            package_name,
            artifact_path: settings
                .artifact
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH)),
            key_path,
            expiry_seconds,
            expected_version_code: settings.expected_version_code,
            api_base: settings
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(
                settings.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ),
        })
    }
}
