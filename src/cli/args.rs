//! Command line argument parsing.
//!
//! Every setting can also come from the environment or a `playpush.toml`;
//! see [`crate::config`] for precedence.

use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;

/// Publish an APK to a Google Play release track
#[derive(Parser, Debug)]
#[command(
    name = "playpush",
    version,
    about = "Publish an APK to a Google Play release track",
    long_about = "Open an edit, upload an APK, assign it to a release track and commit the edit.

Usage:
  playpush                 # publish to the alpha track
  playpush beta --package com.example.app --key service-account.json --artifact app-release.apk
  PLAYPUSH_PACKAGE=com.example.app PLAYPUSH_KEY=key.json playpush production"
)]
pub struct Args {
    /// Release track: internal, alpha, beta or production [default: alpha]
    #[arg(index = 1, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Application id, e.g. com.example.app
    #[arg(long, env = "PLAYPUSH_PACKAGE", value_name = "PACKAGE")]
    pub package: Option<String>,

    /// APK to upload [default: app.apk]
    #[arg(long, env = "PLAYPUSH_ARTIFACT", value_name = "PATH")]
    pub artifact: Option<PathBuf>,

    /// Service-account JSON key (falls back to GOOGLE_APPLICATION_CREDENTIALS)
    #[arg(long, env = "PLAYPUSH_KEY", value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// Seconds before the service discards an uncommitted edit [default: 600]
    #[arg(long, value_name = "SECONDS")]
    pub expiry_seconds: Option<u64>,

    /// Fail the upload unless the APK reports this version code
    #[arg(long, value_name = "CODE")]
    pub expected_version_code: Option<u64>,

    /// Base URL of the Play Developer API
    #[arg(long, env = "PLAYPUSH_API_BASE", value_name = "URL")]
    pub api_base: Option<String>,

    /// HTTP request timeout in seconds [default: 120]
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Settings file [default: ./playpush.toml if present]
    #[arg(long, env = "PLAYPUSH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the publish report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Show detailed progress and debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Settings given on the command line or through the environment
    pub fn settings(&self) -> Settings {
        Settings {
            channel: self.channel.clone(),
            package: self.package.clone(),
            artifact: self.artifact.clone(),
            key: self.key.clone(),
            expiry_seconds: self.expiry_seconds,
            expected_version_code: self.expected_version_code,
            api_base: self.api_base.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }

    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "playpush=debug"
        } else {
            "warn"
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    json: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            // stdout carries only the report in JSON mode
            output: super::OutputManager::new(args.verbose, args.quiet || args.json),
            json: args.json,
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether the report is printed as JSON
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print message in verbose mode only
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print a `[n/total]` progress line
    pub fn step(&self, position: usize, total: usize, label: &str) {
        let _ = self.output.step(position, total, label);
    }

    /// Print a labelled value under the result line
    pub fn detail(&self, label: &str, value: &str) {
        let _ = self.output.detail(label, value);
    }
}
