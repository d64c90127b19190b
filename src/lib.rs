//! # playpush
//!
//! Publish an Android application binary to a Google Play release track.
//!
//! A run is one edit transaction on the Play Developer API:
//!
//! 1. authorize with a service-account key,
//! 2. open an edit,
//! 3. upload the APK and read back its version code,
//! 4. set the chosen track to exactly that version code,
//! 5. commit the edit.
//!
//! The first failure aborts the run and nothing is retried; the Play service
//! discards the uncommitted edit when it expires.
//!
//! ## Usage
//!
//! ```bash
//! playpush                                  # alpha track
//! playpush beta --package com.example.app --key key.json --artifact app-release.apk
//! playpush production --json                # machine-readable report
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod auth;
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod play;

// Re-export main types for public API
pub use auth::{AccessToken, ServiceAccountAuth, ServiceAccountKey, TokenProvider};
pub use channel::Channel;
pub use config::{PublishConfig, Settings};
pub use error::{ChannelError, PublishError, Result, Stage};
pub use pipeline::{PublishOptions, PublishReport, Publisher};
pub use play::{
    ChannelAssignment, CommitResult, PlayClient, PublishingService, ServiceError, Transaction,
    UploadResult,
};
