//! Google Play Developer API: the remote side of a publish run.
//!
//! [`PublishingService`] is the seam the pipeline talks to. [`PlayClient`]
//! implements it over HTTP against the Android Publisher v3 REST API.

mod client;
mod wire;

pub use client::{DEFAULT_API_BASE, PlayClient};

use crate::auth::AccessToken;
use crate::channel::Channel;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An open edit on the Play side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Edit id as issued by the service
    pub id: String,
    /// Validity window requested when opening, in seconds
    pub expiry_seconds: u64,
    /// Deadline the service set for the edit, when it reports one
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of staging an artifact inside an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Version code the service read from the artifact
    pub version_code: u64,
    /// SHA-1 of the stored binary, when echoed
    pub sha1: Option<String>,
    /// SHA-256 of the stored binary, when echoed
    pub sha256: Option<String>,
}

/// Version codes assigned to a track within an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAssignment {
    /// Track name
    pub channel_name: String,
    /// Version codes released on the track
    pub version_codes: Vec<u64>,
}

impl ChannelAssignment {
    /// Assignment that replaces the track's release set with one version
    pub fn single(channel: Channel, version_code: u64) -> Self {
        Self {
            channel_name: channel.api_name().to_string(),
            version_codes: vec![version_code],
        }
    }
}

/// Outcome of committing an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Id of the committed edit
    pub id: String,
}

/// Errors from the publishing service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("{0}")]
    Rejected(String),

    /// The response body did not match the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Remote operations of an edit transaction
#[async_trait]
pub trait PublishingService: Send + Sync {
    /// Open a new edit with the requested id and lifetime.
    async fn open_transaction(
        &self,
        token: &AccessToken,
        id: &str,
        expiry_seconds: u64,
    ) -> Result<Transaction, ServiceError>;

    /// Stage an artifact inside the edit.
    async fn upload_artifact(
        &self,
        token: &AccessToken,
        transaction_id: &str,
        artifact: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, ServiceError>;

    /// Replace the track's release set within the edit.
    async fn update_channel(
        &self,
        token: &AccessToken,
        transaction_id: &str,
        assignment: &ChannelAssignment,
    ) -> Result<ChannelAssignment, ServiceError>;

    /// Make every staged change in the edit live.
    async fn commit(
        &self,
        token: &AccessToken,
        transaction_id: &str,
    ) -> Result<CommitResult, ServiceError>;
}
