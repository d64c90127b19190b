//! Publish pipeline: authorize, open edit, upload, assign track, commit.
//!
//! Stages run strictly in order and each awaits the previous one. The first
//! error ends the run; later stages are never started and nothing is retried.

mod context;
mod report;
mod stages;

pub use context::{Assigned, Authorized, Opened, Uploaded};
pub use report::PublishReport;

use crate::auth::TokenProvider;
use crate::channel::Channel;
use crate::config::PublishConfig;
use crate::error::{Result, Stage};
use crate::play::PublishingService;
use bytes::Bytes;

/// Settings the stages need from [`PublishConfig`]
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Application id, for logging and the report
    pub package_name: String,
    /// Track to release on
    pub channel: Channel,
    /// Edit lifetime in seconds
    pub expiry_seconds: u64,
    /// Version code the upload must report, if any
    pub expected_version_code: Option<u64>,
}

impl From<&PublishConfig> for PublishOptions {
    fn from(config: &PublishConfig) -> Self {
        Self {
            package_name: config.package_name.clone(),
            channel: config.channel,
            expiry_seconds: config.expiry_seconds,
            expected_version_code: config.expected_version_code,
        }
    }
}

/// Remote stages in the order a run enters them
pub const REMOTE_STAGES: [Stage; 5] = [
    Stage::Authorize,
    Stage::Open,
    Stage::Upload,
    Stage::Assign,
    Stage::Commit,
];

/// Edit id derived from the current time in milliseconds
pub fn timestamp_transaction_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Runs one publish with the collaborators it is given
pub struct Publisher<'a> {
    auth: &'a dyn TokenProvider,
    service: &'a dyn PublishingService,
    options: PublishOptions,
    transaction_id: fn() -> String,
    progress: Option<&'a dyn Fn(Stage)>,
}

impl<'a> Publisher<'a> {
    /// Create a publisher that names edits after the current time
    pub fn new(
        auth: &'a dyn TokenProvider,
        service: &'a dyn PublishingService,
        options: PublishOptions,
    ) -> Self {
        Self {
            auth,
            service,
            options,
            transaction_id: timestamp_transaction_id,
            progress: None,
        }
    }

    /// Use `generate` for the locally requested edit id
    pub fn with_transaction_id(mut self, generate: fn() -> String) -> Self {
        self.transaction_id = generate;
        self
    }

    /// Call `progress` as each remote stage starts
    pub fn with_progress(mut self, progress: &'a dyn Fn(Stage)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn enter(&self, stage: Stage) {
        if let Some(progress) = self.progress {
            progress(stage);
        }
    }

    /// Publish `artifact`, returning what the commit made live
    pub async fn publish(&self, artifact: Bytes) -> Result<PublishReport> {
        let authorized = self.authorize().await?;
        let opened = self.open_transaction(authorized, artifact).await?;
        let uploaded = self.upload_artifact(opened).await?;
        let assigned = self.assign_channel(uploaded).await?;
        let report = self.commit_transaction(assigned).await?;

        log::info!(
            "Committed edit {}: version code {} live on {}",
            report.transaction_id,
            report.version_code,
            report.assignment.channel_name
        );
        Ok(report)
    }
}
