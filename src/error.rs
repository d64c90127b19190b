//! Error types for playpush operations.
//!
//! Every stage of a publish run maps its failures onto one variant of
//! [`PublishError`]. All of them are terminal: nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for playpush operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Main error type for a publish run
#[derive(Error, Debug)]
pub enum PublishError {
    /// Credential or token acquisition failed
    #[error("Authorization failed: {reason}")]
    Auth {
        /// Reason for the error
        reason: String,
    },

    /// The edit transaction could not be opened
    #[error("Failed to open edit: {reason}")]
    TransactionOpen {
        /// Reason for the error
        reason: String,
    },

    /// The artifact could not be staged in the edit
    #[error("Upload failed: {reason}")]
    Upload {
        /// Reason for the error
        reason: String,
    },

    /// The track could not be assigned
    #[error("Track assignment failed: {0}")]
    ChannelAssignment(#[from] ChannelError),

    /// The edit could not be committed
    #[error("Commit failed for edit '{edit_id}': {reason}")]
    Commit {
        /// Edit that failed to commit
        edit_id: String,
        /// Reason for the error
        reason: String,
    },

    /// Settings are missing or inconsistent
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// The artifact file could not be read
    #[error("Cannot read artifact at {path}: {reason}")]
    Artifact {
        /// Path of the artifact
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Track assignment errors
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Track name is not in the recognized table
    #[error("unknown track '{name}' (expected one of: {known})")]
    UnknownChannel {
        /// Requested name
        name: String,
        /// Comma-separated list of recognized names
        known: String,
    },

    /// The service refused the assignment
    #[error("track '{channel}' rejected: {reason}")]
    Rejected {
        /// Track name
        channel: String,
        /// Reason for the error
        reason: String,
    },
}

/// Pipeline step a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Settings and local inputs, before any remote call
    Prepare,
    /// Token acquisition
    Authorize,
    /// Opening the edit
    Open,
    /// Uploading the artifact
    Upload,
    /// Assigning the track
    Assign,
    /// Committing the edit
    Commit,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Prepare => "prepare",
            Stage::Authorize => "authorize",
            Stage::Open => "open edit",
            Stage::Upload => "upload",
            Stage::Assign => "assign track",
            Stage::Commit => "commit",
        };
        f.write_str(name)
    }
}

impl Stage {
    /// Present-tense label for progress lines
    pub fn progress_label(&self) -> &'static str {
        match self {
            Stage::Prepare => "Preparing",
            Stage::Authorize => "Authorizing",
            Stage::Open => "Opening edit",
            Stage::Upload => "Uploading artifact",
            Stage::Assign => "Assigning track",
            Stage::Commit => "Committing edit",
        }
    }
}

impl PublishError {
    /// Step of the run that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            PublishError::Config { .. } | PublishError::Artifact { .. } => Stage::Prepare,
            PublishError::ChannelAssignment(ChannelError::UnknownChannel { .. }) => Stage::Prepare,
            PublishError::Auth { .. } => Stage::Authorize,
            PublishError::TransactionOpen { .. } => Stage::Open,
            PublishError::Upload { .. } => Stage::Upload,
            PublishError::ChannelAssignment(ChannelError::Rejected { .. }) => Stage::Assign,
            PublishError::Commit { .. } => Stage::Commit,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublishError::Auth { .. } => vec![
                "Check that the key file is a service-account JSON key".to_string(),
                "Verify the service account is linked in the Play Console API access page"
                    .to_string(),
            ],
            PublishError::TransactionOpen { .. } => vec![
                "Verify the package name exists in the Play Console".to_string(),
                "Confirm the service account has release permissions for this app".to_string(),
            ],
            PublishError::Upload { .. } => vec![
                "Bump versionCode in the build; Play rejects codes it has already seen"
                    .to_string(),
                "Make sure the APK is signed with the app's upload key".to_string(),
            ],
            PublishError::ChannelAssignment(ChannelError::UnknownChannel { known, .. }) => {
                vec![format!("Pass one of: {}", known)]
            }
            PublishError::Commit { .. } => vec![
                "The edit was discarded; rerun to open a fresh one".to_string(),
            ],
            PublishError::Artifact { path, .. } => vec![format!(
                "Build the APK or point --artifact at it (looked in {})",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
