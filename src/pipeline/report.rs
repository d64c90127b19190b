//! Outcome of a successful publish run.

use crate::play::ChannelAssignment;
use serde::Serialize;

/// Everything a committed edit made live
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Application id
    pub package_name: String,
    /// Edit the changes were staged in
    pub transaction_id: String,
    /// Edit id echoed by the commit response
    pub committed_id: String,
    /// Version code now live on the track
    pub version_code: u64,
    /// SHA-1 of the stored binary, when echoed
    pub sha1: Option<String>,
    /// SHA-256 of the stored binary, when echoed
    pub sha256: Option<String>,
    /// Track release set
    #[serde(flatten)]
    pub assignment: ChannelAssignment,
}
