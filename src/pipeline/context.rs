//! State carried between publish stages.
//!
//! Each stage consumes the previous state and returns the next one, so fields
//! set earlier travel forward untouched. The artifact bytes live only in
//! [`Opened`] and are gone once [`Uploaded`] exists.

use crate::auth::AccessToken;
use crate::play::{ChannelAssignment, Transaction, UploadResult};
use bytes::Bytes;

/// Token acquired, nothing opened yet
#[derive(Debug)]
pub struct Authorized {
    /// Bearer token for every later call
    pub token: AccessToken,
}

/// Edit open, artifact waiting to be staged
#[derive(Debug)]
pub struct Opened {
    /// Bearer token
    pub token: AccessToken,
    /// Edit issued by the service
    pub transaction: Transaction,
    /// APK bytes
    pub artifact: Bytes,
}

/// Artifact staged; its bytes have been released
#[derive(Debug)]
pub struct Uploaded {
    /// Bearer token
    pub token: AccessToken,
    /// Edit issued by the service
    pub transaction: Transaction,
    /// Version code of the staged artifact
    pub upload: UploadResult,
}

/// Track assignment staged, ready to commit
#[derive(Debug)]
pub struct Assigned {
    /// Bearer token
    pub token: AccessToken,
    /// Edit issued by the service
    pub transaction: Transaction,
    /// Version code of the staged artifact
    pub upload: UploadResult,
    /// Track release set sent to the service
    pub assignment: ChannelAssignment,
}
