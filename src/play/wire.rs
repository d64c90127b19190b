//! JSON payloads of the Android Publisher v3 API.
//!
//! int64 fields travel as strings; int32 fields as numbers. Both are accepted
//! in either form on the way in.

use super::{ChannelAssignment, CommitResult, Transaction, UploadResult};
use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Release status that makes the assigned versions available on commit
const RELEASE_COMPLETED: &str = "completed";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEditRequest<'a> {
    pub id: &'a str,
    pub expiry_time_seconds: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEdit {
    pub id: String,
    /// Absolute deadline in epoch seconds, unlike the window in the request
    #[serde(default, deserialize_with = "lenient_u64_opt")]
    pub expiry_time_seconds: Option<u64>,
}

impl AppEdit {
    pub fn into_transaction(self, requested_expiry: u64) -> Transaction {
        let expires_at = self
            .expiry_time_seconds
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        Transaction {
            id: self.id,
            expiry_seconds: requested_expiry,
            expires_at,
        }
    }

    pub fn into_commit(self) -> CommitResult {
        CommitResult { id: self.id }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apk {
    #[serde(deserialize_with = "lenient_u64")]
    pub version_code: u64,
    #[serde(default)]
    pub binary: Option<ApkBinary>,
}

#[derive(Deserialize)]
pub struct ApkBinary {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl From<Apk> for UploadResult {
    fn from(apk: Apk) -> Self {
        let (sha1, sha256) = apk
            .binary
            .map(|binary| (binary.sha1, binary.sha256))
            .unwrap_or_default();
        Self {
            version_code: apk.version_code,
            sha1,
            sha256,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track: String,
    #[serde(default)]
    pub releases: Vec<TrackRelease>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    #[serde(
        default,
        serialize_with = "u64_vec_as_strings",
        deserialize_with = "lenient_u64_vec"
    )]
    pub version_codes: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<&ChannelAssignment> for Track {
    fn from(assignment: &ChannelAssignment) -> Self {
        Self {
            track: assignment.channel_name.clone(),
            releases: vec![TrackRelease {
                version_codes: assignment.version_codes.clone(),
                status: Some(RELEASE_COMPLETED.to_string()),
            }],
        }
    }
}

impl From<Track> for ChannelAssignment {
    fn from(track: Track) -> Self {
        Self {
            channel_name: track.track,
            version_codes: track
                .releases
                .into_iter()
                .flat_map(|release| release.version_codes)
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl NumberOrString {
    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .parse()
                .map_err(|_| E::custom(format!("expected integer, found '{}'", s))),
        }
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_u64()
}

fn lenient_u64_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_u64)
        .transpose()
}

fn lenient_u64_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<NumberOrString>::deserialize(deserializer)?
        .into_iter()
        .map(NumberOrString::into_u64)
        .collect()
}

fn u64_vec_as_strings<S: serde::Serializer>(codes: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(codes.iter().map(u64::to_string))
}
