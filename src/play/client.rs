//! HTTP implementation of [`PublishingService`].

use super::wire::{Apk, AppEdit, AppEditRequest, Track};
use super::{
    ChannelAssignment, CommitResult, PublishingService, ServiceError, Transaction, UploadResult,
};
use crate::auth::AccessToken;
use crate::error::{PublishError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

/// Production endpoint of the Android Publisher API
pub const DEFAULT_API_BASE: &str = "https://androidpublisher.googleapis.com";

/// Android Publisher v3 client bound to one package
#[derive(Debug, Clone)]
pub struct PlayClient {
    http: reqwest::Client,
    base: Url,
    package_name: String,
}

impl PlayClient {
    /// Create a client for `package_name` against `api_base`
    pub fn new(http: reqwest::Client, api_base: &str, package_name: &str) -> Result<Self> {
        let base = Url::parse(api_base).map_err(|e| PublishError::Config {
            reason: format!("invalid API base URL '{}': {}", api_base, e),
        })?;

        if base.cannot_be_a_base() {
            return Err(PublishError::Config {
                reason: format!("API base URL '{}' cannot carry a path", api_base),
            });
        }

        Ok(Self {
            http,
            base,
            package_name: package_name.to_string(),
        })
    }

    /// `{base}/[upload/]androidpublisher/v3/applications/{package}/edits/{tail..}`
    fn edits_url(&self, upload: bool, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if upload {
                segments.push("upload");
            }
            segments
                .extend(["androidpublisher", "v3", "applications"])
                .push(&self.package_name)
                .push("edits")
                .extend(tail);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<T, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Rejected(
                crate::http::failure_reason(response).await,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl PublishingService for PlayClient {
    async fn open_transaction(
        &self,
        token: &AccessToken,
        id: &str,
        expiry_seconds: u64,
    ) -> std::result::Result<Transaction, ServiceError> {
        let url = self.edits_url(false, &[]);
        log::debug!("POST {}", url);

        let body = AppEditRequest {
            id,
            expiry_time_seconds: expiry_seconds.to_string(),
        };
        let edit: AppEdit = self
            .send(self.http.post(url).bearer_auth(token.secret()).json(&body))
            .await?;

        Ok(edit.into_transaction(expiry_seconds))
    }

    async fn upload_artifact(
        &self,
        token: &AccessToken,
        transaction_id: &str,
        artifact: Bytes,
        content_type: &str,
    ) -> std::result::Result<UploadResult, ServiceError> {
        let mut url = self.edits_url(true, &[transaction_id, "apks"]);
        url.query_pairs_mut().append_pair("uploadType", "media");
        log::debug!("POST {} ({} bytes)", url, artifact.len());

        let apk: Apk = self
            .send(
                self.http
                    .post(url)
                    .bearer_auth(token.secret())
                    .header(CONTENT_TYPE, content_type)
                    .body(artifact),
            )
            .await?;

        Ok(apk.into())
    }

    async fn update_channel(
        &self,
        token: &AccessToken,
        transaction_id: &str,
        assignment: &ChannelAssignment,
    ) -> std::result::Result<ChannelAssignment, ServiceError> {
        let url = self.edits_url(
            false,
            &[transaction_id, "tracks", assignment.channel_name.as_str()],
        );
        log::debug!("PUT {}", url);

        let track: Track = self
            .send(
                self.http
                    .put(url)
                    .bearer_auth(token.secret())
                    .json(&Track::from(assignment)),
            )
            .await?;

        Ok(track.into())
    }

    async fn commit(
        &self,
        token: &AccessToken,
        transaction_id: &str,
    ) -> std::result::Result<CommitResult, ServiceError> {
        let action = format!("{}:commit", transaction_id);
        let url = self.edits_url(false, &[action.as_str()]);
        log::debug!("POST {}", url);

        let edit: AppEdit = self
            .send(
                self.http
                    .post(url)
                    .bearer_auth(token.secret())
                    .header(CONTENT_LENGTH, 0),
            )
            .await?;

        Ok(edit.into_commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::APK_CONTENT_TYPE;
    use crate::channel::Channel;
    use crate::http::loopback;
    use serde_json::json;

    fn client() -> PlayClient {
        PlayClient::new(reqwest::Client::new(), DEFAULT_API_BASE, "com.example.app").unwrap()
    }

    #[test]
    fn test_edits_url() {
        assert_eq!(
            client().edits_url(false, &[]).as_str(),
            "https://androidpublisher.googleapis.com/androidpublisher/v3/applications/com.example.app/edits"
        );
    }

    #[test]
    fn test_upload_url_has_upload_prefix() {
        assert_eq!(
            client().edits_url(true, &["123", "apks"]).as_str(),
            "https://androidpublisher.googleapis.com/upload/androidpublisher/v3/applications/com.example.app/edits/123/apks"
        );
    }

    #[test]
    fn test_commit_url_keeps_colon_suffix() {
        assert_eq!(
            client().edits_url(false, &["123:commit"]).as_str(),
            "https://androidpublisher.googleapis.com/androidpublisher/v3/applications/com.example.app/edits/123:commit"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let client =
            PlayClient::new(reqwest::Client::new(), "http://localhost:8080/play/", "com.example.app")
                .unwrap();
        assert_eq!(
            client.edits_url(false, &["7", "tracks", "beta"]).as_str(),
            "http://localhost:8080/play/androidpublisher/v3/applications/com.example.app/edits/7/tracks/beta"
        );
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        let err = PlayClient::new(reqwest::Client::new(), "not a url", "com.example.app").unwrap_err();
        assert!(matches!(err, PublishError::Config { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client =
            PlayClient::new(reqwest::Client::new(), "http://127.0.0.1:9", "com.example.app").unwrap();
        let err = client
            .open_transaction(&AccessToken::new("token"), "1", 600)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_full_edit_against_loopback_server() {
        let (base, server) = loopback::serve(vec![
            ("200 OK", json!({"id": "123", "expiryTimeSeconds": "1700000600"}).to_string()),
            (
                "200 OK",
                json!({"versionCode": 42, "binary": {"sha1": "aa", "sha256": "bb"}}).to_string(),
            ),
            (
                "200 OK",
                json!({
                    "track": "beta",
                    "releases": [{"versionCodes": ["42"], "status": "completed"}]
                })
                .to_string(),
            ),
            ("200 OK", json!({"id": "123"}).to_string()),
        ])
        .await;
        let client = PlayClient::new(loopback::client(), &base, "com.example.app").unwrap();
        let token = AccessToken::new("ya29.test");

        let transaction = client
            .open_transaction(&token, "1700000000000", 600)
            .await
            .unwrap();
        assert_eq!(transaction.id, "123");
        assert_eq!(transaction.expiry_seconds, 600);
        assert_eq!(
            transaction.expires_at,
            chrono::DateTime::from_timestamp(1_700_000_600, 0)
        );

        let upload = client
            .upload_artifact(
                &token,
                &transaction.id,
                Bytes::from_static(b"PK\x03\x04"),
                APK_CONTENT_TYPE,
            )
            .await
            .unwrap();
        assert_eq!(upload.version_code, 42);
        assert_eq!(upload.sha1.as_deref(), Some("aa"));

        let assignment = ChannelAssignment::single(Channel::Beta, upload.version_code);
        let echoed = client
            .update_channel(&token, &transaction.id, &assignment)
            .await
            .unwrap();
        assert_eq!(echoed, assignment);

        let committed = client.commit(&token, &transaction.id).await.unwrap();
        assert_eq!(committed.id, "123");

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 4);
        for request in &requests {
            assert_eq!(request.header("authorization"), Some("Bearer ya29.test"));
        }

        let open = &requests[0];
        assert_eq!(open.method, "POST");
        assert_eq!(open.target, "/androidpublisher/v3/applications/com.example.app/edits");
        assert_eq!(
            open.json(),
            json!({"id": "1700000000000", "expiryTimeSeconds": "600"})
        );

        let upload = &requests[1];
        assert_eq!(upload.method, "POST");
        assert_eq!(
            upload.target,
            "/upload/androidpublisher/v3/applications/com.example.app/edits/123/apks?uploadType=media"
        );
        assert_eq!(upload.header("content-type"), Some(APK_CONTENT_TYPE));
        assert_eq!(upload.body, b"PK\x03\x04");

        let track = &requests[2];
        assert_eq!(track.method, "PUT");
        assert_eq!(
            track.target,
            "/androidpublisher/v3/applications/com.example.app/edits/123/tracks/beta"
        );
        assert_eq!(
            track.json(),
            json!({
                "track": "beta",
                "releases": [{"versionCodes": ["42"], "status": "completed"}]
            })
        );

        let commit = &requests[3];
        assert_eq!(commit.method, "POST");
        assert_eq!(
            commit.target,
            "/androidpublisher/v3/applications/com.example.app/edits/123:commit"
        );
        assert!(commit.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_envelope_is_surfaced_with_status() {
        let (base, server) = loopback::serve(vec![(
            "403 Forbidden",
            json!({
                "error": {
                    "code": 403,
                    "message": "The caller does not have permission",
                    "status": "PERMISSION_DENIED"
                }
            })
            .to_string(),
        )])
        .await;
        let client = PlayClient::new(loopback::client(), &base, "com.example.app").unwrap();

        let err = client
            .open_transaction(&AccessToken::new("ya29.test"), "1", 600)
            .await
            .unwrap_err();

        match err {
            ServiceError::Rejected(reason) => assert_eq!(
                reason,
                "HTTP 403 Forbidden: The caller does not have permission"
            ),
            other => panic!("expected rejection, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unexpected_body_is_malformed_response() {
        let (base, server) = loopback::serve(vec![(
            "200 OK",
            json!({"versionCode": "forty-two"}).to_string(),
        )])
        .await;
        let client = PlayClient::new(loopback::client(), &base, "com.example.app").unwrap();

        let err = client
            .upload_artifact(
                &AccessToken::new("ya29.test"),
                "123",
                Bytes::from_static(b"PK"),
                APK_CONTENT_TYPE,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::MalformedResponse(_)));
        server.await.unwrap();
    }
}
