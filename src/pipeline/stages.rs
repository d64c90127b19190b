//! The four remote stages of a publish run.

use super::Publisher;
use super::context::{Assigned, Authorized, Opened, Uploaded};
use super::report::PublishReport;
use crate::artifact::APK_CONTENT_TYPE;
use crate::error::{ChannelError, PublishError, Result, Stage};
use crate::play::ChannelAssignment;
use bytes::Bytes;

impl Publisher<'_> {
    /// Acquire the bearer token used by every stage
    pub(super) async fn authorize(&self) -> Result<Authorized> {
        self.enter(Stage::Authorize);
        let token = self.auth.access_token().await?;
        log::info!("Authorized");
        Ok(Authorized { token })
    }

    /// Open an edit, preferring the id the service hands back
    pub(super) async fn open_transaction(
        &self,
        ctx: Authorized,
        artifact: Bytes,
    ) -> Result<Opened> {
        self.enter(Stage::Open);
        let local_id = (self.transaction_id)();
        log::info!(
            "Opening edit {} for {} ({}s)",
            local_id,
            self.options.package_name,
            self.options.expiry_seconds
        );

        let transaction = self
            .service
            .open_transaction(&ctx.token, &local_id, self.options.expiry_seconds)
            .await
            .map_err(|e| PublishError::TransactionOpen {
                reason: e.to_string(),
            })?;

        if let Some(deadline) = transaction.expires_at {
            log::debug!("Edit {} expires at {}", transaction.id, deadline);
        }

        if transaction.id != local_id {
            log::debug!(
                "Service normalized edit id {} to {}",
                local_id,
                transaction.id
            );
        }

        Ok(Opened {
            token: ctx.token,
            transaction,
            artifact,
        })
    }

    pub(super) async fn upload_artifact(&self, ctx: Opened) -> Result<Uploaded> {
        self.enter(Stage::Upload);
        let Opened {
            token,
            transaction,
            artifact,
        } = ctx;
        log::info!(
            "Uploading {} bytes to edit {}",
            artifact.len(),
            transaction.id
        );

        let upload = self
            .service
            .upload_artifact(&token, &transaction.id, artifact, APK_CONTENT_TYPE)
            .await
            .map_err(|e| PublishError::Upload {
                reason: e.to_string(),
            })?;

        if upload.version_code == 0 {
            return Err(PublishError::Upload {
                reason: "service reported version code 0".to_string(),
            });
        }

        if let Some(expected) = self.options.expected_version_code
            && expected != upload.version_code
        {
            return Err(PublishError::Upload {
                reason: format!(
                    "uploaded artifact has version code {}, expected {}",
                    upload.version_code, expected
                ),
            });
        }

        log::info!("Staged version code {}", upload.version_code);
        Ok(Uploaded {
            token,
            transaction,
            upload,
        })
    }

    /// Set the track's release set to exactly the uploaded version
    pub(super) async fn assign_channel(&self, ctx: Uploaded) -> Result<Assigned> {
        self.enter(Stage::Assign);
        let assignment = ChannelAssignment::single(self.options.channel, ctx.upload.version_code);
        log::info!(
            "Assigning version code {} to track {}",
            ctx.upload.version_code,
            assignment.channel_name
        );

        let echoed = self
            .service
            .update_channel(&ctx.token, &ctx.transaction.id, &assignment)
            .await
            .map_err(|e| ChannelError::Rejected {
                channel: assignment.channel_name.clone(),
                reason: e.to_string(),
            })?;

        if echoed.version_codes != assignment.version_codes {
            log::warn!(
                "Track {} echoed version codes {:?}, sent {:?}",
                echoed.channel_name,
                echoed.version_codes,
                assignment.version_codes
            );
        }

        Ok(Assigned {
            token: ctx.token,
            transaction: ctx.transaction,
            upload: ctx.upload,
            assignment,
        })
    }

    pub(super) async fn commit_transaction(&self, ctx: Assigned) -> Result<PublishReport> {
        self.enter(Stage::Commit);
        log::info!("Committing edit {}", ctx.transaction.id);

        let committed = self
            .service
            .commit(&ctx.token, &ctx.transaction.id)
            .await
            .map_err(|e| PublishError::Commit {
                edit_id: ctx.transaction.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(PublishReport {
            package_name: self.options.package_name.clone(),
            transaction_id: ctx.transaction.id,
            committed_id: committed.id,
            version_code: ctx.upload.version_code,
            sha1: ctx.upload.sha1,
            sha256: ctx.upload.sha256,
            assignment: ctx.assignment,
        })
    }
}
