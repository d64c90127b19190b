//! The publish command: resolve settings, build collaborators, run the pipeline.

use crate::artifact::read_artifact;
use crate::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::cli::{Args, RuntimeConfig};
use crate::config::{DEFAULT_SETTINGS_FILE, PublishConfig, Settings};
use crate::error::{Result, Stage};
use crate::http;
use crate::pipeline::{PublishOptions, PublishReport, Publisher, REMOTE_STAGES};
use crate::play::PlayClient;
use std::path::{Path, PathBuf};

/// Merge command line, settings file and fallback environment
fn resolve_settings(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => Settings::load(path, true)?,
        None => Settings::load(Path::new(DEFAULT_SETTINGS_FILE), false)?,
    };

    let ambient = Settings {
        key: std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from),
        ..Settings::default()
    };

    Ok(args.settings().or(file).or(ambient))
}

pub(super) async fn execute_publish(args: &Args, config: &RuntimeConfig) -> Result<PublishReport> {
    // Unknown tracks fail here, before anything touches the network
    let publish_config = PublishConfig::try_from(resolve_settings(args)?)?;

    config.println(&format!(
        "📦 Publishing {} to track '{}'",
        publish_config.package_name, publish_config.channel
    ));

    let artifact = read_artifact(&publish_config.artifact_path).await?;
    config.verbose_println(&format!(
        "Artifact: {} ({} bytes)",
        publish_config.artifact_path.display(),
        artifact.len()
    ));

    let key = ServiceAccountKey::from_file(&publish_config.key_path).await?;
    config.verbose_println(&format!("Service account: {}", key.client_email));

    let http = http::build_client(publish_config.timeout)?;
    let auth = ServiceAccountAuth::new(key, http.clone());
    let client = PlayClient::new(
        http,
        &publish_config.api_base,
        &publish_config.package_name,
    )?;

    let progress = |stage: Stage| {
        if let Some(index) = REMOTE_STAGES.iter().position(|s| *s == stage) {
            config.step(index + 1, REMOTE_STAGES.len(), stage.progress_label());
        }
    };
    let publisher = Publisher::new(&auth, &client, PublishOptions::from(&publish_config))
        .with_progress(&progress);
    publisher.publish(artifact).await
}
