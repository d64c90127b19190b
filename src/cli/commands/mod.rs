//! Command execution and the single terminal error handler.

mod publish;

use crate::cli::{Args, RuntimeConfig};
use publish::execute_publish;

/// Run a publish and map its outcome to an exit code.
///
/// Any error ends up here: it is printed once with its recovery suggestions
/// and the run exits with status 1.
pub async fn execute_command(args: Args) -> i32 {
    let config = RuntimeConfig::from(&args);

    match execute_publish(&args, &config).await {
        Ok(report) => {
            if config.is_json() {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        config.error_println(&format!("Failed to encode report: {}", e));
                        return 1;
                    }
                }
            } else {
                config.success_println(&format!(
                    "Published {} version code {} to {}",
                    report.package_name, report.version_code, report.assignment.channel_name
                ));
                config.detail("Edit", &report.transaction_id);
                if let Some(sha1) = &report.sha1 {
                    config.detail("SHA-1", sha1);
                }
                if let Some(sha256) = &report.sha256 {
                    config.detail("SHA-256", sha256);
                }
            }
            0
        }
        Err(e) => {
            log::debug!("Publish aborted at {} stage: {:?}", e.stage(), e);
            config.error_println(&format!("Publish failed during {}: {}", e.stage(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            1
        }
    }
}
