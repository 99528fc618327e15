//! Deploy run wiring.

use anyhow::Context;
use notehub_deploy_core::{DeployOrchestrator, DeployOutcome, DeploymentConfig, FirmwareService};
use tracing::info;

use crate::outputs::{self, Outputs};

/// Runs one deployment and publishes its outputs.
///
/// Outputs are written only when the whole run succeeded.
pub async fn run(
    service: &dyn FirmwareService,
    config: DeploymentConfig,
    outputs: &Outputs,
) -> anyhow::Result<DeployOutcome> {
    info!(
        project = %config.project_uid,
        firmware = %config.firmware_file,
        mode = ?config.mode,
        "starting firmware deployment to Notehub"
    );

    let outcome = DeployOrchestrator::new(service)
        .deploy(&config)
        .await
        .context("Deployment failed")?;

    outputs
        .set("status", "success")
        .context("failed to write step outputs")?;
    outputs
        .set("filename", &outcome.uploaded_filename)
        .context("failed to write step outputs")?;

    Ok(outcome)
}

/// Workflow annotation for a failed run, carrying the full error chain.
pub fn failure_annotation(err: &anyhow::Error) -> String {
    outputs::error_command(&format!("{err:#}"))
}
