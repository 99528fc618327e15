//! Deploy orchestrator.
//!
//! Runs authenticate → upload → trigger in order. The token and the
//! uploaded filename are threaded from one stage to the next; any failure
//! ends the run. There is no rollback: a binary uploaded before a failed
//! trigger stays on Notehub, and re-running overwrites it.

use tracing::info;

use crate::error::DeployError;
use crate::service::FirmwareService;
use crate::types::{DeployMode, DeployOutcome, DeploySummary, DeploymentConfig};

/// Orchestrates a single firmware deployment.
pub struct DeployOrchestrator<'a> {
    service: &'a dyn FirmwareService,
}

impl<'a> DeployOrchestrator<'a> {
    pub fn new(service: &'a dyn FirmwareService) -> Self {
        Self { service }
    }

    /// Runs the full pipeline for `config`.
    pub async fn deploy(&self, config: &DeploymentConfig) -> Result<DeployOutcome, DeployError> {
        config.validate()?;

        let token = self
            .service
            .authenticate(&config.client_id, &config.client_secret)
            .await
            .map_err(DeployError::Authentication)?;

        let firmware_path = config.firmware_path();
        if let Ok(false) = tokio::fs::try_exists(&firmware_path).await {
            return Err(DeployError::FirmwareNotFound(firmware_path));
        }
        info!(path = %firmware_path.display(), "input validation passed");

        let upload = self
            .service
            .upload_firmware(&token, &config.project_uid, &firmware_path)
            .await
            .map_err(DeployError::Upload)?;
        info!(filename = %upload.filename, "firmware uploaded to Notehub");

        if config.mode == DeployMode::UploadOnly {
            info!("upload-only mode, skipping device firmware update");
            return Ok(DeployOutcome {
                uploaded_filename: upload.filename,
                size: upload.size,
                dfu: None,
            });
        }

        let dfu = self
            .service
            .trigger_dfu(
                &token,
                &config.project_uid,
                &config.targeting,
                &upload.filename,
            )
            .await
            .map_err(DeployError::Trigger)?;
        info!("device firmware update triggered");

        DeploySummary::new(config, &upload.filename).log();

        Ok(DeployOutcome {
            uploaded_filename: upload.filename,
            size: upload.size,
            dfu: Some(dfu),
        })
    }
}
