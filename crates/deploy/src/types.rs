//! Data types for the deploy flow.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use notehub_deploy_api::{DfuResponse, Targeting};
use tracing::info;

use crate::error::DeployError;

/// Directory the firmware file input is resolved against.
pub const DEFAULT_FIRMWARE_DIR: &str = "./firmware";

/// Whether the run stops after the upload or also requests a DFU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployMode {
    UploadOnly,
    #[default]
    UploadAndUpdate,
}

impl DeployMode {
    /// Maps the raw `issue_dfu` input to a mode.
    ///
    /// Only `"false"` (any case) selects upload-only. Every other value,
    /// including empty or unrecognised input, issues the update.
    pub fn from_issue_dfu(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("false") {
            DeployMode::UploadOnly
        } else {
            DeployMode::UploadAndUpdate
        }
    }

    pub fn issues_update(self) -> bool {
        self == DeployMode::UploadAndUpdate
    }
}

/// Everything one deployment run needs. Built once from the action inputs.
#[derive(Clone)]
pub struct DeploymentConfig {
    pub project_uid: String,
    /// Firmware path relative to `firmware_dir`.
    pub firmware_file: String,
    pub client_id: String,
    pub client_secret: String,
    pub firmware_dir: PathBuf,
    pub mode: DeployMode,
    pub targeting: Targeting,
}

impl fmt::Debug for DeploymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentConfig")
            .field("project_uid", &self.project_uid)
            .field("firmware_file", &self.firmware_file)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("firmware_dir", &self.firmware_dir)
            .field("mode", &self.mode)
            .field("targeting", &self.targeting)
            .finish()
    }
}

impl DeploymentConfig {
    /// Creates a config with the default firmware directory, no targeting,
    /// and the update enabled.
    pub fn new(
        project_uid: impl Into<String>,
        firmware_file: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            project_uid: project_uid.into(),
            firmware_file: firmware_file.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            firmware_dir: PathBuf::from(DEFAULT_FIRMWARE_DIR),
            mode: DeployMode::default(),
            targeting: Targeting::default(),
        }
    }

    /// Checks that every required input is present.
    pub fn validate(&self) -> Result<(), DeployError> {
        let required = [
            ("project_uid", &self.project_uid),
            ("firmware_file", &self.firmware_file),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];
        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(DeployError::MissingInput(*name)),
            None => Ok(()),
        }
    }

    /// Local path of the firmware binary.
    ///
    /// Only the normal components of `firmware_file` are joined, so root,
    /// drive prefixes and `..` cannot move the path out of `firmware_dir`.
    pub fn firmware_path(&self) -> PathBuf {
        let relative = Path::new(&self.firmware_file)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)));
        let mut path = self.firmware_dir.clone();
        path.extend(relative);
        path
    }
}

/// Result of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// Filename Notehub assigned to the upload.
    pub uploaded_filename: String,
    /// Bytes uploaded.
    pub size: usize,
    /// DFU response, `None` in upload-only mode.
    pub dfu: Option<DfuResponse>,
}

impl DeployOutcome {
    pub fn dfu_triggered(&self) -> bool {
        self.dfu.is_some()
    }
}

/// Human-readable summary of a completed deployment.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    lines: Vec<String>,
}

impl DeploySummary {
    pub fn new(config: &DeploymentConfig, uploaded_filename: &str) -> Self {
        let mut lines = vec![
            format!("Project UID: {}", config.project_uid),
            format!("Firmware File: {}", config.firmware_file),
            format!("Uploaded Filename: {uploaded_filename}"),
        ];

        let t = &config.targeting;
        let targets = [
            ("Target Device UID", &t.device_uid),
            ("Target Tags", &t.tag),
            ("Target Serial Number", &t.serial_number),
            ("Fleet UID", &t.fleet_uid),
            ("Product UID", &t.product_uid),
            ("Notecard Firmware", &t.notecard_firmware),
            ("Location", &t.location),
            ("SKU", &t.sku),
        ];
        for (label, value) in targets {
            if !value.is_empty() {
                lines.push(format!("{label}: {value}"));
            }
        }

        lines.push("Deployment Status: SUCCESS".to_string());
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Emits the summary at info level, one event per line.
    pub fn log(&self) {
        info!("=== Deployment Summary ===");
        for line in &self.lines {
            info!("{line}");
        }
    }
}

impl fmt::Display for DeploySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Deployment Summary ===")?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
