//! Action inputs.
//!
//! Each flag falls back to the variable GitHub Actions exports for the
//! matching `with:` input (`INPUT_<NAME>`). Everything defaults to empty so
//! that missing required inputs are reported by the deploy crate.

use std::path::PathBuf;

use clap::Parser;
use notehub_deploy_api::Targeting;
use notehub_deploy_core::{DEFAULT_FIRMWARE_DIR, DeployMode, DeploymentConfig};

#[derive(Clone, Parser)]
#[command(
    name = "notehub-deploy",
    version,
    about = "Upload host firmware to Notehub and trigger a device firmware update"
)]
pub struct Inputs {
    /// Notehub project UID, e.g. app:2606f411-dea6-44a0-9743-1130f57d77d8
    #[arg(long, env = "INPUT_PROJECT_UID", default_value = "")]
    pub project_uid: String,

    /// Firmware binary, relative to the firmware directory.
    #[arg(long, env = "INPUT_FIRMWARE_FILE", default_value = "")]
    pub firmware_file: String,

    /// OAuth2 client ID.
    #[arg(long, env = "INPUT_CLIENT_ID", default_value = "")]
    pub client_id: String,

    /// OAuth2 client secret.
    #[arg(
        long,
        env = "INPUT_CLIENT_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    pub client_secret: String,

    /// Set to "false" to upload without issuing the update.
    #[arg(long, env = "INPUT_ISSUE_DFU", default_value = "true")]
    pub issue_dfu: String,

    /// Directory the firmware file is resolved against.
    #[arg(long, env = "INPUT_FIRMWARE_DIR", default_value = DEFAULT_FIRMWARE_DIR)]
    pub firmware_dir: PathBuf,

    /// Device UID(s), comma-separated.
    #[arg(long, env = "INPUT_DEVICE_UID", default_value = "")]
    pub device_uid: String,

    /// Device tag(s), comma-separated.
    #[arg(long, env = "INPUT_TAG", default_value = "")]
    pub tag: String,

    /// Serial number(s), comma-separated.
    #[arg(long, env = "INPUT_SERIAL_NUMBER", default_value = "")]
    pub serial_number: String,

    /// Fleet UID(s), comma-separated.
    #[arg(long, env = "INPUT_FLEET_UID", default_value = "")]
    pub fleet_uid: String,

    /// Product UID(s), comma-separated.
    #[arg(long, env = "INPUT_PRODUCT_UID", default_value = "")]
    pub product_uid: String,

    /// Notecard firmware version(s), comma-separated.
    #[arg(long, env = "INPUT_NOTECARD_FIRMWARE", default_value = "")]
    pub notecard_firmware: String,

    /// Device location(s), comma-separated.
    #[arg(long, env = "INPUT_LOCATION", default_value = "")]
    pub location: String,

    /// SKU(s), comma-separated.
    #[arg(long, env = "INPUT_SKU", default_value = "")]
    pub sku: String,
}

impl From<Inputs> for DeploymentConfig {
    fn from(inputs: Inputs) -> Self {
        Self {
            mode: DeployMode::from_issue_dfu(&inputs.issue_dfu),
            project_uid: inputs.project_uid,
            firmware_file: inputs.firmware_file,
            client_id: inputs.client_id,
            client_secret: inputs.client_secret,
            firmware_dir: inputs.firmware_dir,
            targeting: Targeting {
                device_uid: inputs.device_uid,
                tag: inputs.tag,
                serial_number: inputs.serial_number,
                fleet_uid: inputs.fleet_uid,
                product_uid: inputs.product_uid,
                notecard_firmware: inputs.notecard_firmware,
                location: inputs.location,
                sku: inputs.sku,
            },
        }
    }
}
