//! Host firmware deploy flow for Notehub.
//!
//! # Pipeline
//!
//! 1. **Validate** required inputs
//! 2. **Authenticate** with OAuth2 client credentials
//! 3. **Check** the firmware file exists locally
//! 4. **Upload** the binary, capturing the server-assigned filename
//! 5. **Trigger** the outboard DFU (skipped in upload-only mode) and log a
//!    summary
//!
//! Each stage hands its result to the next explicitly; nothing is retried.

pub mod deploy;
pub mod error;
pub mod service;
pub mod types;

pub use deploy::DeployOrchestrator;
pub use error::DeployError;
pub use service::FirmwareService;
pub use types::{
    DEFAULT_FIRMWARE_DIR, DeployMode, DeployOutcome, DeploySummary, DeploymentConfig,
};
