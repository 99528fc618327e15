//! Deploy error types.

use std::path::PathBuf;

use notehub_deploy_api::Error as ApiError;

/// Errors produced during a firmware deployment.
///
/// Stage variants keep the underlying API error, which carries the HTTP
/// status and response body when the server rejected the request.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("firmware file not found: {}", .0.display())]
    FirmwareNotFound(PathBuf),

    #[error("authentication failed: {0}")]
    Authentication(ApiError),

    #[error("firmware upload failed: {0}")]
    Upload(ApiError),

    #[error("DFU trigger failed: {0}")]
    Trigger(ApiError),
}

impl DeployError {
    /// HTTP status of the rejected request, if the failure was a non-2xx
    /// response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeployError::Authentication(e) | DeployError::Upload(e) | DeployError::Trigger(e) => {
                e.status()
            }
            _ => None,
        }
    }
}
