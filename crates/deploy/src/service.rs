//! Firmware service trait.
//!
//! `FirmwareService` is the seam between the deploy flow and the Notehub
//! HTTP client. Tests swap in a mock to drive each stage independently.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use notehub_deploy_api::{AccessToken, Client, DfuResponse, Error, Targeting, UploadResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The three remote operations a deployment performs.
pub trait FirmwareService: Send + Sync {
    /// Exchanges client credentials for a bearer token.
    fn authenticate<'a>(
        &'a self,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> BoxFuture<'a, Result<AccessToken, Error>>;

    /// Uploads the firmware binary at `path`.
    fn upload_firmware<'a>(
        &'a self,
        token: &'a AccessToken,
        project_uid: &'a str,
        path: &'a Path,
    ) -> BoxFuture<'a, Result<UploadResult, Error>>;

    /// Requests a DFU of `filename` on the targeted devices.
    fn trigger_dfu<'a>(
        &'a self,
        token: &'a AccessToken,
        project_uid: &'a str,
        targeting: &'a Targeting,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<DfuResponse, Error>>;
}

impl FirmwareService for Client {
    fn authenticate<'a>(
        &'a self,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> BoxFuture<'a, Result<AccessToken, Error>> {
        Box::pin(Client::authenticate(self, client_id, client_secret))
    }

    fn upload_firmware<'a>(
        &'a self,
        token: &'a AccessToken,
        project_uid: &'a str,
        path: &'a Path,
    ) -> BoxFuture<'a, Result<UploadResult, Error>> {
        Box::pin(Client::upload_firmware(self, token, project_uid, path))
    }

    fn trigger_dfu<'a>(
        &'a self,
        token: &'a AccessToken,
        project_uid: &'a str,
        targeting: &'a Targeting,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<DfuResponse, Error>> {
        Box::pin(Client::trigger_dfu(
            self,
            token,
            project_uid,
            targeting,
            filename,
        ))
    }
}
