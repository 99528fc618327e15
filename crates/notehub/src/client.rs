//! Notehub API client.
//!
//! Async HTTP client using `reqwest`. Authentication is an OAuth2
//! client-credentials exchange; the resulting bearer token is passed
//! explicitly to every later call.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use tracing::{debug, info, warn};

use crate::targeting::Targeting;
use crate::types::{
    AccessToken, DfuRequest, DfuResponse, FirmwareUploadResponse, TokenResponse, UploadResult,
};

pub const DEFAULT_TOKEN_URL: &str = "https://notehub.io/oauth2/token";
pub const DEFAULT_BASE_URL: &str = "https://api.notefile.net/v1";

/// Upper bound for each individual request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters escaped in URL path segments (RFC 3986 pchar is left alone).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'@')
    .remove(b'$');

/// The API call an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Token,
    Upload,
    Dfu,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Token => "OAuth2 token",
            Operation::Upload => "firmware upload",
            Operation::Dfu => "device firmware update",
        })
    }
}

/// Errors from the Notehub client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{op} request failed: {source}")]
    Transport {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} request failed with status {status}: {body}")]
    Api {
        op: Operation,
        status: u16,
        body: String,
    },

    #[error("failed to parse {op} response: {source}")]
    Decode {
        op: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op} response missing {field}")]
    MissingField {
        op: Operation,
        field: &'static str,
    },

    #[error("failed to encode {op} payload: {source}")]
    Encode {
        op: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read firmware file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("firmware path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("access token is not a valid header value")]
    InvalidToken,
}

impl Error {
    /// HTTP status for errors caused by a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Notehub API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    token_url: String,
    base_url: String,
}

impl Client {
    /// Creates a client for the public Notehub endpoints.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at other endpoints (a local test server).
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn send(&self, op: Operation, request: reqwest::Request) -> Result<String, Error> {
        let resp = self
            .http
            .execute(request)
            .await
            .map_err(|source| Error::Transport { op, source })?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| Error::Transport { op, source })?;

        if !status.is_success() {
            return Err(Error::Api {
                op,
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Exchanges client credentials for a bearer token.
    pub async fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, Error> {
        let op = Operation::Token;
        info!("obtaining OAuth2 bearer token from Notehub");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        let request = self
            .http
            .post(&self.token_url)
            .form(&form)
            .build()
            .map_err(|source| Error::Transport { op, source })?;

        let body = self.send(op, request).await?;
        let resp: TokenResponse =
            serde_json::from_str(&body).map_err(|source| Error::Decode { op, source })?;

        if resp.access_token.is_empty() {
            return Err(Error::MissingField {
                op,
                field: "access_token",
            });
        }

        debug!(
            token_type = %resp.token_type,
            expires_in = resp.expires_in,
            "token issued"
        );
        info!("OAuth2 token obtained");
        Ok(AccessToken::new(resp.access_token))
    }

    /// Uploads a host firmware binary to a project.
    ///
    /// The file is read fully into memory and sent as the raw request body.
    /// The returned filename is the one Notehub stored, which may not match
    /// the local name.
    pub async fn upload_firmware(
        &self,
        token: &AccessToken,
        project_uid: &str,
        path: &Path,
    ) -> Result<UploadResult, Error> {
        let op = Operation::Upload;

        let data = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let local_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
        let size = data.len();

        info!(
            project = %project_uid,
            file = %local_name,
            bytes = size,
            "uploading firmware to Notehub"
        );

        let url = format!(
            "{}/projects/{}/firmware/host/{}",
            self.base_url,
            encode_segment(project_uid),
            encode_segment(&local_name)
        );
        let request = self
            .http
            .put(&url)
            .header(AUTHORIZATION, bearer(token)?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .build()
            .map_err(|source| Error::Transport { op, source })?;

        let body = self.send(op, request).await?;
        let resp: FirmwareUploadResponse =
            serde_json::from_str(&body).map_err(|source| Error::Decode { op, source })?;

        if resp.filename.is_empty() {
            return Err(Error::MissingField {
                op,
                field: "filename",
            });
        }

        info!(filename = %resp.filename, "firmware upload complete");
        Ok(UploadResult {
            filename: resp.filename,
            size,
        })
    }

    /// Requests an outboard firmware update for the devices matching
    /// `targeting`.
    ///
    /// Only the HTTP status decides success. The body is decoded on a
    /// best-effort basis; an unexpected shape yields a default response.
    pub async fn trigger_dfu(
        &self,
        token: &AccessToken,
        project_uid: &str,
        targeting: &Targeting,
        filename: &str,
    ) -> Result<DfuResponse, Error> {
        let op = Operation::Dfu;
        info!("triggering device firmware update");

        let payload = serde_json::to_vec(&DfuRequest { filename })
            .map_err(|source| Error::Encode { op, source })?;
        debug!(payload = %String::from_utf8_lossy(&payload), "DFU payload");

        let url = format!(
            "{}/projects/{}/dfu/host/update",
            self.base_url,
            encode_segment(project_uid)
        );
        let mut builder = self
            .http
            .post(&url)
            .header(AUTHORIZATION, bearer(token)?)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);

        let params = targeting.query_params();
        if !params.is_empty() {
            builder = builder.query(params.pairs());
        }

        let request = builder
            .build()
            .map_err(|source| Error::Transport { op, source })?;
        info!(url = %request.url(), "DFU request");

        let body = self.send(op, request).await?;
        info!(response = %body, "device firmware update triggered");

        if body.trim().is_empty() {
            return Ok(DfuResponse::default());
        }
        match serde_json::from_str::<DfuResponse>(&body) {
            Ok(resp) => Ok(resp),
            Err(err) => {
                warn!(error = %err, "unexpected DFU response shape");
                Ok(DfuResponse::default())
            }
        }
    }
}

fn bearer(token: &AccessToken) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
        .map_err(|_| Error::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
