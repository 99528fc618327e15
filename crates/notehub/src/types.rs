//! Request and response types for the Notehub API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OAuth2 bearer token issued by the Notehub token endpoint.
///
/// Returned by [`Client::authenticate`](crate::Client::authenticate) and
/// passed to every authenticated call. The secret never appears in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Response from `POST /oauth2/token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
}

/// Response from the host firmware upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FirmwareUploadResponse {
    #[serde(default)]
    pub filename: String,
}

/// Result of a successful firmware upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Name assigned by Notehub. May differ from the local file name.
    pub filename: String,
    /// Bytes sent.
    pub size: usize,
}

/// Payload for the DFU trigger endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DfuRequest<'a> {
    pub filename: &'a str,
}

/// Best-effort response from the DFU trigger endpoint.
///
/// Neither field is required; the HTTP status alone decides success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfuResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
