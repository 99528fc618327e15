//! Notehub API client for host firmware deployment.
//!
//! Covers the three calls a firmware rollout needs: an OAuth2
//! client-credentials exchange, a raw binary upload of the host firmware,
//! and an outboard DFU request filtered by device [`Targeting`].

pub mod client;
pub mod targeting;
pub mod types;

pub use client::{Client, Error, Operation};
pub use targeting::{QueryParams, Targeting};
pub use types::{AccessToken, DfuResponse, UploadResult};
