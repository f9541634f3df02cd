//! Archive retrieval.
//!
//! The whole archive is buffered in memory. The bytes are only handed back
//! once the body has been read to the end, so a truncated transfer can never
//! reach the installer.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error downloading {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} downloading {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("Failed to read archive body from {url}: {reason}")]
    Read { url: String, reason: String },
}

impl FetchError {
    /// HTTP status for [`FetchError::UnexpectedStatus`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Download `url` into memory.
///
/// Only a `200 OK` is accepted. No retry is performed.
///
/// # Errors
///
/// - [`FetchError::Network`] if the connection fails or the request times out
/// - [`FetchError::UnexpectedStatus`] for any status other than 200
/// - [`FetchError::Read`] if the body cannot be read completely
pub async fn fetch_archive(client: &Client, url: &str) -> Result<Bytes, FetchError> {
    debug!(url, "starting download");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    let expected_len = response.content_length();
    let body = response.bytes().await.map_err(|source| {
        // A deadline hit mid-body is still a transport failure.
        if source.is_timeout() {
            FetchError::Network {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::Read {
                url: url.to_string(),
                reason: source.to_string(),
            }
        }
    })?;

    if let Some(expected) = expected_len {
        if body.len() as u64 != expected {
            return Err(FetchError::Read {
                url: url.to_string(),
                reason: format!("expected {expected} bytes, received {}", body.len()),
            });
        }
    }

    debug!(url, bytes = body.len(), "download successful");
    Ok(body)
}
