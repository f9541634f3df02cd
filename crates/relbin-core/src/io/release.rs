//! Release feed lookup.
//!
//! A release feed is a JSON document (GitHub's `releases/latest` shape) with
//! at least a string `tag_name`. Only that field is read.

use relbin_schema::{Version, VersionError};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Network error querying release feed {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Release feed {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed release feed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Release feed {url} published an unusable tag: {source}")]
    InvalidVersion { url: String, source: VersionError },
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Fetch the latest published version from a release feed.
///
/// Issues exactly one GET. Retrying is left to the caller.
///
/// # Errors
///
/// - [`ResolveError::Network`] on transport failure (DNS, refused, timeout)
/// - [`ResolveError::HttpStatus`] on a non-2xx response
/// - [`ResolveError::MalformedResponse`] if the body is not JSON or lacks a string `tag_name`
/// - [`ResolveError::InvalidVersion`] if `tag_name` is not a `v`-prefixed semantic version
pub async fn resolve_latest(client: &Client, feed_url: &str) -> Result<Version, ResolveError> {
    debug!(url = feed_url, "querying release feed");

    let network = |source| ResolveError::Network {
        url: feed_url.to_string(),
        source,
    };

    let response = client
        .get(feed_url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::HttpStatus {
            url: feed_url.to_string(),
            status,
        });
    }

    let body = response.text().await.map_err(network)?;
    let release: LatestRelease =
        serde_json::from_str(&body).map_err(|e| ResolveError::MalformedResponse {
            url: feed_url.to_string(),
            reason: e.to_string(),
        })?;

    let version = Version::parse(&release.tag_name).map_err(|source| {
        ResolveError::InvalidVersion {
            url: feed_url.to_string(),
            source,
        }
    })?;

    debug!(url = feed_url, %version, "resolved latest release");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const FEED_PATH: &str = "/repos/ava-labs/subnet-evm/releases/latest";

    async fn feed_returning(server: &mut Server, status: usize, body: &str) -> mockito::Mock {
        server
            .mock("GET", FEED_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_resolves_tag_name() {
        let mut server = Server::new_async().await;
        let mock = feed_returning(
            &mut server,
            200,
            r#"{"tag_name": "v1.2.3", "name": "Release 1.2.3", "draft": false}"#,
        )
        .await;

        let url = format!("{}{FEED_PATH}", server.url());
        let version = resolve_latest(&Client::new(), &url).await.unwrap();

        assert_eq!(version, "v1.2.3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_prefix_is_invalid_version() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 200, r#"{"tag_name": "1.2.3"}"#).await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::InvalidVersion {
                source: VersionError::MissingPrefix(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_tag_is_invalid_version() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 200, r#"{"tag_name": ""}"#).await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::InvalidVersion {
                source: VersionError::Empty,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 200, r#"{"name": "v1.2.3"}"#).await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_non_string_tag_is_malformed() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 200, r#"{"tag_name": 123}"#).await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_non_json_is_malformed() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 200, "<html>rate limited</html>").await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _m = feed_returning(&mut server, 404, r#"{"message": "Not Found"}"#).await;

        let url = format!("{}{FEED_PATH}", server.url());
        let err = resolve_latest(&Client::new(), &url).await.unwrap_err();

        match err {
            ResolveError::HttpStatus { status, url: u } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(u, url);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let err = resolve_latest(&Client::new(), "http://127.0.0.1:9/releases/latest")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Network { .. }));
    }
}
