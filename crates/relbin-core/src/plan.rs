//! Download planning: turning (repository, version, platform) into an archive URL.
//!
//! Pure functions only. Nothing in here touches the network or the
//! filesystem, so the same inputs always produce the same URL and an
//! unsupported host is reported before any I/O is attempted.

use relbin_schema::{Os, Platform, PlatformDescriptor, PlatformError, RepoName, Version};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    UnsupportedPlatform(#[from] PlatformError),
}

/// Where release archives live: `<host>/<org>/<repo>/releases/download/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    pub host: String,
    pub org: String,
}

impl ReleaseSource {
    pub fn new(host: &str, org: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            org: org.to_string(),
        }
    }
}

/// A fully planned download. Constructed per install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub repository: RepoName,
    pub version: Version,
    pub platform: Platform,
    pub url: String,
}

/// Archive file name as published: the tag keeps its `v` in the URL path but
/// the file name drops it, e.g. `subnet-evm_1.2.3_linux_amd64.tar.gz`.
pub fn archive_name(repo: &RepoName, version: &Version, platform: Platform) -> String {
    format!(
        "{repo}_{}_{}_{}.tar.gz",
        version.without_prefix(),
        platform.os,
        platform.arch
    )
}

/// Build the download URL for `repo` at `version` on the described host.
///
/// # Errors
///
/// Returns [`PlanError::UnsupportedPlatform`] if no archive is published for
/// the host's OS/architecture. No URL is guessed in that case.
pub fn build_download_url(
    source: &ReleaseSource,
    repo: &RepoName,
    version: &Version,
    host: &PlatformDescriptor,
) -> Result<DownloadTarget, PlanError> {
    let platform = Platform::try_from(host)?;
    let base = format!("{}/{}/{repo}/releases/download/{version}", source.host, source.org);

    let url = match platform.os {
        Os::Linux | Os::Darwin => format!("{base}/{}", archive_name(repo, version, platform)),
    };

    Ok(DownloadTarget {
        repository: repo.clone(),
        version: version.clone(),
        platform,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relbin_schema::Arch;

    fn github() -> ReleaseSource {
        ReleaseSource::new("https://github.com", "ava-labs")
    }

    fn subnet_evm() -> RepoName {
        RepoName::new("subnet-evm").unwrap()
    }

    fn v123() -> Version {
        Version::parse("v1.2.3").unwrap()
    }

    #[test]
    fn test_strips_prefix_only_from_file_name() {
        let target = build_download_url(
            &github(),
            &subnet_evm(),
            &v123(),
            &PlatformDescriptor::new("linux", "amd64"),
        )
        .unwrap();

        assert_eq!(
            target.url,
            "https://github.com/ava-labs/subnet-evm/releases/download/v1.2.3/subnet-evm_1.2.3_linux_amd64.tar.gz"
        );
        assert_eq!(target.platform, Platform::new(Os::Linux, Arch::Amd64));
    }

    #[test]
    fn test_darwin_arm64_from_rust_identifiers() {
        let target = build_download_url(
            &github(),
            &subnet_evm(),
            &v123(),
            &PlatformDescriptor::new("macos", "aarch64"),
        )
        .unwrap();

        assert!(
            target
                .url
                .ends_with("/v1.2.3/subnet-evm_1.2.3_darwin_arm64.tar.gz")
        );
    }

    #[test]
    fn test_deterministic_for_every_supported_platform() {
        for platform in Platform::ALL {
            let host = PlatformDescriptor::new(platform.os.as_str(), platform.arch.as_str());
            let a = build_download_url(&github(), &subnet_evm(), &v123(), &host).unwrap();
            let b = build_download_url(&github(), &subnet_evm(), &v123(), &host).unwrap();
            assert_eq!(a.url, b.url);
            assert_eq!(a.platform, platform);
            assert!(a.url.contains(&format!("_{}_{}.tar.gz", platform.os, platform.arch)));
        }
    }

    #[test]
    fn test_unsupported_os_is_rejected() {
        for os in ["windows", "freebsd", "android", ""] {
            let err = build_download_url(
                &github(),
                &subnet_evm(),
                &v123(),
                &PlatformDescriptor::new(os, "amd64"),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                PlanError::UnsupportedPlatform(PlatformError::Unsupported { .. })
            ));
        }
    }

    #[test]
    fn test_prerelease_tag() {
        let version = Version::parse("v0.6.0-rc.2").unwrap();
        let target = build_download_url(
            &github(),
            &subnet_evm(),
            &version,
            &PlatformDescriptor::new("linux", "arm64"),
        )
        .unwrap();
        assert!(
            target
                .url
                .ends_with("/download/v0.6.0-rc.2/subnet-evm_0.6.0-rc.2_linux_arm64.tar.gz")
        );
    }

    #[test]
    fn test_trailing_slash_on_host() {
        let source = ReleaseSource::new("http://127.0.0.1:8080/", "acme");
        let target = build_download_url(
            &source,
            &subnet_evm(),
            &v123(),
            &PlatformDescriptor::new("linux", "x86_64"),
        )
        .unwrap();
        assert!(
            target
                .url
                .starts_with("http://127.0.0.1:8080/acme/subnet-evm/releases/download/")
        );
    }
}
