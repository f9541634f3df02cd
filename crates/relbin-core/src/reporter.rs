//! Reporter trait for dependency injection
//!
//! This trait allows core logic to report progress and status without
//! being coupled to a specific terminal implementation.

use relbin_schema::{RepoName, Version};

pub trait Reporter: Send + Sync {
    /// A release feed is being queried for the latest version of `name`.
    fn resolving(&self, name: &RepoName, feed_url: &str);

    /// An archive download has started.
    fn downloading(&self, name: &RepoName, version: &Version, url: &str);

    /// A downloaded archive of `size` bytes is being extracted.
    fn extracting(&self, name: &RepoName, version: &Version, size: u64);

    /// Marks an install as successfully completed.
    fn done(&self, name: &RepoName, version: &Version, detail: &str);

    /// Marks an install as failed with a specific reason.
    fn failed(&self, name: &RepoName, version: Option<&Version>, reason: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn resolving(&self, name: &RepoName, feed_url: &str) {
        (**self).resolving(name, feed_url);
    }
    fn downloading(&self, name: &RepoName, version: &Version, url: &str) {
        (**self).downloading(name, version, url);
    }
    fn extracting(&self, name: &RepoName, version: &Version, size: u64) {
        (**self).extracting(name, version, size);
    }
    fn done(&self, name: &RepoName, version: &Version, detail: &str) {
        (**self).done(name, version, detail);
    }
    fn failed(&self, name: &RepoName, version: Option<&Version>, reason: &str) {
        (**self).failed(name, version, reason);
    }
}

/// A no-op reporter for silent operations (e.g., scripting, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn resolving(&self, _: &RepoName, _: &str) {}
    fn downloading(&self, _: &RepoName, _: &Version, _: &str) {}
    fn extracting(&self, _: &RepoName, _: &Version, _: u64) {}
    fn done(&self, _: &RepoName, _: &Version, _: &str) {}
    fn failed(&self, _: &RepoName, _: Option<&Version>, _: &str) {}
}
