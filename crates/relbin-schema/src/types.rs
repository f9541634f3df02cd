//! Validated identifiers: release [`Version`] tags and repository names.
//!
//! Both are checked once at construction and are immutable afterwards, so
//! every later use as a URL or path segment can rely on them.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use thiserror::Error;

/// Errors that can occur when validating a release [`Version`] tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The tag is the empty string.
    #[error("Invalid version: tag is empty")]
    Empty,

    /// The tag does not start with the literal `v`.
    #[error("Invalid version '{0}': release tags must start with 'v'")]
    MissingPrefix(String),

    /// The part after `v` is not a semantic version.
    #[error("Invalid version '{tag}': {reason}")]
    Malformed {
        /// The rejected tag.
        tag: String,
        /// Why the semantic-version parser rejected it.
        reason: String,
    },
}

/// A release tag of the form `v<major>.<minor>.<patch>[-pre][+build]`.
///
/// The tag is kept verbatim (including the `v`) because release URLs use it
/// as-is; [`Version::without_prefix`] gives the form used in archive names.
///
/// # Example
///
/// ```
/// use relbin_schema::Version;
///
/// let v: Version = "v1.2.3".parse().unwrap();
/// assert_eq!(v.as_str(), "v1.2.3");
/// assert_eq!(v.without_prefix(), "1.2.3");
/// assert!("1.2.3".parse::<Version>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    tag: String,
    semver: semver::Version,
}

impl Version {
    /// Validate and wrap a release tag.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Empty`] for an empty tag,
    /// [`VersionError::MissingPrefix`] if it does not start with `v`, and
    /// [`VersionError::Malformed`] if the remainder is not a semantic version.
    pub fn parse(tag: &str) -> Result<Self, VersionError> {
        if tag.is_empty() {
            return Err(VersionError::Empty);
        }
        let Some(rest) = tag.strip_prefix('v') else {
            return Err(VersionError::MissingPrefix(tag.to_string()));
        };
        let semver = semver::Version::parse(rest).map_err(|e| VersionError::Malformed {
            tag: tag.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            tag: tag.to_string(),
            semver,
        })
    }

    /// The tag exactly as published, e.g. `v1.2.3`.
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The tag with its leading `v` removed, e.g. `1.2.3`.
    pub fn without_prefix(&self) -> &str {
        &self.tag[1..]
    }

    /// The parsed semantic version.
    pub fn semver(&self) -> &semver::Version {
        &self.semver
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.semver
            .cmp(&other.semver)
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag)
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.tag
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.tag == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.tag == *other
    }
}

/// Errors that can occur when validating a [`RepoName`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoNameError {
    /// The name is empty.
    #[error("Repository name is empty")]
    Empty,

    /// The name cannot be used as a single URL segment and directory name.
    #[error("Invalid repository name '{0}': must be a single path segment")]
    Invalid(String),
}

/// A release repository name, e.g. `subnet-evm`.
///
/// Used verbatim as a URL segment, in archive file names and as the prefix of
/// installation directories, so it must be one plain path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName(String);

impl RepoName {
    /// Validate a repository name.
    ///
    /// # Errors
    ///
    /// Returns [`RepoNameError::Empty`] for an empty string and
    /// [`RepoNameError::Invalid`] for `.`, `..`, or names containing path
    /// separators or whitespace.
    pub fn new(name: &str) -> Result<Self, RepoNameError> {
        if name.is_empty() {
            return Err(RepoNameError::Empty);
        }
        if name == "."
            || name == ".."
            || name
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        {
            return Err(RepoNameError::Invalid(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RepoName {
    type Err = RepoNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RepoName {
    type Error = RepoNameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<RepoName> for String {
    fn from(name: RepoName) -> Self {
        name.0
    }
}

impl std::ops::Deref for RepoName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for RepoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RepoName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for RepoName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
