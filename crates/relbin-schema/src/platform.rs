//! Operating system and CPU architecture of the installing host.
//!
//! A [`PlatformDescriptor`] is whatever the environment reports, verbatim.
//! A [`Platform`] is one of the pairs releases are actually published for.
//! Converting the former into the latter is the only place an unsupported
//! host is detected.
//!
//! # Example
//!
//! ```
//! use relbin_schema::{Arch, Os, Platform, PlatformDescriptor};
//!
//! let host = PlatformDescriptor::new("macos", "aarch64");
//! let platform = Platform::try_from(&host).unwrap();
//! assert_eq!(platform, Platform::new(Os::Darwin, Arch::Arm64));
//! assert_eq!(platform.to_string(), "darwin_arm64");
//! ```

use thiserror::Error;

/// Raised when a host is outside the set of published release platforms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// No release archive is published for this OS/architecture pair.
    #[error("Unsupported platform: {os}/{arch} (releases exist for linux and darwin on amd64 and arm64)")]
    Unsupported {
        /// Operating system identifier as reported by the host.
        os: String,
        /// Architecture identifier as reported by the host.
        arch: String,
    },
}

/// Operating systems that releases are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Linux (any libc).
    Linux,
    /// macOS.
    Darwin,
}

impl Os {
    /// Name used in release file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" | "osx" => Ok(Self::Darwin),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

/// CPU architectures that releases are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// `x86_64`, published as `amd64`.
    Amd64,
    /// ARM64 (Apple Silicon, Graviton), published as `arm64`.
    Arm64,
}

impl Arch {
    /// Name used in release file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Ok(Self::Amd64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// The host as reported by the environment. Pure data, no validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformDescriptor {
    /// Operating system identifier (e.g. `linux`, `macos`, `windows`).
    pub os: String,
    /// Architecture identifier (e.g. `x86_64`, `aarch64`).
    pub arch: String,
}

impl PlatformDescriptor {
    /// Build a descriptor from raw identifiers.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Describe the running process using `std::env::consts`.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }
}

impl std::fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// A supported (OS, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Every platform releases are published for.
    pub const ALL: [Platform; 4] = [
        Platform::new(Os::Linux, Arch::Amd64),
        Platform::new(Os::Linux, Arch::Arm64),
        Platform::new(Os::Darwin, Arch::Amd64),
        Platform::new(Os::Darwin, Arch::Arm64),
    ];

    /// Pair an OS with an architecture.
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Resolve the running host.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when the host OS or architecture
    /// has no published releases.
    pub fn current() -> Result<Self, PlatformError> {
        Self::try_from(&PlatformDescriptor::current())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}

impl TryFrom<&PlatformDescriptor> for Platform {
    type Error = PlatformError;

    fn try_from(host: &PlatformDescriptor) -> Result<Self, Self::Error> {
        let unsupported = || PlatformError::Unsupported {
            os: host.os.clone(),
            arch: host.arch.clone(),
        };
        let os = host.os.parse::<Os>().map_err(|_| unsupported())?;
        let arch = host.arch.parse::<Arch>().map_err(|_| unsupported())?;
        Ok(Self::new(os, arch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_identifiers_normalise() {
        let p = Platform::try_from(&PlatformDescriptor::new("linux", "x86_64")).unwrap();
        assert_eq!(p, Platform::new(Os::Linux, Arch::Amd64));

        let p = Platform::try_from(&PlatformDescriptor::new("macos", "aarch64")).unwrap();
        assert_eq!(p, Platform::new(Os::Darwin, Arch::Arm64));
    }

    #[test]
    fn test_go_identifiers_accepted() {
        let p = Platform::try_from(&PlatformDescriptor::new("darwin", "amd64")).unwrap();
        assert_eq!(p.to_string(), "darwin_amd64");
    }

    #[test]
    fn test_unsupported_os() {
        let err = Platform::try_from(&PlatformDescriptor::new("windows", "x86_64")).unwrap_err();
        assert_eq!(
            err,
            PlatformError::Unsupported {
                os: "windows".into(),
                arch: "x86_64".into()
            }
        );
    }

    #[test]
    fn test_unsupported_arch() {
        assert!(Platform::try_from(&PlatformDescriptor::new("linux", "riscv64")).is_err());
    }

    #[test]
    fn test_current_descriptor_matches_consts() {
        let host = PlatformDescriptor::current();
        assert_eq!(host.os, std::env::consts::OS);
        assert_eq!(host.arch, std::env::consts::ARCH);
    }
}
