//! Console implementation of the core [`Reporter`].
//!
//! Progress goes to stderr so stdout carries only command results.

use crossterm::style::Stylize;
use relbin_core::Reporter;
use relbin_schema::{RepoName, Version};

/// Line-oriented progress output. `quiet` keeps failures only.
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn progress(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

impl Reporter for ConsoleReporter {
    fn resolving(&self, name: &RepoName, feed_url: &str) {
        tracing::debug!(%name, feed_url, "resolving latest release");
        self.progress(&format!(
            "  {} {} {}",
            "→".cyan(),
            name.as_str().bold(),
            "resolving latest release".dark_grey()
        ));
    }

    fn downloading(&self, name: &RepoName, version: &Version, url: &str) {
        tracing::debug!(%name, %version, url, "downloading");
        self.progress(&format!(
            "  {} {} {} {}",
            "↓".cyan(),
            name.as_str().bold(),
            version.to_string().cyan(),
            relbin_core::paths::filename_from_url(url).dark_grey()
        ));
    }

    fn extracting(&self, name: &RepoName, version: &Version, size: u64) {
        self.progress(&format!(
            "  {} {} {} {}",
            "⠿".cyan(),
            name.as_str().bold(),
            version.to_string().cyan(),
            format!("extracting {}", format_size(size)).dark_grey()
        ));
    }

    fn done(&self, name: &RepoName, version: &Version, detail: &str) {
        self.progress(&format!(
            "  {} {} {} {}",
            "✓".green(),
            name.as_str().bold(),
            version.to_string().cyan(),
            detail.dark_grey()
        ));
    }

    fn failed(&self, name: &RepoName, version: Option<&Version>, reason: &str) {
        // The full error is printed once by main.
        tracing::debug!(%name, reason, "install failed");
        let version = version.map(ToString::to_string).unwrap_or_default();
        eprintln!(
            "  {} {} {}",
            "✗".red(),
            name.as_str().bold(),
            version.red()
        );
    }
}

/// Human-readable byte count.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else if kb >= 1024.0 {
        format!("{mb:.1} MB")
    } else if kb >= 1.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
