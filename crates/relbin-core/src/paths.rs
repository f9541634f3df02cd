//! Well-known locations under the relbin home directory.

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the home directory.
pub const HOME_ENV: &str = "RELBIN_HOME";

/// Returns the relbin home directory, or None if the user's home cannot be resolved.
///
/// `RELBIN_HOME` wins when set; otherwise `~/.relbin`.
pub fn try_relbin_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        if !val.is_empty() {
            return Some(PathBuf::from(val));
        }
    }
    home_dir().map(|h| h.join(".relbin"))
}

/// Settings file: `<home>/config.toml`
pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

/// Default binaries root: `<home>/bin`
pub fn default_bin_dir(home: &Path) -> PathBuf {
    home.join("bin")
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_home() {
        let home = Path::new("/opt/relbin");
        assert_eq!(config_path(home), Path::new("/opt/relbin/config.toml"));
        assert_eq!(default_bin_dir(home), Path::new("/opt/relbin/bin"));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/a/b/tool_1.0.0_linux_amd64.tar.gz"),
            "tool_1.0.0_linux_amd64.tar.gz"
        );
        assert_eq!(filename_from_url(""), "");
    }
}
