//! relbin core: resolve, plan, fetch and install versioned release binaries.
//!
//! # Pipeline
//!
//! ```text
//! repo [+ version] -> io::release   (latest tag from the release feed)
//!                  -> plan          (archive URL for this platform)
//!                  -> io::download  (archive bytes, all or nothing)
//!                  -> io::extract   (staged extraction, rename into place)
//!                  -> <bin_dir>/<repo>-<version>/
//! ```
//!
//! [`Installer`] wires the steps together for one invocation.

pub mod install_dir;
pub mod installer;
pub mod io;
pub mod lock;
pub mod paths;
pub mod plan;
pub mod reporter;
pub mod settings;

pub use installer::{InstallError, Installed, Installer, Stage};
pub use io::extract::{InstallMode, InstallOutcome};
pub use reporter::{NullReporter, Reporter};
pub use settings::Settings;

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("relbin-core/", env!("CARGO_PKG_VERSION"));
