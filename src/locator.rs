use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const BINARY_NAME: &str = "mediamtx";

/// Homebrew prefixes on Apple Silicon and Intel
pub const INSTALL_CANDIDATES: [&str; 2] = ["/opt/homebrew/bin/mediamtx", "/usr/local/bin/mediamtx"];

/// Finds an already installed mediamtx binary.
///
/// The search path is tried first, then the fixed install locations. Nothing
/// found is an ordinary outcome and yields `None`.
#[derive(Debug, Clone)]
pub struct Locator {
    binary_name: String,
    search_path: Option<OsString>,
    candidates: Vec<PathBuf>,
}

impl Locator {
    pub fn new(
        binary_name: impl Into<String>,
        search_path: Option<OsString>,
        candidates: Vec<PathBuf>,
    ) -> Self {
        Self {
            binary_name: binary_name.into(),
            search_path,
            candidates,
        }
    }

    /// Locator over the process `PATH` and the Homebrew prefixes
    pub fn from_env() -> Self {
        Self::new(
            BINARY_NAME,
            std::env::var_os("PATH"),
            INSTALL_CANDIDATES.iter().map(PathBuf::from).collect(),
        )
    }

    pub fn find(&self) -> Option<PathBuf> {
        let found = self.find_on_search_path().or_else(|| {
            self.candidates
                .iter()
                .find(|candidate| is_regular_file(candidate))
                .cloned()
        });

        match &found {
            Some(path) => debug!(path = %path.display(), "Located installed mediamtx"),
            None => debug!(binary = %self.binary_name, "No installed mediamtx"),
        }
        found
    }

    fn find_on_search_path(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(&self.binary_name))
            .find(|path| is_executable(path))
    }
}

/// True for existing regular files, following symlinks
pub(crate) fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    is_regular_file(path)
}
