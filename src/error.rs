use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the bootstrap before or while mediamtx runs
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Unsupported platform {os}/{arch}: this helper targets macOS (darwin)")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Direct download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Failed to extract {}: {source}", .archive.display())]
    Extract {
        archive: PathBuf,
        source: std::io::Error,
    },

    #[error("mediamtx binary not found after extraction at {}", .0.display())]
    MissingBinary(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to run {}: {source}", .binary.display())]
    ChildProcess {
        binary: PathBuf,
        source: std::io::Error,
    },
}

impl BootstrapError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::UnsupportedPlatform { .. } => 2,
            BootstrapError::Download(_)
            | BootstrapError::Extract { .. }
            | BootstrapError::MissingBinary(_)
            | BootstrapError::Io(_)
            | BootstrapError::ChildProcess { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unsupported = BootstrapError::UnsupportedPlatform {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        };
        assert_eq!(unsupported.exit_code(), 2);

        let missing = BootstrapError::MissingBinary(PathBuf::from("mediamtx_bin/mediamtx"));
        assert_eq!(missing.exit_code(), 1);

        let child = BootstrapError::ChildProcess {
            binary: PathBuf::from("/usr/local/bin/mediamtx"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(child.exit_code(), 1);
    }

    #[test]
    fn test_unsupported_platform_message() {
        let error = BootstrapError::UnsupportedPlatform {
            os: "windows".to_string(),
            arch: "x86_64".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported platform windows/x86_64: this helper targets macOS (darwin)"
        );
    }
}
