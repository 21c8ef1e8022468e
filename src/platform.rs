use crate::error::BootstrapError;
use std::fmt;

/// Raw operating system and CPU identifiers of a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The host this process was built for
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Darwin => f.write_str("darwin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    Amd64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::Arm64 => f.write_str("arm64"),
            Arch::Amd64 => f.write_str("amd64"),
        }
    }
}

/// A platform mediamtx publishes a release archive for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Maps host identifiers onto a release platform.
    ///
    /// Only macOS is supported. Any CPU that is not arm64/aarch64 is treated
    /// as amd64.
    pub fn resolve(host: &HostInfo) -> Result<Self, BootstrapError> {
        let os = host.os.to_lowercase();
        if os != "macos" && os != "darwin" {
            return Err(BootstrapError::UnsupportedPlatform {
                os: host.os.clone(),
                arch: host.arch.clone(),
            });
        }

        let machine = host.arch.to_lowercase();
        let arch = if machine.contains("arm64") || machine.contains("aarch64") {
            Arch::Arm64
        } else {
            Arch::Amd64
        };

        Ok(Self {
            os: Os::Darwin,
            arch,
        })
    }

    /// File name of the release archive, e.g. `mediamtx_darwin_arm64.tar.gz`
    pub fn asset_name(&self) -> String {
        format!("mediamtx_{}_{}.tar.gz", self.os, self.arch)
    }
}
