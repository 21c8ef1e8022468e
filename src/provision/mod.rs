pub mod archive;
pub mod download;

use crate::error::BootstrapError;
use crate::locator::{BINARY_NAME, Locator, is_regular_file};
use crate::platform::{HostInfo, Platform};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{info, warn};

pub const DEFAULT_RELEASE_URL: &str =
    "https://github.com/bluenviron/mediamtx/releases/latest/download";

/// External install command, e.g. `brew install mediamtx`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    program: String,
    args: Vec<String>,
}

impl PackageManager {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn homebrew() -> Self {
        Self::new("brew", ["install", BINARY_NAME])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn install(&self) -> std::io::Result<ExitStatus> {
        Command::new(&self.program).args(&self.args).status().await
    }
}

/// Gets a runnable mediamtx: installed, package manager, then direct download
#[derive(Debug, Clone)]
pub struct Provisioner {
    locator: Locator,
    package_manager: Option<PackageManager>,
    host: HostInfo,
    release_url: String,
    work_dir: PathBuf,
    client: reqwest::Client,
}

impl Provisioner {
    pub fn new(locator: Locator, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            package_manager: Some(PackageManager::homebrew()),
            host: HostInfo::current(),
            release_url: DEFAULT_RELEASE_URL.to_string(),
            work_dir: work_dir.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_package_manager(mut self, package_manager: Option<PackageManager>) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    pub fn with_release_url(mut self, release_url: impl Into<String>) -> Self {
        self.release_url = release_url.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the path of a binary that is ready to run
    pub async fn provision(&self) -> Result<PathBuf, BootstrapError> {
        if let Some(path) = self.locator.find() {
            info!(path = %path.display(), "Using installed mediamtx");
            return Ok(path);
        }

        if let Some(package_manager) = &self.package_manager
            && let Some(path) = self.install_with(package_manager).await
        {
            info!(path = %path.display(), "Using mediamtx installed by package manager");
            return Ok(path);
        }

        self.download_release().await
    }

    async fn install_with(&self, package_manager: &PackageManager) -> Option<PathBuf> {
        info!(
            program = package_manager.program(),
            "mediamtx not found; attempting package manager install"
        );

        match package_manager.install().await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(%status, "Package manager install failed. Falling back to direct download");
                return None;
            }
            Err(error) => {
                warn!(%error, "Package manager install failed. Falling back to direct download");
                return None;
            }
        }

        let found = self.locator.find();
        if found.is_none() {
            warn!("Package manager finished but mediamtx is still missing. Falling back to direct download");
        }
        found
    }

    /// The release URL for this host; fails before any network access on
    /// an unsupported platform
    pub fn release_asset_url(&self) -> Result<(String, String), BootstrapError> {
        let platform = Platform::resolve(&self.host)?;
        let asset = platform.asset_name();
        let url = format!("{}/{asset}", self.release_url.trim_end_matches('/'));
        Ok((asset, url))
    }

    async fn download_release(&self) -> Result<PathBuf, BootstrapError> {
        let (asset, url) = self.release_asset_url()?;

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let archive_path = self.work_dir.join(&asset);
        download::fetch(&self.client, &url, &archive_path).await?;
        archive::extract_tar_gz(&archive_path, &self.work_dir).await?;

        let binary = self.work_dir.join(BINARY_NAME);
        if !is_regular_file(&binary) {
            return Err(BootstrapError::MissingBinary(binary));
        }
        make_executable(&binary).await?;

        info!(path = %binary.display(), "mediamtx ready");
        Ok(binary)
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
