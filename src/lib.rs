pub mod config;
pub mod error;
pub mod launcher;
pub mod locator;
pub mod platform;
pub mod provision;
pub mod server_config;

use std::io::Write;
use std::path::PathBuf;
use tracing::info;

//
// Re-export
//
pub use config::Config;
pub use error::BootstrapError;
pub use launcher::{Launcher, exit_code, shutdown_signal};
pub use locator::{BINARY_NAME, INSTALL_CANDIDATES, Locator};
pub use platform::{Arch, HostInfo, Os, Platform};
pub use provision::{DEFAULT_RELEASE_URL, PackageManager, Provisioner};
pub use server_config::{CONFIG_FILE_NAME, DEFAULT_HOST, ServerConfig};

/// One bootstrap run: locate or provision mediamtx, write its config, run it.
///
/// The locator, host and HTTP client default to the real environment and can
/// be swapped out before calling [`Bootstrap::run`].
pub struct Bootstrap {
    config: Config,
    locator: Locator,
    host: HostInfo,
    package_manager: Option<PackageManager>,
    client: reqwest::Client,
}

impl Bootstrap {
    pub fn new(config: Config) -> Self {
        let package_manager = (!config.skip_install).then(PackageManager::homebrew);
        Self {
            config,
            locator: Locator::from_env(),
            host: HostInfo::current(),
            package_manager,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    pub fn with_package_manager(mut self, package_manager: Option<PackageManager>) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Absolute working directory, resolved against the current directory
    pub fn work_dir(&self) -> std::io::Result<PathBuf> {
        std::path::absolute(&self.config.work_dir)
    }

    /// Runs until mediamtx exits or Ctrl+C/SIGTERM arrives
    pub async fn run(self) -> Result<i32, BootstrapError> {
        self.run_until(shutdown_signal()).await
    }

    /// Returns mediamtx's exit code
    pub async fn run_until<F>(self, shutdown: F) -> Result<i32, BootstrapError>
    where
        F: Future<Output = ()>,
    {
        let work_dir = self.work_dir()?;
        tokio::fs::create_dir_all(&work_dir).await?;

        let provisioner = Provisioner::new(self.locator, &work_dir)
            .with_package_manager(self.package_manager)
            .with_host(self.host)
            .with_release_url(&self.config.release_url)
            .with_client(self.client);
        let binary = provisioner.provision().await?;

        let server = self.config.server_config();
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        server.write_to(&config_path).await?;
        info!(path = %config_path.display(), "Wrote mediamtx config");

        {
            let mut stdout = std::io::stdout().lock();
            write_urls(&mut stdout, &server, &self.config.host)?;
            writeln!(stdout, "Starting MediaMTX ... Press Ctrl+C to stop.\n")?;
        }

        Launcher::new(binary, config_path)
            .with_shutdown_timeout(self.config.shutdown_timeout())
            .run_until(shutdown)
            .await
    }
}

/// Writes the publish/play URL banner
fn write_urls(out: &mut impl Write, server: &ServerConfig, host: &str) -> std::io::Result<()> {
    writeln!(out, "\nURLs (replace {DEFAULT_HOST} with your LAN IP):")?;
    writeln!(out, "  RTMP publish: {}", server.publish_url(host))?;
    writeln!(out, "  HLS play:     {}\n", server.play_url(host))
}

/// Runs the bootstrap against the real environment
pub async fn run(config: Config) -> Result<i32, BootstrapError> {
    Bootstrap::new(config).run().await
}
