use crate::provision::DEFAULT_RELEASE_URL;
use crate::server_config::{DEFAULT_HOST, ServerConfig};
use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure that can be loaded from CLI or a config file
///
/// Example configuration file content
/// # mediamtx bootstrap configuration
///
/// # Server parameters
/// port = 8080
/// rtmp = 1935
/// path = "live"
/// stream = "stream"
///
/// # Provisioning
/// work_dir = "mediamtx_bin"
/// skip_install = false
/// release_url = "https://github.com/bluenviron/mediamtx/releases/latest/download"
///
/// # Seconds to wait for mediamtx after Ctrl+C before killing it (0 = forever)
/// shutdown_timeout = 10
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(version, about = "Run RTMP+HLS server (MediaMTX)", long_about = None)]
#[serde(default)]
pub struct Config {
    /// HLS HTTP port
    #[arg(long, default_value_t = 8080, allow_negative_numbers = true)]
    #[serde(default = "default_port")]
    pub port: i64,

    /// RTMP port
    #[arg(long, default_value_t = 1935, allow_negative_numbers = true)]
    #[serde(default = "default_rtmp")]
    pub rtmp: i64,

    /// Application/path name
    #[arg(long, default_value = "live")]
    #[serde(default = "default_path")]
    pub path: String,

    /// Stream key/name
    #[arg(long, default_value = "stream")]
    #[serde(default = "default_stream")]
    pub stream: String,

    /// Working directory for the generated config and downloaded artifacts
    #[arg(short = 'w', long, default_value = "mediamtx_bin")]
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// Host shown in the printed publish/play URLs
    #[arg(long, default_value = DEFAULT_HOST)]
    #[serde(default = "default_host")]
    pub host: String,

    /// Do not try the package manager before downloading
    #[arg(long)]
    pub skip_install: bool,

    /// Base URL the release archive is downloaded from
    #[arg(long, default_value = DEFAULT_RELEASE_URL)]
    #[serde(default = "default_release_url")]
    pub release_url: String,

    /// Seconds to wait for mediamtx to stop before killing it (0 = no limit)
    #[arg(long, default_value_t = 0)]
    #[serde(default)]
    pub shutdown_timeout: u64,

    /// Configuration file path (CLI arguments take precedence)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            rtmp: default_rtmp(),
            path: default_path(),
            stream: default_stream(),
            work_dir: default_work_dir(),
            host: default_host(),
            skip_install: false,
            release_url: default_release_url(),
            shutdown_timeout: 0,
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args, optionally merging with a config file
    pub fn load() -> Result<Self> {
        Self::load_from(Config::parse())
    }

    fn load_from(mut config: Config) -> Result<Self> {
        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.port == default_port() {
            self.port = file_config.port;
        }
        if self.rtmp == default_rtmp() {
            self.rtmp = file_config.rtmp;
        }
        if self.path == default_path() {
            self.path = file_config.path;
        }
        if self.stream == default_stream() {
            self.stream = file_config.stream;
        }
        if self.work_dir == default_work_dir() {
            self.work_dir = file_config.work_dir;
        }
        if self.host == default_host() {
            self.host = file_config.host;
        }
        if !self.skip_install {
            self.skip_install = file_config.skip_install;
        }
        if self.release_url == default_release_url() {
            self.release_url = file_config.release_url;
        }
        if self.shutdown_timeout == 0 {
            self.shutdown_timeout = file_config.shutdown_timeout;
        }

        self
    }

    /// Validate the configuration.
    ///
    /// Server parameters are not checked here, mediamtx rejects bad values itself.
    pub fn validate(&self) -> Result<()> {
        if !self.release_url.starts_with("http://") && !self.release_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Release URL must start with http:// or https://"
            ));
        }
        if self.work_dir.is_empty() {
            return Err(anyhow::anyhow!("Working directory cannot be empty"));
        }

        Ok(())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.port, self.rtmp, &self.path, &self.stream)
    }

    pub fn shutdown_timeout(&self) -> Option<Duration> {
        (self.shutdown_timeout > 0).then(|| Duration::from_secs(self.shutdown_timeout))
    }
}

// Default value functions
fn default_port() -> i64 {
    8080
}

fn default_rtmp() -> i64 {
    1935
}

fn default_path() -> String {
    "live".to_string()
}

fn default_stream() -> String {
    "stream".to_string()
}

fn default_work_dir() -> String {
    "mediamtx_bin".to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_release_url() -> String {
    DEFAULT_RELEASE_URL.to_string()
}
