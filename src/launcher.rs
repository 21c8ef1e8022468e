use crate::error::BootstrapError;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

/// Runs mediamtx in the foreground and mirrors its exit status
#[derive(Debug, Clone)]
pub struct Launcher {
    binary: PathBuf,
    config: PathBuf,
    shutdown_timeout: Option<Duration>,
}

impl Launcher {
    pub fn new(binary: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config: config.into(),
            shutdown_timeout: None,
        }
    }

    /// Force-kill the child if it is still running this long after the
    /// termination request. `None` waits forever.
    pub fn with_shutdown_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Runs until the child exits or `shutdown` completes.
    ///
    /// On shutdown the child gets a termination request and is waited for;
    /// the returned code is always the child's.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<i32, BootstrapError>
    where
        F: Future<Output = ()>,
    {
        let mut child = Command::new(&self.binary)
            .arg(&self.config)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.child_error(source))?;
        info!(pid = ?child.id(), binary = %self.binary.display(), "mediamtx started");

        let status = tokio::select! {
            status = child.wait() => status.map_err(|source| self.child_error(source))?,
            () = shutdown => {
                info!("Stopping mediamtx");
                self.terminate(&mut child).await?
            }
        };

        let code = exit_code(status);
        info!(code, %status, "mediamtx exited");
        Ok(code)
    }

    async fn terminate(&self, child: &mut Child) -> Result<ExitStatus, BootstrapError> {
        request_termination(child).map_err(|source| self.child_error(source))?;

        let status = match self.shutdown_timeout {
            None => child.wait().await,
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!(?timeout, "mediamtx did not stop in time, killing it");
                    child
                        .kill()
                        .await
                        .map_err(|source| self.child_error(source))?;
                    child.wait().await
                }
            },
        };
        status.map_err(|source| self.child_error(source))
    }

    fn child_error(&self, source: std::io::Error) -> BootstrapError {
        BootstrapError::ChildProcess {
            binary: self.binary.clone(),
            source,
        }
    }
}

/// Exit code to report for a finished child. A signal death maps to
/// `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    // Already reaped
    let Some(pid) = child.id() else {
        return Ok(());
    };

    // SAFETY: kill(2) takes plain integers; `pid` is our own child, not yet reaped.
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }

    let error = std::io::Error::last_os_error();
    match error.raw_os_error() {
        Some(libc::ESRCH) => Ok(()),
        _ => Err(error),
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
