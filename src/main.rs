use mediamtx_bootstrap::Config;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr, stdout carries the URLs.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    // Load configuration from CLI and/or config file
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            error!(?error, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match mediamtx_bootstrap::run(config).await {
        // Truncated to the low byte, like the OS does for the child
        Ok(code) => ExitCode::from(code as u8),
        Err(error) => {
            error!(%error, "Bootstrap failed");
            ExitCode::from(error.exit_code())
        }
    }
}
