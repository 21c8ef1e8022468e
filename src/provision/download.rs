use crate::error::BootstrapError;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Streams `url` into `dest`.
///
/// Any non-success HTTP status is an error.
pub(crate) async fn fetch(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), BootstrapError> {
    info!(%url, "Downloading");
    let response = client.get(url).send().await?.error_for_status()?;
    debug!(status = %response.status(), content_length = ?response.content_length(), "Download started");

    let mut file = tokio::fs::File::create(dest).await?;
    let mut body = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!(path = %dest.display(), bytes = written, "Saved");
    Ok(())
}
