use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::error::{BotError, Result};

/// Streams `url` into `dest`, returning the number of bytes written.
pub async fn download_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let mut response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(BotError::Download(response.status()));
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(dest).await?;
    match write_body(&mut response, &mut file).await {
        Ok(written) => {
            info!("Downloaded {} bytes to {}", written, dest.display());
            Ok(written)
        }
        Err(e) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                warn!("Could not remove partial download {}: {}", dest.display(), remove_err);
            }
            Err(e)
        }
    }
}

async fn write_body<W>(response: &mut reqwest::Response, out: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}

/// Where a `.txt` attachment is saved, and the name reported to the stats
/// service (file name without the extension). Anything else is rejected.
pub fn text_attachment_target(upload_dir: &Path, filename: &str) -> Option<(PathBuf, String)> {
    let name = Path::new(filename).file_name()?.to_str()?;
    let stem = name.strip_suffix(".txt")?;
    if stem.is_empty() {
        return None;
    }
    Some((upload_dir.join(name), stem.to_string()))
}
