//! Download the model artifact from remote storage when absent locally.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::error::Result;

/// Force direct download on Dropbox share links.
pub fn normalize_dropbox_url(url: &str) -> String {
    if !url.contains("dropbox.com") {
        return url.to_string();
    }
    if url.contains("dl=0") {
        url.replace("dl=0", "dl=1")
    } else if !url.contains("dl=") {
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}dl=1")
    } else {
        url.to_string()
    }
}

/// Ensure the artifact file exists, downloading it when a URL is configured.
///
/// Returns `Ok(true)` when the file is present afterwards, `Ok(false)` when
/// there is neither a local file nor a configured URL.
pub async fn ensure_model_available(config: &ModelConfig) -> Result<bool> {
    let path = Path::new(&config.path);
    if path.exists() {
        info!("Model artifact already present at {}", path.display());
        return Ok(true);
    }

    let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        warn!("No model URL configured and no local artifact; skipping download");
        return Ok(false);
    };

    let url = normalize_dropbox_url(url);
    info!("Downloading model artifact from {url}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .build()?;

    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if let Err(e) = tokio::fs::write(path, &bytes).await {
        // Never leave a truncated artifact behind.
        let _ = tokio::fs::remove_file(path).await;
        return Err(e.into());
    }

    info!(
        "Model artifact downloaded to {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_dropbox_share_links() {
        assert_eq!(
            normalize_dropbox_url("https://www.dropbox.com/s/abc/model.json?dl=0"),
            "https://www.dropbox.com/s/abc/model.json?dl=1"
        );
        assert_eq!(
            normalize_dropbox_url("https://www.dropbox.com/s/abc/model.json"),
            "https://www.dropbox.com/s/abc/model.json?dl=1"
        );
        assert_eq!(
            normalize_dropbox_url("https://www.dropbox.com/s/abc/model.json?rlkey=x"),
            "https://www.dropbox.com/s/abc/model.json?rlkey=x&dl=1"
        );
    }

    #[test]
    fn leaves_other_urls_untouched() {
        let url = "https://example.com/model.json?dl=0";
        assert_eq!(normalize_dropbox_url(url), url);
    }

    #[tokio::test]
    async fn reports_missing_url_and_file() {
        let config = ModelConfig {
            path: "does/not/exist.json".to_string(),
            url: None,
            download_timeout_secs: 5,
        };
        assert!(!ensure_model_available(&config).await.unwrap());
    }
}
