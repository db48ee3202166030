//! Image source resolution.
//!
//! Turns an [`ImageSource`] into a [`LocalImage`] on disk. URL and base64
//! sources are materialized into a scoped temporary file that is removed when
//! the `LocalImage` is dropped.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use tempfile::TempPath;
use tracing::debug;
use url::Url;

use crate::config::ResolverConfig;
use crate::error::{OcrToolError, Result};
use crate::models::ImageSource;

/// An image file ready for recognition.
#[derive(Debug)]
pub struct LocalImage {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl LocalImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct ImageResolver {
    client: Client,
    config: ResolverConfig,
}

impl ImageResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OcrToolError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub async fn resolve(&self, source: &ImageSource) -> Result<LocalImage> {
        match source {
            ImageSource::Url(url) => {
                let bytes = self.fetch(url).await?;
                materialize(&bytes)
            }
            ImageSource::Base64(payload) => {
                let bytes = decode_base64_payload(payload)?;
                materialize(&bytes)
            }
            ImageSource::Path(raw) => {
                let path = resolve_local_path(raw)?;
                if !path.is_file() {
                    return Err(OcrToolError::Processing(format!(
                        "Image file not found: {}",
                        path.display()
                    )));
                }
                Ok(LocalImage { path, temp: None })
            }
        }
    }

    async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(raw_url)?;
        debug!(url = %url, "Downloading image");

        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let limit = self.config.max_download_bytes;
        if let Some(length) = response.content_length() {
            if length > limit {
                return Err(OcrToolError::Processing(format!(
                    "Remote image is {length} bytes, limit is {limit}"
                )));
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(OcrToolError::Processing(format!(
                    "Remote image exceeds download limit of {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

/// Decode a base64 image payload, tolerating a `data:` URL prefix and
/// embedded whitespace.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>> {
    let data = match payload.trim().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| OcrToolError::Validation("Malformed data URL".to_string()))?,
        None => payload,
    };

    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(OcrToolError::Validation("Empty base64 payload".to_string()));
    }

    Ok(STANDARD.decode(cleaned)?)
}

/// Expand a leading `~` and anchor relative paths at the working directory.
pub fn resolve_local_path(raw: &str) -> Result<PathBuf> {
    let expanded = if raw == "~" {
        home_dir()?
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home_dir()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| OcrToolError::Config("Cannot determine home directory".to_string()))
}

fn materialize(bytes: &[u8]) -> Result<LocalImage> {
    let extension = infer::get(bytes)
        .map(|kind| kind.extension())
        .unwrap_or("img");

    let mut file = tempfile::Builder::new()
        .prefix("ocrtool-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    let temp = file.into_temp_path();
    debug!(path = %temp.display(), size = bytes.len(), "Wrote temporary image");

    Ok(LocalImage {
        path: temp.to_path_buf(),
        temp: Some(temp),
    })
}
