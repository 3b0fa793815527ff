//! Image byte resolution
//!
//! Turns an [`ImageSegment`] into raw bytes plus a file extension, reading
//! local files directly and downloading remote URLs with a bounded
//! timeout. Always called before the registry lock is taken, so a slow
//! download never blocks other handlers.

use crate::channels::{ImageSegment, ImageSource};
use crate::error::{Error, Result};
use crate::registry::extension_of;
use std::path::Path;
use std::time::Duration;

/// Resolves image segments to bytes
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    /// Create a fetcher whose remote downloads time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Resolve a segment to `(bytes, extension)`.
    ///
    /// Every failure is an [`Error::Ingest`]: the operation aborts and
    /// registry state is unchanged.
    pub async fn resolve(&self, segment: &ImageSegment) -> Result<(Vec<u8>, String)> {
        match &segment.source {
            ImageSource::LocalPath(path) => self.read_local(path).await,
            ImageSource::RemoteUrl(url) => {
                let bytes = self.download(url).await?;
                let ext = segment
                    .identifier
                    .as_deref()
                    .and_then(extension_of)
                    .unwrap_or_default();
                Ok((bytes, ext))
            }
            ImageSource::Unknown => Err(Error::Ingest(
                "image segment has no usable path or URL".to_string(),
            )),
        }
    }

    async fn read_local(&self, path: &Path) -> Result<(Vec<u8>, String)> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Ingest(format!("cannot read {}: {}", path.display(), e)))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        Ok((bytes, ext))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Ingest(format!("download failed: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Ingest(format!("download failed: HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Ingest(format!("download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ImageSegment;
    use tempfile::TempDir;

    fn make_fetcher() -> ImageFetcher {
        ImageFetcher::new(Duration::from_secs(10)).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_local_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cat.JPG");
        tokio::fs::write(&path, b"jpeg bytes").await.unwrap();

        let fetcher = make_fetcher();
        let (bytes, ext) = fetcher.resolve(&ImageSegment::local(&path)).await.unwrap();
        assert_eq!(bytes, b"jpeg bytes");
        assert_eq!(ext, ".JPG");
    }

    #[tokio::test]
    async fn test_resolve_missing_local_path_fails() {
        let fetcher = make_fetcher();
        let result = fetcher
            .resolve(&ImageSegment::local("/nonexistent/nope.png"))
            .await;
        assert!(matches!(result, Err(Error::Ingest(_))));
    }

    #[tokio::test]
    async fn test_resolve_unknown_source_fails() {
        let fetcher = make_fetcher();
        let segment = ImageSegment {
            source: ImageSource::Unknown,
            identifier: Some("mystery.png".to_string()),
        };
        assert!(matches!(
            fetcher.resolve(&segment).await,
            Err(Error::Ingest(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_extension_from_identifier() {
        // The extension for remote segments comes from the identifier, so
        // exercise just that derivation here.
        let segment = ImageSegment::remote("https://cdn.example/img", Some("funny.gif".into()));
        let ext = segment
            .identifier
            .as_deref()
            .and_then(crate::registry::extension_of)
            .unwrap();
        assert_eq!(ext, ".gif");
    }
}
