//! Content-addressed blob store
//!
//! One flat directory of image blobs named `<DIGEST><ext>`. Because the
//! filename is derived from the content hash, writing is idempotent: a blob
//! that already exists on disk is never rewritten.

use super::digest::ContentDigest;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Fallback extension when an image source carries none
const DEFAULT_EXT: &str = ".png";

/// Flat-directory blob store addressed by content digest
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Open the blob store, creating its directory if needed
    pub async fn open(dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// The blob directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a stored filename
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Whether a stored filename currently exists on disk
    pub async fn contains(&self, filename: &str) -> bool {
        tokio::fs::try_exists(self.path_of(filename))
            .await
            .unwrap_or(false)
    }

    /// Store a blob, returning its digest and stored filename.
    ///
    /// The write is skipped when a file with the derived name already
    /// exists; the digest is returned either way.
    pub async fn put(&self, bytes: &[u8], ext: &str) -> Result<(ContentDigest, String)> {
        let digest = ContentDigest::compute(bytes);
        let filename = format!("{}{}", digest, normalize_extension(ext));
        let path = self.path_of(&filename);

        if !self.contains(&filename).await {
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| Error::PersistenceWrite {
                    file: path.display().to_string(),
                    source: e,
                })?;
            tracing::debug!(digest = %digest, file = %filename, "stored new blob");
        }

        Ok((digest, filename))
    }

    /// Best-effort blob removal. Absence is success; OS-level failures are
    /// logged and swallowed so index cleanup can proceed regardless.
    pub async fn delete(&self, filename: &str) {
        let path = self.path_of(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(file = %filename, "removed blob"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %filename, "failed to remove blob: {}", e),
        }
    }
}

/// Normalize a file extension: lowercased, leading dot enforced, `.png`
/// when empty or missing.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.is_empty() || ext == "." {
        DEFAULT_EXT.to_string()
    } else if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Extension (with leading dot) of an identifier-like string, if any
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
}
