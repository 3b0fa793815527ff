//! Durable digest index
//!
//! Maps each content digest to its stored filename, persisted as a
//! pretty-printed JSON object (`index.json`). The blob directory is the
//! source of truth; the index is a derived view that can always be
//! regenerated by [`Index::rebuild`].

use super::digest::{ContentDigest, DIGEST_LEN};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Durable mapping from digest to stored filename
pub struct Index {
    path: PathBuf,
    entries: IndexMap<ContentDigest, String>,
}

impl Index {
    /// Load the index from its durable file.
    ///
    /// Any read or parse failure degrades to an empty index: the rebuild
    /// scan is the recovery path, never a fatal error. Keys are uppercased
    /// on load.
    pub async fn load(path: PathBuf) -> Self {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(data) => match serde_json::from_str::<IndexMap<String, String>>(&data) {
                Ok(raw) => raw
                    .into_iter()
                    .map(|(k, v)| (ContentDigest::from_stored(&k), v))
                    .collect(),
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        "index file is corrupt, starting empty: {}",
                        e
                    );
                    IndexMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    "index file is unreadable, starting empty: {}",
                    e
                );
                IndexMap::new()
            }
        };

        Self { path, entries }
    }

    /// Persist the full index as pretty-printed JSON
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| Error::PersistenceWrite {
                file: self.path.display().to_string(),
                source: e,
            })
    }

    /// Regenerate the index from a full scan of the blob directory.
    ///
    /// A file qualifies only when its filename stem is exactly 32
    /// characters: a shape filter, not a content re-verification. Entries
    /// are collected in filename order so repeated rebuilds of the same
    /// directory yield an identical mapping.
    pub async fn rebuild(&mut self, blob_dir: &Path) -> Result<()> {
        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(blob_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        self.entries.clear();
        for name in names {
            let digest = match Path::new(&name).file_stem().and_then(|s| s.to_str()) {
                Some(stem) if stem.chars().count() == DIGEST_LEN => {
                    ContentDigest::from_stored(stem)
                }
                _ => continue,
            };
            self.entries.insert(digest, name);
        }

        Ok(())
    }

    /// Stored filename for a digest
    pub fn get(&self, digest: &ContentDigest) -> Option<&str> {
        self.entries.get(digest).map(String::as_str)
    }

    /// Whether a digest has an entry
    pub fn contains(&self, digest: &ContentDigest) -> bool {
        self.entries.contains_key(digest)
    }

    /// Record a digest's stored filename (last write wins)
    pub fn insert(&mut self, digest: ContentDigest, filename: String) {
        self.entries.insert(digest, filename);
    }

    /// Remove a digest's entry, returning its filename if present
    pub fn remove(&mut self, digest: &ContentDigest) -> Option<String> {
        self.entries.shift_remove(digest)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All digests, sorted lexicographically
    pub fn digests(&self) -> Vec<ContentDigest> {
        let mut digests: Vec<ContentDigest> = self.entries.keys().cloned().collect();
        digests.sort();
        digests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn digest_of(bytes: &[u8]) -> ContentDigest {
        ContentDigest::compute(bytes)
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = Index::load(dir.path().join("index.json")).await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        tokio::fs::write(&path, "not json {{{").await.unwrap();

        let index = Index::load(path).await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let mut index = Index::load(path.clone()).await;
        let digest = digest_of(b"cat");
        index.insert(digest.clone(), format!("{}.png", digest));
        index.save().await.unwrap();

        let reloaded = Index::load(path).await;
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get(&digest),
            Some(format!("{}.png", digest).as_str())
        );
    }

    #[tokio::test]
    async fn test_load_uppercases_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        tokio::fs::write(
            &path,
            r#"{"900150983cd24fb0d6963f7d28e17f72": "900150983CD24FB0D6963F7D28E17F72.png"}"#,
        )
        .await
        .unwrap();

        let index = Index::load(path).await;
        let digest = ContentDigest::parse("900150983CD24FB0D6963F7D28E17F72").unwrap();
        assert!(index.contains(&digest));
    }

    #[tokio::test]
    async fn test_rebuild_filters_by_stem_length() {
        let dir = TempDir::new().unwrap();
        let blob_dir = dir.path().join("memes");
        tokio::fs::create_dir_all(&blob_dir).await.unwrap();

        let digest = digest_of(b"cat");
        tokio::fs::write(blob_dir.join(format!("{}.png", digest)), b"cat")
            .await
            .unwrap();
        // Wrong stem length: ignored
        tokio::fs::write(blob_dir.join("short.png"), b"x").await.unwrap();
        tokio::fs::write(blob_dir.join("readme.txt"), b"x").await.unwrap();

        let mut index = Index::load(dir.path().join("index.json")).await;
        index.rebuild(&blob_dir).await.unwrap();

        assert_eq!(index.len(), 1);
        assert!(index.contains(&digest));
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let blob_dir = dir.path().join("memes");
        tokio::fs::create_dir_all(&blob_dir).await.unwrap();

        for bytes in [b"a".as_slice(), b"b", b"c"] {
            let digest = digest_of(bytes);
            tokio::fs::write(blob_dir.join(format!("{}.png", digest)), bytes)
                .await
                .unwrap();
        }

        let mut index = Index::load(dir.path().join("index.json")).await;
        index.rebuild(&blob_dir).await.unwrap();
        let first: Vec<ContentDigest> = index.digests();

        index.rebuild(&blob_dir).await.unwrap();
        assert_eq!(index.digests(), first);
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_digests_sorted() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::load(dir.path().join("index.json")).await;

        let d1 = ContentDigest::parse(&"F".repeat(32)).unwrap();
        let d2 = ContentDigest::parse(&"0".repeat(32)).unwrap();
        index.insert(d1.clone(), "f.png".to_string());
        index.insert(d2.clone(), "0.png".to_string());

        assert_eq!(index.digests(), vec![d2, d1]);
    }
}
