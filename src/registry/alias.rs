//! Durable alias table
//!
//! Human-assigned names for digests, persisted as a pretty-printed JSON
//! object (`alias.json`). Many aliases may point at one digest; an alias
//! string maps to at most one digest and rebinding overwrites. Insertion
//! order is preserved (and survives reloads, since JSON object order is
//! kept), which keeps reverse lookup deterministic.

use super::digest::ContentDigest;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Durable mapping from alias to digest
pub struct AliasTable {
    path: PathBuf,
    entries: IndexMap<String, ContentDigest>,
}

impl AliasTable {
    /// Load the alias table from its durable file.
    ///
    /// Read or parse failures degrade to an empty table. Alias keys are
    /// trimmed; digest values are uppercased.
    pub async fn load(path: PathBuf) -> Self {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(data) => match serde_json::from_str::<IndexMap<String, String>>(&data) {
                Ok(raw) => raw
                    .into_iter()
                    .map(|(a, d)| (a.trim().to_string(), ContentDigest::from_stored(&d)))
                    .collect(),
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        "alias file is corrupt, starting empty: {}",
                        e
                    );
                    IndexMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    "alias file is unreadable, starting empty: {}",
                    e
                );
                IndexMap::new()
            }
        };

        Self { path, entries }
    }

    /// Persist the full table as pretty-printed JSON
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| Error::PersistenceWrite {
                file: self.path.display().to_string(),
                source: e,
            })
    }

    /// Resolve a query to a digest.
    ///
    /// A digest-shaped query (32 hex characters) is self-resolving and
    /// returned uppercased without consulting the table. Anything else is a
    /// trimmed, case-sensitive alias lookup.
    pub fn resolve(&self, query: &str) -> Option<ContentDigest> {
        if let Some(digest) = ContentDigest::parse(query) {
            return Some(digest);
        }
        self.entries.get(query.trim()).cloned()
    }

    /// First alias bound to a digest, in insertion order
    pub fn reverse_lookup(&self, digest: &ContentDigest) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, d)| *d == digest)
            .map(|(a, _)| a.as_str())
    }

    /// Bind an alias to a digest, overwriting any existing binding
    pub fn bind(&mut self, alias: &str, digest: ContentDigest) {
        self.entries.insert(alias.trim().to_string(), digest);
    }

    /// Remove every alias bound to a digest, returning the removed names
    pub fn remove_for(&mut self, digest: &ContentDigest) -> Vec<String> {
        let removed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, d)| *d == digest)
            .map(|(a, _)| a.clone())
            .collect();
        for alias in &removed {
            self.entries.shift_remove(alias);
        }
        removed
    }

    /// Drop every alias whose digest fails the predicate, returning the
    /// number removed
    pub fn prune<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ContentDigest) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|_, d| keep(d));
        before - self.entries.len()
    }

    /// Alias bindings in insertion order
    pub fn bindings(&self) -> Vec<(String, ContentDigest)> {
        self.entries
            .iter()
            .map(|(a, d)| (a.clone(), d.clone()))
            .collect()
    }

    /// Whether any alias maps to the given digest
    pub fn has_alias_for(&self, digest: &ContentDigest) -> bool {
        self.entries.values().any(|d| d == digest)
    }

    /// Number of aliases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no aliases
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn make_table() -> (AliasTable, TempDir) {
        let dir = TempDir::new().unwrap();
        let table = AliasTable::load(dir.path().join("alias.json")).await;
        (table, dir)
    }

    fn digest(fill: char) -> ContentDigest {
        ContentDigest::parse(&fill.to_string().repeat(32)).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_digest_is_self_resolving() {
        let (table, _dir) = make_table().await;
        // No alias bound, yet a digest-shaped query resolves to itself
        let resolved = table.resolve("900150983cd24fb0d6963f7d28e17f72").unwrap();
        assert_eq!(resolved.as_str(), "900150983CD24FB0D6963F7D28E17F72");
    }

    #[tokio::test]
    async fn test_resolve_alias() {
        let (mut table, _dir) = make_table().await;
        table.bind("grumpy", digest('A'));

        assert_eq!(table.resolve("grumpy"), Some(digest('A')));
        assert_eq!(table.resolve("  grumpy  "), Some(digest('A')));
        // Case-sensitive alias lookup
        assert_eq!(table.resolve("GRUMPY"), None);
        assert_eq!(table.resolve("unknown"), None);
    }

    #[tokio::test]
    async fn test_bind_overwrites() {
        let (mut table, _dir) = make_table().await;
        table.bind("cat", digest('A'));
        table.bind("cat", digest('B'));

        assert_eq!(table.resolve("cat"), Some(digest('B')));
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_reverse_lookup_first_in_order() {
        let (mut table, _dir) = make_table().await;
        table.bind("first", digest('A'));
        table.bind("second", digest('A'));
        table.bind("other", digest('B'));

        assert_eq!(table.reverse_lookup(&digest('A')), Some("first"));
        assert_eq!(table.reverse_lookup(&digest('B')), Some("other"));
        assert_eq!(table.reverse_lookup(&digest('C')), None);
    }

    #[tokio::test]
    async fn test_remove_for_removes_all() {
        let (mut table, _dir) = make_table().await;
        table.bind("one", digest('A'));
        table.bind("two", digest('A'));
        table.bind("keep", digest('B'));

        let removed = table.remove_for(&digest('A'));
        assert_eq!(removed, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("keep"), Some(digest('B')));
    }

    #[tokio::test]
    async fn test_prune() {
        let (mut table, _dir) = make_table().await;
        table.bind("live", digest('A'));
        table.bind("stale", digest('B'));

        let pruned = table.prune(|d| *d == digest('A'));
        assert_eq!(pruned, 1);
        assert_eq!(table.resolve("live"), Some(digest('A')));
        assert_eq!(table.resolve("stale"), None);
    }

    #[tokio::test]
    async fn test_save_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alias.json");

        let mut table = AliasTable::load(path.clone()).await;
        table.bind("zebra", digest('A'));
        table.bind("apple", digest('A'));
        table.save().await.unwrap();

        let reloaded = AliasTable::load(path).await;
        // Insertion order survives the round trip, so reverse lookup stays
        // deterministic
        assert_eq!(reloaded.reverse_lookup(&digest('A')), Some("zebra"));
    }

    #[tokio::test]
    async fn test_load_corrupt_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alias.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let table = AliasTable::load(path).await;
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_load_normalizes_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alias.json");
        tokio::fs::write(&path, r#"{" cat ": "abcdef0123456789abcdef0123456789"}"#)
            .await
            .unwrap();

        let table = AliasTable::load(path).await;
        let resolved = table.resolve("cat").unwrap();
        assert_eq!(resolved.as_str(), "ABCDEF0123456789ABCDEF0123456789");
    }
}
