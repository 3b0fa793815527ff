//! Registry facade
//!
//! [`Vault`] owns the index, alias table, and capture windows behind a
//! single mutex and orchestrates every registry operation. Durable state is
//! loaded once at open; every mutating operation persists synchronously
//! before returning.

use super::alias::AliasTable;
use super::blobs::BlobStore;
use super::digest::ContentDigest;
use super::index::Index;
use super::session::CaptureSessions;
use crate::config::{CaptureConfig, StorageConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Result of ingesting an image
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// Digest of the stored content
    pub digest: ContentDigest,
    /// Alias already bound to this digest, if any
    pub existing_alias: Option<String>,
}

/// Details for a resolved query
#[derive(Debug, Clone)]
pub struct ShowInfo {
    pub digest: ContentDigest,
    /// First alias bound to the digest, if any
    pub alias: Option<String>,
    /// Stored filename, if the digest has an index entry
    pub filename: Option<String>,
}

/// Snapshot of the registry contents for listing
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    /// All digests, sorted lexicographically
    pub digests: Vec<ContentDigest>,
    /// Alias bindings in insertion order
    pub aliases: Vec<(String, ContentDigest)>,
}

/// Result of a forced index rebuild
#[derive(Debug, Clone, Copy)]
pub struct ReloadSummary {
    /// Entries in the rebuilt index
    pub total: usize,
    /// Aliases dropped because their digest no longer exists
    pub aliases_pruned: usize,
}

/// All mutable registry state, guarded by one lock
struct VaultState {
    index: Index,
    aliases: AliasTable,
    sessions: CaptureSessions,
}

/// Content-addressed meme registry with alias overlay and capture windows
pub struct Vault {
    blobs: BlobStore,
    state: Mutex<VaultState>,
}

impl Vault {
    /// Open the vault: create directories, load the index (rebuilding from
    /// the blob directory when it loads empty) and the alias table.
    pub async fn open(storage: &StorageConfig, capture: &CaptureConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&storage.data_dir).await?;
        let blobs = BlobStore::open(storage.blob_dir()).await?;

        let mut index = Index::load(storage.index_path()).await;
        if index.is_empty() {
            index.rebuild(blobs.dir()).await?;
            index.save().await?;
        }
        let aliases = AliasTable::load(storage.alias_path()).await;

        tracing::info!(
            entries = index.len(),
            aliases = aliases.len(),
            dir = %blobs.dir().display(),
            "vault opened"
        );

        Ok(Self {
            blobs,
            state: Mutex::new(VaultState {
                index,
                aliases,
                sessions: CaptureSessions::new(capture.ttl_secs),
            }),
        })
    }

    /// The blob directory
    pub fn blob_dir(&self) -> &Path {
        self.blobs.dir()
    }

    /// Ingest image bytes: store the blob, record and persist the index
    /// entry, and report any alias already bound to the digest.
    ///
    /// Callers resolve bytes (including any network fetch) before calling;
    /// this method holds the registry lock for the whole mutation.
    pub async fn ingest(&self, bytes: &[u8], ext: &str) -> Result<AddOutcome> {
        let mut state = self.state.lock().await;
        let (digest, filename) = self.blobs.put(bytes, ext).await?;
        state.index.insert(digest.clone(), filename);
        state.index.save().await?;

        let existing_alias = state.aliases.reverse_lookup(&digest).map(String::from);
        tracing::info!(digest = %digest, "ingested image");

        Ok(AddOutcome {
            digest,
            existing_alias,
        })
    }

    /// Bind an alias to a digest. Fails with [`Error::NotFound`] when the
    /// digest has no index entry.
    pub async fn bind(&self, digest: &ContentDigest, alias: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.index.contains(digest) {
            return Err(Error::NotFound(digest.to_string()));
        }
        state.aliases.bind(alias, digest.clone());
        state.aliases.save().await?;

        tracing::info!(alias = %alias, digest = %digest, "bound alias");
        Ok(())
    }

    /// Resolve a query (alias or digest) and return its details
    pub async fn show(&self, query: &str) -> Result<ShowInfo> {
        let state = self.state.lock().await;
        let digest = state
            .aliases
            .resolve(query)
            .ok_or_else(|| Error::NotFound(query.trim().to_string()))?;

        Ok(ShowInfo {
            alias: state.aliases.reverse_lookup(&digest).map(String::from),
            filename: state.index.get(&digest).map(String::from),
            digest,
        })
    }

    /// Snapshot the registry contents
    pub async fn list(&self) -> ListSnapshot {
        let state = self.state.lock().await;
        ListSnapshot {
            digests: state.index.digests(),
            aliases: state.aliases.bindings(),
        }
    }

    /// Delete a stored image by alias or digest.
    ///
    /// The blob removal is best-effort; the index entry is the
    /// authoritative outcome. Every alias bound to the digest is removed.
    pub async fn delete(&self, query: &str) -> Result<ContentDigest> {
        let mut state = self.state.lock().await;
        let digest = state
            .aliases
            .resolve(query)
            .ok_or_else(|| Error::NotFound(query.trim().to_string()))?;

        let filename = match state.index.get(&digest) {
            Some(name) => name.to_string(),
            None => return Err(Error::NotFound(query.trim().to_string())),
        };

        self.blobs.delete(&filename).await;
        state.index.remove(&digest);
        state.index.save().await?;

        let removed = state.aliases.remove_for(&digest);
        if !removed.is_empty() {
            state.aliases.save().await?;
        }

        tracing::info!(digest = %digest, aliases_removed = removed.len(), "deleted image");
        Ok(digest)
    }

    /// Force a rebuild of the index from the blob directory, then drop
    /// aliases whose digest no longer exists.
    pub async fn reload(&self) -> Result<ReloadSummary> {
        let mut state = self.state.lock().await;
        state.index.rebuild(self.blobs.dir()).await?;
        state.index.save().await?;

        let VaultState { index, aliases, .. } = &mut *state;
        let aliases_pruned = aliases.prune(|d| index.contains(d));
        if aliases_pruned > 0 {
            aliases.save().await?;
        }

        let summary = ReloadSummary {
            total: state.index.len(),
            aliases_pruned,
        };
        tracing::info!(
            entries = summary.total,
            pruned = summary.aliases_pruned,
            "index rebuilt"
        );
        Ok(summary)
    }

    /// Match an inbound image identifier against the index.
    ///
    /// The identifier's stem is uppercased and looked up directly; aliases
    /// are never consulted on the repost path. Returns the stored path only
    /// when the blob file actually exists.
    pub async fn match_repost(&self, identifier: &str) -> Option<PathBuf> {
        let stem = Path::new(identifier.trim()).file_stem()?.to_str()?;
        let key = ContentDigest::from_stored(stem);

        let state = self.state.lock().await;
        let filename = state.index.get(&key)?;
        if self.blobs.contains(filename).await {
            Some(self.blobs.path_of(filename))
        } else {
            None
        }
    }

    /// Arm the capture window for a (conversation, participant) pair
    pub async fn arm_capture(&self, conversation: &str, participant: &str, now_ms: i64) {
        let mut state = self.state.lock().await;
        state.sessions.arm(conversation, participant, now_ms);
        tracing::debug!(
            conversation = %conversation,
            participant = %participant,
            "capture window armed"
        );
    }

    /// Consume the pair's capture window if armed and unexpired
    pub async fn take_capture(&self, conversation: &str, participant: &str, now_ms: i64) -> bool {
        let mut state = self.state.lock().await;
        state.sessions.take_if_armed(conversation, participant, now_ms)
    }
}
