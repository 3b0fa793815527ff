//! Content-addressed meme registry
//!
//! The registry keeps image blobs in one flat directory named by content
//! digest, with two durable JSON overlays (digest index, alias table) and
//! an in-memory tracker of armed capture windows. [`Vault`] is the facade
//! that owns all of it.

mod alias;
mod blobs;
mod digest;
mod index;
mod session;
mod vault;

pub use alias::AliasTable;
pub use blobs::{extension_of, normalize_extension, BlobStore};
pub use digest::{ContentDigest, DIGEST_LEN};
pub use index::Index;
pub use session::CaptureSessions;
pub use vault::{AddOutcome, ListSnapshot, ReloadSummary, ShowInfo, Vault};
