//! MemeVault configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main MemeVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemeVaultConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Capture-window configuration
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Remote image fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Listing presentation configuration
    #[serde(default)]
    pub list: ListConfig,

    /// Channel configurations
    #[serde(default)]
    pub channels: ChannelsConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for durable state (index, aliases, blobs)
    pub data_dir: PathBuf,

    /// Name of the blob directory under `data_dir`
    pub blob_dir_name: String,
}

impl StorageConfig {
    /// Path of the blob directory
    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join(&self.blob_dir_name)
    }

    /// Path of the durable index document
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("index.json")
    }

    /// Path of the durable alias document
    pub fn alias_path(&self) -> PathBuf {
        self.data_dir.join("alias.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs_next::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".memevault"),
            blob_dir_name: "memes".to_string(),
        }
    }
}

/// Capture-window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds an armed capture window stays open
    pub ttl_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

/// Remote image fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Total timeout for a remote image download, in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Listing presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Maximum detailed entries shown by the `list` command
    pub max_entries: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { max_entries: 10 }
    }
}

/// Channel configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Console (stdin/stdout) channel
    pub console: Option<ConsoleConfig>,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            console: Some(ConsoleConfig::default()),
        }
    }
}

/// Console channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Conversation identifier reported for console messages
    pub conversation_id: String,

    /// Participant identifier reported for console messages
    pub participant_id: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            conversation_id: "console".to_string(),
            participant_id: "local".to_string(),
        }
    }
}
