//! Channel adapter trait and shared plumbing

use super::message::{InboundMessage, OutboundMessage};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;
use tokio::sync::mpsc;

/// Adapter lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Shared state every adapter carries
pub struct AdapterBase {
    name: String,
    status: RwLock<AdapterStatus>,
}

impl AdapterBase {
    /// Create adapter base state with the given channel name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: RwLock::new(AdapterStatus::Stopped),
        }
    }

    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status
    pub fn status(&self) -> AdapterStatus {
        *self.status.read().expect("adapter status lock poisoned")
    }

    /// Set status
    pub fn set_status(&self, status: AdapterStatus) {
        *self.status.write().expect("adapter status lock poisoned") = status;
    }

    /// Whether the adapter is running
    pub fn is_running(&self) -> bool {
        self.status() == AdapterStatus::Running
    }
}

/// Event emitted by a channel adapter
#[derive(Debug)]
pub enum ChannelEvent {
    /// Channel connected and ready
    Connected { channel: String },
    /// Channel disconnected
    Disconnected { channel: String, reason: String },
    /// A message arrived
    Message(InboundMessage),
    /// Channel-level error
    Error { channel: String, error: String },
}

/// Unified interface for messaging platforms.
///
/// Adapters translate platform traffic into [`ChannelEvent`]s on the
/// sender passed to [`ChannelAdapter::start`], and deliver
/// [`OutboundMessage`]s back to the platform.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Channel name
    fn name(&self) -> &str;

    /// Start the adapter, emitting events on `event_tx`
    async fn start(&self, event_tx: mpsc::Sender<ChannelEvent>) -> Result<()>;

    /// Stop the adapter
    async fn stop(&self) -> Result<()>;

    /// Deliver an outbound message, returning a platform message ID
    async fn send(&self, message: OutboundMessage) -> Result<String>;

    /// Whether the adapter is currently connected
    fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_base_status() {
        let base = AdapterBase::new("test");
        assert_eq!(base.name(), "test");
        assert_eq!(base.status(), AdapterStatus::Stopped);
        assert!(!base.is_running());

        base.set_status(AdapterStatus::Running);
        assert!(base.is_running());
    }
}
