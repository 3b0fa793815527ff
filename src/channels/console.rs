//! Console channel adapter
//!
//! Reads stdin lines as chat messages from a single fixed (conversation,
//! participant) pair and prints replies to stdout. A line of the form
//! `@<path>` is treated as an image message whose segment points at that
//! local file; everything else is plain text. Useful for local testing and
//! as the reference transport.

use super::adapter::{AdapterBase, AdapterStatus, ChannelAdapter, ChannelEvent};
use super::message::{ImageSegment, InboundMessage, OutboundMessage, OutboundPayload};
use crate::config::ConsoleConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Console (stdin/stdout) channel adapter
pub struct ConsoleAdapter {
    config: ConsoleConfig,
    base: AdapterBase,
    reader: RwLock<Option<JoinHandle<()>>>,
}

impl ConsoleAdapter {
    /// Create a new console adapter
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            base: AdapterBase::new("console"),
            reader: RwLock::new(None),
        }
    }
}

/// Turn one input line into an inbound message, or `None` for blank lines
fn parse_line(config: &ConsoleConfig, line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let message = InboundMessage::new(
        "console",
        &config.conversation_id,
        &config.participant_id,
        "",
    );

    if let Some(path) = line.strip_prefix('@') {
        Some(message.with_image(ImageSegment::local(path.trim())))
    } else {
        Some(InboundMessage {
            content: line.to_string(),
            ..message
        })
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleAdapter {
    fn name(&self) -> &str {
        self.base.name()
    }

    async fn start(&self, event_tx: mpsc::Sender<ChannelEvent>) -> Result<()> {
        self.base.set_status(AdapterStatus::Starting);

        let config = self.config.clone();
        let tx = event_tx.clone();
        let handle = tokio::spawn(async move {
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(message) = parse_line(&config, &line) {
                            if tx.send(ChannelEvent::Message(message)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(None) => {
                        let _ = tx
                            .send(ChannelEvent::Disconnected {
                                channel: "console".to_string(),
                                reason: "stdin closed".to_string(),
                            })
                            .await;
                        break;
                    }
                    Err(e) => {
                        let _ = tx
                            .send(ChannelEvent::Error {
                                channel: "console".to_string(),
                                error: e.to_string(),
                            })
                            .await;
                        break;
                    }
                }
            }
        });
        *self.reader.write().await = Some(handle);

        let _ = event_tx
            .send(ChannelEvent::Connected {
                channel: "console".to_string(),
            })
            .await;

        self.base.set_status(AdapterStatus::Running);
        tracing::info!("console adapter started");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.base.set_status(AdapterStatus::Stopping);
        if let Some(handle) = self.reader.write().await.take() {
            handle.abort();
        }
        self.base.set_status(AdapterStatus::Stopped);
        tracing::info!("console adapter stopped");
        Ok(())
    }

    async fn send(&self, message: OutboundMessage) -> Result<String> {
        if !self.base.is_running() {
            return Err(Error::Channel("console adapter not running".to_string()));
        }

        match message.payload {
            OutboundPayload::Text(text) => println!("{}", text),
            OutboundPayload::Image(path) => println!("[image] {}", path.display()),
        }

        Ok(format!("console-msg-{}", uuid::Uuid::new_v4()))
    }

    fn is_connected(&self) -> bool {
        self.base.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::message::ImageSource;
    use std::path::PathBuf;

    #[test]
    fn test_parse_text_line() {
        let config = ConsoleConfig::default();
        let msg = parse_line(&config, "meme list").unwrap();
        assert_eq!(msg.content, "meme list");
        assert!(msg.image.is_none());
        assert_eq!(msg.conversation_id, "console");
        assert_eq!(msg.sender_id, "local");
    }

    #[test]
    fn test_parse_image_line() {
        let config = ConsoleConfig::default();
        let msg = parse_line(&config, "@/tmp/cat.png").unwrap();
        let segment = msg.image.unwrap();
        assert_eq!(
            segment.source,
            ImageSource::LocalPath(PathBuf::from("/tmp/cat.png"))
        );
        assert_eq!(segment.identifier.as_deref(), Some("cat.png"));
    }

    #[test]
    fn test_parse_blank_line() {
        let config = ConsoleConfig::default();
        assert!(parse_line(&config, "   ").is_none());
    }

    #[tokio::test]
    async fn test_send_requires_running() {
        let adapter = ConsoleAdapter::new(ConsoleConfig::default());
        let result = adapter
            .send(OutboundMessage::text("console", "console", "hello"))
            .await;
        assert!(matches!(result, Err(Error::Channel(_))));
    }
}
