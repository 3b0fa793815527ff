//! Channel message types
//!
//! Unified inbound/outbound message shapes shared by every channel
//! adapter. An inbound message carries at most one usable image segment,
//! whose source is resolved once at the adapter boundary into an explicit
//! [`ImageSource`] variant; the core never probes for attributes.

use std::path::PathBuf;

/// Where an inbound image's bytes can be obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file reachable on the local filesystem
    LocalPath(PathBuf),
    /// A remote URL to download
    RemoteUrl(String),
    /// The platform provided no usable source
    Unknown,
}

/// One usable image segment of an inbound message
#[derive(Debug, Clone)]
pub struct ImageSegment {
    /// Resolved byte source
    pub source: ImageSource,
    /// Opaque filename-like identifier assigned by the platform, if any
    pub identifier: Option<String>,
}

impl ImageSegment {
    /// Segment backed by a local file, identified by its filename
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identifier = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from);
        Self {
            source: ImageSource::LocalPath(path),
            identifier,
        }
    }

    /// Segment backed by a remote URL
    pub fn remote(url: impl Into<String>, identifier: Option<String>) -> Self {
        Self {
            source: ImageSource::RemoteUrl(url.into()),
            identifier,
        }
    }
}

/// Message received from a channel
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel name (e.g. "console")
    pub channel: String,
    /// Conversation identifier; may be empty if the platform omits it
    pub conversation_id: String,
    /// Sending participant identifier; may be empty if the platform omits it
    pub sender_id: String,
    /// Plain text content
    pub content: String,
    /// At most one usable image segment
    pub image: Option<ImageSegment>,
    /// Receive timestamp, milliseconds since the epoch
    pub timestamp: i64,
}

impl InboundMessage {
    /// Create a text message
    pub fn new(
        channel: impl Into<String>,
        conversation_id: impl Into<String>,
        sender_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            content: content.into(),
            image: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Attach an image segment
    pub fn with_image(mut self, segment: ImageSegment) -> Self {
        self.image = Some(segment);
        self
    }
}

/// Payload of an outbound message: plain text or one stored image by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    Text(String),
    Image(PathBuf),
}

/// Message to deliver through a channel
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Target channel name
    pub channel: String,
    /// Target conversation
    pub conversation_id: String,
    /// What to send
    pub payload: OutboundPayload,
}

impl OutboundMessage {
    /// Plain text reply
    pub fn text(
        channel: impl Into<String>,
        conversation_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            conversation_id: conversation_id.into(),
            payload: OutboundPayload::Text(content.into()),
        }
    }

    /// Image reply, referencing a stored file by path
    pub fn image(
        channel: impl Into<String>,
        conversation_id: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            channel: channel.into(),
            conversation_id: conversation_id.into(),
            payload: OutboundPayload::Image(path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_segment_identifier() {
        let segment = ImageSegment::local("/tmp/pics/cat.png");
        assert_eq!(segment.identifier.as_deref(), Some("cat.png"));
        assert_eq!(
            segment.source,
            ImageSource::LocalPath(PathBuf::from("/tmp/pics/cat.png"))
        );
    }

    #[test]
    fn test_remote_segment() {
        let segment = ImageSegment::remote("https://cdn.example/x", Some("x.jpg".into()));
        assert_eq!(
            segment.source,
            ImageSource::RemoteUrl("https://cdn.example/x".into())
        );
        assert_eq!(segment.identifier.as_deref(), Some("x.jpg"));
    }

    #[test]
    fn test_inbound_builder() {
        let msg = InboundMessage::new("console", "room", "alice", "hi")
            .with_image(ImageSegment::local("a.png"));
        assert_eq!(msg.channel, "console");
        assert!(msg.image.is_some());
    }
}
