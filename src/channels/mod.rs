//! Channel message adapters
//!
//! Provides a unified interface for receiving and sending messages across
//! messaging platforms, plus the console reference transport.

mod adapter;
mod console;
mod message;

pub use adapter::{AdapterBase, AdapterStatus, ChannelAdapter, ChannelEvent};
pub use console::ConsoleAdapter;
pub use message::{ImageSegment, ImageSource, InboundMessage, OutboundMessage, OutboundPayload};
