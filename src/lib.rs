//! MemeVault - content-addressed meme registry for chat channels
//!
//! MemeVault watches a conversation, stores images by content digest, lets
//! participants name them, and reposts a stored image whenever an inbound
//! image's identifier matches a known digest.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                        Bot                            │
//! │  ┌──────────────┐   events   ┌─────────────────────┐  │
//! │  │   Channels   ├───────────▶│      Dispatch       │  │
//! │  │  (console)   │◀───────────┤ capture / commands  │  │
//! │  └──────────────┘   replies  │      / repost       │  │
//! │                              └──────────┬──────────┘  │
//! │                                         │             │
//! │  ┌──────────────┐              ┌────────▼──────────┐  │
//! │  │ ImageFetcher │─── bytes ───▶│       Vault       │  │
//! │  │ (fs / http)  │              │ index ─ aliases ─ │  │
//! │  └──────────────┘              │ capture windows   │  │
//! │                                └────────┬──────────┘  │
//! │                                         │             │
//! │                              ┌──────────▼──────────┐  │
//! │                              │     Blob store      │  │
//! │                              │ <DIGEST><ext> files │  │
//! │                              └─────────────────────┘  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: content-addressed store, digest index, alias table,
//!   capture windows, and the [`registry::Vault`] facade
//! - [`channels`]: channel adapter trait, message types, console transport
//! - [`bot`]: event loop, command parsing, message dispatch
//! - [`fetch`]: local/remote image byte resolution
//! - [`config`]: configuration management

pub mod bot;
pub mod channels;
pub mod config;
pub mod error;
pub mod fetch;
pub mod registry;

pub use config::MemeVaultConfig;
pub use error::{Error, Result};
