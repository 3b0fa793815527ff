//! Bot orchestration
//!
//! [`Bot`] wires the registry, the image fetcher, and the channel adapters
//! together: adapters push [`ChannelEvent`]s onto an mpsc queue, and a
//! single event loop dispatches each message to completion before taking
//! the next.

pub mod commands;
pub mod dispatch;

use crate::channels::{ChannelAdapter, ChannelEvent, ConsoleAdapter};
use crate::config::MemeVaultConfig;
use crate::error::{Error, Result};
use crate::fetch::ImageFetcher;
use crate::registry::Vault;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

/// Bot lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Stopped,
    Starting,
    Running,
    ShuttingDown,
}

/// MemeVault bot: registry + channels + event loop
pub struct Bot {
    config: MemeVaultConfig,
    state: Arc<RwLock<BotState>>,
    vault: Arc<Vault>,
    fetcher: Arc<ImageFetcher>,
    channels: Arc<RwLock<HashMap<String, Arc<dyn ChannelAdapter>>>>,
    event_tx: mpsc::Sender<ChannelEvent>,
    event_rx: Arc<RwLock<Option<mpsc::Receiver<ChannelEvent>>>>,
}

impl Bot {
    /// Create a new bot: opens the vault and builds the fetcher
    pub async fn new(config: MemeVaultConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(1000);

        let vault = Arc::new(Vault::open(&config.storage, &config.capture).await?);
        let fetcher = Arc::new(ImageFetcher::new(Duration::from_secs(
            config.fetch.timeout_secs,
        ))?);

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(BotState::Stopped)),
            vault,
            fetcher,
            channels: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
            event_rx: Arc::new(RwLock::new(Some(event_rx))),
        })
    }

    /// Current state
    pub async fn state(&self) -> BotState {
        *self.state.read().await
    }

    /// The registry behind this bot
    pub fn vault(&self) -> &Arc<Vault> {
        &self.vault
    }

    /// Event sender for injecting external events (e.g. from tests or
    /// embedding hosts)
    pub fn event_sender(&self) -> &mpsc::Sender<ChannelEvent> {
        &self.event_tx
    }

    /// Start the bot: bring up channels and the event loop
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != BotState::Stopped {
            return Err(Error::Channel("bot already running".to_string()));
        }
        *state = BotState::Starting;
        drop(state);

        self.init_channels().await?;
        self.start_event_loop().await;

        *self.state.write().await = BotState::Running;
        tracing::info!("bot started");
        Ok(())
    }

    /// Stop the bot and its channels
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != BotState::Running {
            return Ok(());
        }
        *state = BotState::ShuttingDown;
        drop(state);

        let channels: Vec<Arc<dyn ChannelAdapter>> = {
            let channels = self.channels.read().await;
            channels.values().cloned().collect()
        };
        for channel in channels {
            if let Err(e) = channel.stop().await {
                tracing::warn!("failed to stop channel {}: {}", channel.name(), e);
            }
        }

        *self.state.write().await = BotState::Stopped;
        tracing::info!("bot stopped");
        Ok(())
    }

    /// Initialize configured channel adapters
    async fn init_channels(&self) -> Result<()> {
        let mut channels = self.channels.write().await;

        if let Some(console_config) = &self.config.channels.console {
            let adapter: Arc<dyn ChannelAdapter> =
                Arc::new(ConsoleAdapter::new(console_config.clone()));
            adapter.start(self.event_tx.clone()).await?;
            channels.insert("console".to_string(), adapter);
        }

        Ok(())
    }

    /// Spawn the event loop.
    ///
    /// Events are handled one at a time: each message's dispatch runs to
    /// completion before the next is taken, so per-event handling is a
    /// critical section without extra locking.
    async fn start_event_loop(&self) {
        let event_rx = self.event_rx.write().await.take();
        if let Some(mut rx) = event_rx {
            let vault = self.vault.clone();
            let fetcher = self.fetcher.clone();
            let config = self.config.clone();
            let channels = self.channels.clone();

            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    if let Err(e) =
                        Self::handle_event(event, &vault, &fetcher, &config, &channels).await
                    {
                        tracing::error!("error handling event: {}", e);
                    }
                }
            });
        }
    }

    /// Handle one channel event
    async fn handle_event(
        event: ChannelEvent,
        vault: &Arc<Vault>,
        fetcher: &Arc<ImageFetcher>,
        config: &MemeVaultConfig,
        channels: &Arc<RwLock<HashMap<String, Arc<dyn ChannelAdapter>>>>,
    ) -> Result<()> {
        match event {
            ChannelEvent::Message(message) => {
                tracing::debug!(
                    channel = %message.channel,
                    sender = %message.sender_id,
                    "received message"
                );

                let reply = dispatch::handle_message(vault, fetcher, config, &message).await?;
                if let Some(reply) = reply {
                    let channels = channels.read().await;
                    if let Some(channel) = channels.get(&reply.channel) {
                        channel.send(reply).await?;
                    } else {
                        tracing::warn!(channel = %reply.channel, "no adapter for reply channel");
                    }
                }
            }
            ChannelEvent::Connected { channel } => {
                tracing::info!("channel {} connected", channel);
            }
            ChannelEvent::Disconnected { channel, reason } => {
                tracing::warn!("channel {} disconnected: {}", channel, reason);
            }
            ChannelEvent::Error { channel, error } => {
                tracing::error!("channel {} error: {}", channel, error);
            }
        }

        Ok(())
    }
}
