//! Message-event dispatch
//!
//! Routes every inbound message through, in order: the armed capture
//! window (an image while armed is ingested and consumes the window,
//! success or not), the command surface, and the repost match on the
//! image's own identifier. At most one reply per message; the first hit
//! wins.

use super::commands::{self, Command};
use crate::channels::{ImageSegment, InboundMessage, OutboundMessage};
use crate::config::MemeVaultConfig;
use crate::error::{Error, Result};
use crate::fetch::ImageFetcher;
use crate::registry::{AddOutcome, ContentDigest, Vault};
use std::collections::HashSet;

/// Handle one inbound message, producing at most one reply.
///
/// The message's receive timestamp is the clock for capture-window checks.
pub async fn handle_message(
    vault: &Vault,
    fetcher: &ImageFetcher,
    config: &MemeVaultConfig,
    message: &InboundMessage,
) -> Result<Option<OutboundMessage>> {
    let now = message.timestamp;

    // Armed capture window: the next image from this pair is ingested, and
    // the window is consumed whether or not the ingest succeeds.
    if let Some(segment) = &message.image {
        if vault
            .take_capture(&message.conversation_id, &message.sender_id, now)
            .await
        {
            let reply = capture_image(vault, fetcher, segment).await?;
            return Ok(Some(reply_text(message, reply)));
        }
    }

    // Command surface
    if let Some(command) = commands::parse(&message.content) {
        let reply = exec_command(vault, fetcher, config, message, command).await?;
        return Ok(Some(reply_text(message, reply)));
    }

    // Repost: match the image's own identifier against the index
    if let Some(segment) = &message.image {
        if let Some(identifier) = &segment.identifier {
            if let Some(path) = vault.match_repost(identifier).await {
                tracing::debug!(identifier = %identifier, "repost hit");
                return Ok(Some(OutboundMessage::image(
                    message.channel.clone(),
                    message.conversation_id.clone(),
                    path,
                )));
            }
        }
    }

    Ok(None)
}

/// Execute a parsed command, returning the reply text
async fn exec_command(
    vault: &Vault,
    fetcher: &ImageFetcher,
    config: &MemeVaultConfig,
    message: &InboundMessage,
    command: Command,
) -> Result<String> {
    match command {
        Command::Add => match &message.image {
            // Image attached to the command itself: ingest directly, no
            // arming
            Some(segment) => capture_image(vault, fetcher, segment).await,
            None => {
                vault
                    .arm_capture(
                        &message.conversation_id,
                        &message.sender_id,
                        message.timestamp,
                    )
                    .await;
                Ok(format!(
                    "OK - send an image within {} seconds and I'll save it",
                    config.capture.ttl_secs
                ))
            }
        },
        Command::Name { digest, alias } => {
            let digest = ContentDigest::from_stored(&digest);
            match vault.bind(&digest, &alias).await {
                Ok(()) => Ok(format!("Alias bound: {} -> {}", alias, digest)),
                Err(Error::NotFound(_)) => Ok(format!(
                    "No such digest: {}\nSave it first with: meme add",
                    digest
                )),
                Err(e) => Err(e),
            }
        }
        Command::Show { query } => match vault.show(&query).await {
            Ok(info) => Ok(format!(
                "Digest: {}\nAlias: {}\nFile: {}",
                info.digest,
                info.alias.as_deref().unwrap_or("(none)"),
                info.filename.as_deref().unwrap_or("(missing)"),
            )),
            Err(Error::NotFound(_)) => Ok(format!("Not found: {}", query)),
            Err(e) => Err(e),
        },
        Command::List => Ok(render_list(vault, config).await),
        Command::Del { query } => match vault.delete(&query).await {
            Ok(digest) => Ok(format!("Deleted {} (digest {})", query, digest)),
            Err(Error::NotFound(_)) => Ok(format!("Not found: {}", query)),
            Err(e) => Err(e),
        },
        Command::Reload => {
            let summary = vault.reload().await?;
            Ok(format!(
                "Index rebuilt: {} entries, {} stale aliases removed",
                summary.total, summary.aliases_pruned
            ))
        }
        Command::Help => Ok(commands::HELP.to_string()),
        Command::Usage(usage) => Ok(usage.to_string()),
    }
}

/// Resolve a segment's bytes and ingest them, returning the reply text.
/// Ingest failures become user-facing replies; persistence failures
/// propagate.
async fn capture_image(
    vault: &Vault,
    fetcher: &ImageFetcher,
    segment: &ImageSegment,
) -> Result<String> {
    let (bytes, ext) = match fetcher.resolve(segment).await {
        Ok(resolved) => resolved,
        Err(Error::Ingest(reason)) => return Ok(format!("Failed to save image: {}", reason)),
        Err(e) => return Err(e),
    };

    let outcome = vault.ingest(&bytes, &ext).await?;
    Ok(saved_reply(&outcome))
}

fn saved_reply(outcome: &AddOutcome) -> String {
    match &outcome.existing_alias {
        Some(alias) => format!("Saved image {} (alias: {})", outcome.digest, alias),
        None => format!(
            "Saved image {}\nBind an alias with: meme name {} <alias>",
            outcome.digest, outcome.digest
        ),
    }
}

/// Render the list reply: alias-bound entries first, then bare digests,
/// capped for display with a count of what's hidden.
async fn render_list(vault: &Vault, config: &MemeVaultConfig) -> String {
    let snapshot = vault.list().await;
    if snapshot.digests.is_empty() {
        return "Nothing saved yet. Save one with: meme add".to_string();
    }

    let cap = config.list.max_entries;
    let mut lines = Vec::new();
    for (alias, digest) in snapshot.aliases.iter().take(cap) {
        lines.push(format!("{} -> {}", alias, digest));
    }
    if lines.len() < cap {
        let bound: HashSet<&ContentDigest> = snapshot.aliases.iter().map(|(_, d)| d).collect();
        for digest in &snapshot.digests {
            if lines.len() >= cap {
                break;
            }
            if bound.contains(digest) {
                continue;
            }
            lines.push(digest.to_string());
        }
    }

    let mut reply = format!("Saved images:\n{}", lines.join("\n"));
    if snapshot.digests.len() > cap {
        reply.push_str(&format!(
            "\n... {} total, showing the first {}",
            snapshot.digests.len(),
            cap
        ));
    }
    reply
}

fn reply_text(message: &InboundMessage, text: String) -> OutboundMessage {
    OutboundMessage::text(message.channel.clone(), message.conversation_id.clone(), text)
}
