//! Command parsing
//!
//! The conversational command surface: space-delimited text, leading
//! `meme` keyword (a `/` prefix is tolerated), case-insensitive verb.
//! Multi-word aliases and queries keep everything after the fixed
//! arguments, joined by single spaces.

/// Full usage listing shown for unknown or missing verbs
pub const HELP: &str = "Usage:\n\
    meme add               save an image (attach one, or send it within 60s)\n\
    meme name <DIGEST> <alias>  bind an alias\n\
    meme show <DIGEST|alias>    show details\n\
    meme list              list saved images\n\
    meme del <DIGEST|alias>     delete\n\
    meme reload            rebuild the index";

pub const USAGE_NAME: &str = "Usage: meme name <DIGEST> <alias>";
pub const USAGE_SHOW: &str = "Usage: meme show <DIGEST|alias>";
pub const USAGE_DEL: &str = "Usage: meme del <DIGEST|alias>";

/// A parsed registry command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save an attached image, or arm a capture window
    Add,
    /// Bind an alias to a digest
    Name { digest: String, alias: String },
    /// Show details for a digest or alias
    Show { query: String },
    /// List saved images
    List,
    /// Delete by digest or alias
    Del { query: String },
    /// Rebuild the index from the blob directory
    Reload,
    /// Unknown or missing verb: reply with the full usage listing
    Help,
    /// Known verb with missing arguments: reply with its usage line
    Usage(&'static str),
}

/// Parse a message's text as a command.
///
/// Returns `None` when the text is not addressed to the bot at all (no
/// leading `meme` keyword).
pub fn parse(text: &str) -> Option<Command> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let keyword = parts.first()?.trim_start_matches('/');
    if !keyword.eq_ignore_ascii_case("meme") {
        return None;
    }

    let action = match parts.get(1) {
        Some(action) => action.to_ascii_lowercase(),
        None => return Some(Command::Help),
    };

    let command = match action.as_str() {
        "add" => Command::Add,
        "name" => {
            if parts.len() < 4 {
                Command::Usage(USAGE_NAME)
            } else {
                Command::Name {
                    digest: parts[2].to_string(),
                    alias: parts[3..].join(" "),
                }
            }
        }
        "show" => match rest(&parts, 2) {
            Some(query) => Command::Show { query },
            None => Command::Usage(USAGE_SHOW),
        },
        "list" => Command::List,
        "del" => match rest(&parts, 2) {
            Some(query) => Command::Del { query },
            None => Command::Usage(USAGE_DEL),
        },
        "reload" => Command::Reload,
        _ => Command::Help,
    };

    Some(command)
}

/// Join the tokens from `from` onward, or `None` when there are none
fn rest(parts: &[&str], from: usize) -> Option<String> {
    if parts.len() > from {
        Some(parts[from..].join(" "))
    } else {
        None
    }
}
