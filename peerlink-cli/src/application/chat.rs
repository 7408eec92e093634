use crate::infrastructure::{CliError, Result};
use peerlink_core::PeerId;

pub const HELP: &str = "\
Commands:
  /find                  discover peers and bind one
  /bind <peer>           bind a discovered peer
  /unbind                drop the current binding
  /status                show session state
  /avail <peer> on|off   simulate an availability change
  /help                  show this help
  /quit                  leave
Anything else is sent to the bound peer.";

/// One line of chat input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Find,
    Bind(PeerId),
    Unbind,
    Status,
    Availability { peer: PeerId, available: bool },
    Help,
    Quit,
    Send(String),
}

impl ChatCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(ChatCommand::Send(line.to_string())));
        };

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let parsed = match (name, args.as_slice()) {
            ("find", []) => ChatCommand::Find,
            ("bind", [peer]) => ChatCommand::Bind(PeerId::new(*peer)),
            ("bind", _) => return Err(CliError::Usage("/bind <peer>")),
            ("unbind", []) => ChatCommand::Unbind,
            ("status", []) => ChatCommand::Status,
            ("avail", [peer, flag]) => ChatCommand::Availability {
                peer: PeerId::new(*peer),
                available: parse_flag(flag)?,
            },
            ("avail", _) => return Err(CliError::Usage("/avail <peer> on|off")),
            ("help", _) => ChatCommand::Help,
            ("quit" | "exit", _) => ChatCommand::Quit,
            _ => return Err(CliError::UnknownCommand(format!("/{}", command.trim()))),
        };
        Ok(Some(parsed))
    }
}

fn parse_flag(flag: &str) -> Result<bool> {
    match flag {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CliError::Usage("/avail <peer> on|off")),
    }
}
