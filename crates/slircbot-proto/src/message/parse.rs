//! Message parsing implementation.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

use super::types::Message;

impl Message {
    /// Parse one line (without its terminator) into a [`Message`].
    ///
    /// Grammar: `[":" origin " "] command *(" " param) [" :" trailing]`.
    /// When an origin is present at least one parameter must follow the
    /// command. Runs of spaces between parameters are collapsed; the
    /// trailing parameter is kept verbatim.
    pub fn parse(line: &str) -> Result<Message, MessageParseError> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if line.trim_start_matches(' ').is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let mut rest = line;
        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (origin, tail) = stripped
                    .split_once(' ')
                    .ok_or(MessageParseError::UnterminatedOrigin)?;
                if origin.is_empty() {
                    return Err(MessageParseError::UnterminatedOrigin);
                }
                rest = tail.trim_start_matches(' ');
                Some(Prefix::new_from_str(origin))
            }
            None => {
                rest = rest.trim_start_matches(' ');
                None
            }
        };

        let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() || !command.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(MessageParseError::InvalidCommand);
        }

        let mut params = Vec::new();
        let mut trailing = None;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(text) = rest.strip_prefix(':') {
                trailing = Some(text.to_owned());
                break;
            }
            match rest.split_once(' ') {
                Some((param, tail)) => {
                    params.push(param.to_owned());
                    rest = tail;
                }
                None => {
                    params.push(rest.to_owned());
                    break;
                }
            }
        }

        if prefix.is_some() && params.is_empty() && trailing.is_none() {
            return Err(MessageParseError::NotEnoughArguments {
                expected: 1,
                got: 0,
            });
        }

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params,
            trailing,
        })
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Message::parse(s).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })
    }
}
