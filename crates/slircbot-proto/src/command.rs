//! Outbound commands a client session sends.

use std::fmt;

use crate::message::Message;

/// Commands the bot writes to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `NICK nickname`
    NICK(String),
    /// `USER username 0 * :realname`
    USER(String, String),
    /// `JOIN channel`
    JOIN(String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `PONG :token`
    PONG(String),
    /// `QUIT :message`
    QUIT(String),
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Message {
        match cmd {
            Command::NICK(nick) => Message::new("NICK", vec![nick], None),
            Command::USER(user, real) => Message::new(
                "USER",
                vec![user, "0".to_owned(), "*".to_owned()],
                Some(real),
            ),
            Command::JOIN(chan) => Message::new("JOIN", vec![chan], None),
            Command::PRIVMSG(target, text) => Message::new("PRIVMSG", vec![target], Some(text)),
            Command::PONG(token) => Message::new("PONG", Vec::new(), Some(token)),
            Command::QUIT(text) => Message::new("QUIT", Vec::new(), Some(text)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Message::from(self.clone()).fmt(f)
    }
}
