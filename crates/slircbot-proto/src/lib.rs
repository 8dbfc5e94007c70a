//! # slircbot-proto
//!
//! The slice of the IRC client protocol a chat bot needs: line framing,
//! message parsing, and the handful of outbound commands it sends.
//!
//! ```rust
//! use slircbot_proto::{Command, Message};
//!
//! let msg: Message = ":nick!u@h PRIVMSG #chan :.ping".parse().unwrap();
//! assert_eq!(msg.privmsg(), Some(("#chan", ".ping")));
//!
//! let reply = Command::PRIVMSG("#chan".into(), "Pong!".into());
//! assert_eq!(reply.to_string(), "PRIVMSG #chan :Pong!");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::line::{LineCodec, LineFramer, MAX_LINE_LEN};
pub use self::message::Message;
pub use self::prefix::Prefix;
