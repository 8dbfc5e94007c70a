//! Message origin (`:origin` segment).
//!
//! An origin is either a server name or a `nick!user@host` mask. Parsing is
//! lenient: components are not validated, only split.

use std::fmt;

/// IRC message prefix - identifies the origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse an origin string.
    ///
    /// A dot before any `!` or `@` marks a server name.
    pub fn new_from_str(s: &str) -> Self {
        let (name, rest) = match s.find(|c: char| c == '!' || c == '@') {
            Some(pos) => s.split_at(pos),
            None => (s, ""),
        };

        if rest.is_empty() && name.contains('.') {
            return Prefix::ServerName(name.to_owned());
        }

        let (user, host) = match rest.strip_prefix('!') {
            Some(after) => match after.split_once('@') {
                Some((user, host)) => (user, host),
                None => (after, ""),
            },
            None => ("", rest.strip_prefix('@').unwrap_or("")),
        };

        Prefix::Nickname(name.to_owned(), user.to_owned(), host.to_owned())
    }

    /// Nickname, if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) => Some(nick),
            Prefix::ServerName(_) => None,
        }
    }

    /// Short identity of the origin: the nick for users, the name for servers.
    pub fn name(&self) -> &str {
        match self {
            Prefix::Nickname(nick, _, _) => nick,
            Prefix::ServerName(name) => name,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(name, user, host) => match (&name[..], &user[..], &host[..]) {
                (name, "", "") => f.write_str(name),
                (name, user, "") => write!(f, "{}!{}", name, user),
                (name, "", host) => write!(f, "{}@{}", name, host),
                (name, user, host) => write!(f, "{}!{}@{}", name, user, host),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let prefix = Prefix::new_from_str("alice!~al@host.example");
        assert_eq!(
            prefix,
            Prefix::Nickname("alice".into(), "~al".into(), "host.example".into())
        );
        assert_eq!(prefix.nick(), Some("alice"));
        assert_eq!(prefix.to_string(), "alice!~al@host.example");
    }

    #[test]
    fn test_server_name() {
        let prefix = Prefix::new_from_str("irc.example.net");
        assert_eq!(prefix, Prefix::ServerName("irc.example.net".into()));
        assert_eq!(prefix.nick(), None);
        assert_eq!(prefix.name(), "irc.example.net");
    }

    #[test]
    fn test_bare_nick() {
        let prefix = Prefix::new_from_str("bob");
        assert_eq!(prefix.nick(), Some("bob"));
        assert_eq!(prefix.to_string(), "bob");
    }

    #[test]
    fn test_nick_at_host() {
        let prefix = Prefix::new_from_str("bob@some.host");
        assert_eq!(
            prefix,
            Prefix::Nickname("bob".into(), String::new(), "some.host".into())
        );
        assert_eq!(prefix.to_string(), "bob@some.host");
    }
}
