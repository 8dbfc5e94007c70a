use crate::prefix::Prefix;

/// A parsed IRC line.
///
/// Derived solely from the line text; parsing the same text always yields
/// an equal value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Origin of the message, if the line carried one.
    pub prefix: Option<Prefix>,
    /// Command verb or three-digit numeric, as received.
    pub command: String,
    /// Middle parameters, in order.
    pub params: Vec<String>,
    /// Trailing parameter, introduced by `:` and taken verbatim.
    pub trailing: Option<String>,
}

impl Message {
    /// Build a message with no origin.
    pub fn new(command: impl Into<String>, params: Vec<String>, trailing: Option<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
            trailing,
        }
    }

    /// Whether the command token equals `verb`, ignoring ASCII case.
    pub fn is(&self, verb: &str) -> bool {
        self.command.eq_ignore_ascii_case(verb)
    }

    /// Short identity of the sender (nick or server name).
    pub fn source_name(&self) -> Option<&str> {
        self.prefix.as_ref().map(Prefix::name)
    }

    /// Token to echo back for a `PING`.
    ///
    /// The trailing parameter when present, otherwise the last middle one.
    pub fn keepalive_token(&self) -> Option<&str> {
        if !self.is("PING") {
            return None;
        }
        self.trailing
            .as_deref()
            .or_else(|| self.params.last().map(String::as_str))
    }

    /// Target and body of a `PRIVMSG`.
    ///
    /// A missing trailing parameter yields an empty body.
    pub fn privmsg(&self) -> Option<(&str, &str)> {
        if !self.is("PRIVMSG") {
            return None;
        }
        let target = self.params.first()?;
        Some((target, self.trailing.as_deref().unwrap_or("")))
    }
}
