//! Ordered command table.
//!
//! Lookup walks entries in registration order and stops at the first one
//! whose prefix starts the message text. `.dice` registered before `.dice2`
//! therefore also answers `.dice2 roll`.

use std::sync::Arc;

use super::traits::Handler;

/// One registered command.
pub struct Entry {
    prefix: String,
    name: String,
    handler: Arc<dyn Handler>,
}

impl Entry {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix without leading punctuation, used in logs and spans.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }
}

/// Registry of command handlers.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; earlier registrations take precedence.
    pub fn register<H>(&mut self, prefix: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        let prefix = prefix.into();
        let name = prefix
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_owned();
        self.entries.push(Entry {
            prefix,
            name,
            handler: Arc::new(handler),
        });
    }

    /// First entry whose prefix is a literal prefix of `text`.
    pub fn find(&self, text: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| text.starts_with(&e.prefix))
    }

    pub fn prefixes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.prefix.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
