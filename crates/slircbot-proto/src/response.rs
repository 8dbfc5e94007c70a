//! Numeric replies the client reacts to.

/// `001` - registration complete.
pub const RPL_WELCOME: &str = "001";

/// `433` - requested nickname is taken.
pub const ERR_NICKNAMEINUSE: &str = "433";
