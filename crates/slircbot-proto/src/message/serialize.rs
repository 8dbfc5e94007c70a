use std::fmt::{self, Write};

use super::types::Message;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;
        for param in &self.params {
            f.write_char(' ')?;
            f.write_str(param)?;
        }
        if let Some(trailing) = &self.trailing {
            f.write_str(" :")?;
            f.write_str(trailing)?;
        }
        Ok(())
    }
}
