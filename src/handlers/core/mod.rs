//! Core handler infrastructure.
//!
//! - [`Handler`]: the single capability every command implements
//! - [`Registry`]: ordered `(prefix, handler)` table, first match wins
//! - [`Dispatcher`]: accounting, rate limiting and bounded execution
//! - [`Context`]: shared state handed to every invocation

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod traits;

pub use context::{CommandEvent, Context, Reply};
pub use dispatcher::{Dispatcher, Invocation};
pub use registry::{Entry, Registry};
pub use traits::Handler;
