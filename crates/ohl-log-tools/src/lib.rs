//! Log event extraction for openHAB.
//!
//! Classifies openHAB event log lines (item state changes, commands, thing
//! status changes), recovers `key=value` structure, and answers "what is the
//! latest line mentioning this term" across the event and application logs.
//! A `LogSource` abstraction keeps the actual file scan swappable and testable.

pub mod augment;
pub mod error;
pub mod mock;
pub mod parsers;
pub mod query;
pub mod source;
pub mod types;

// Re-export key types for convenience
pub use augment::augment;
pub use error::{LogError, LogResult};
pub use mock::{MockFailure, MockLogSource};
pub use parsers::classify;
pub use query::{LogQueryEngine, QueryConfig, SearchStrategy};
pub use source::{FileLogSource, GrepLogSource, LogSource};
pub use types::{EventKind, LogEvent};
