pub mod events;
pub mod types;

pub use events::{Completion, CompletionStatus, Event, EventRecord};
pub use types::*;
