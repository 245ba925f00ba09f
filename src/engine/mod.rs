//! Expansion engine
//!
//! [`Expander`] scans a template token by token, copying text to an
//! [`OutputBuffer`] and descending into placeholder values through a
//! [`ContextStack`](crate::stack::ContextStack) of suspended positions.

mod arena;
mod expander;
mod notify;
mod output;

pub use arena::{SourceArena, SourceId};
pub use expander::Expander;
pub use notify::{
    Notification, NotificationHandler, NotificationKind, SilentHandler, TracingHandler,
};
pub use output::{GrowthError, OutputBuffer};
