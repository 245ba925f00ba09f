//! Atsign - recursive `@@placeholder@@` template expansion
//!
//! A template is plain text with three kinds of markup:
//!
//! - `@@name@@` is replaced by the value of `name`, and the value is expanded
//!   in turn
//! - a line starting with `%%` is a comment and is dropped entirely
//! - `\\`, `\@` and (at column 1) `\%` escape the markup characters
//!
//! Placeholders may nest up to [`MAX_NESTING_LEVEL`] deep. Nesting is tracked
//! on an explicit stack, never on the call stack.
//!
//! # Example
//!
//! ```rust
//! use atsign::{expand, PlaceholderTable};
//!
//! let table = PlaceholderTable::from_pairs([
//!     ("greeting", "Hello, @@name@@!"),
//!     ("name", "World"),
//! ])
//! .unwrap();
//!
//! let text = expand("%% header comment\n@@greeting@@", &table).unwrap();
//! assert_eq!(text, "Hello, World!");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scanner;
pub mod stack;
pub mod store;

pub use config::{
    delimiter, ignore_prefix, max_nesting_level, max_placeholder_length, MAX_NESTING_LEVEL,
    MAX_PLACEHOLDER_LENGTH,
};
pub use engine::{
    Expander, Notification, NotificationHandler, NotificationKind, SilentHandler, TracingHandler,
};
pub use error::ExpandError;
pub use stack::{ContextStack, Frame, StackError, StackGrowth};
pub use store::{KeyHasher, PlaceholderKey, PlaceholderStore, PlaceholderTable, TableError};

/// Expand `template` against `placeholders`, logging through `tracing`
///
/// # Example
///
/// ```rust
/// use atsign::{expand, PlaceholderTable};
///
/// let table = PlaceholderTable::from_pairs([("x", "@@y@@"), ("y", "z")]).unwrap();
/// assert_eq!(expand("<@@x@@>", &table).unwrap(), "<z>");
/// ```
pub fn expand<S>(template: &str, placeholders: &S) -> Result<String, ExpandError>
where
    S: PlaceholderStore + ?Sized,
{
    Expander::new().expand(template, placeholders)
}

/// Expand `template`, reporting notifications to `handler`
///
/// # Example
///
/// ```rust
/// use atsign::{expand_with, Notification, NotificationKind, PlaceholderTable};
///
/// let table = PlaceholderTable::new();
/// let mut undefined = 0;
/// let text = expand_with("@@missing@@", &table, |n: &Notification<'_>| {
///     if n.kind == NotificationKind::UndefinedPlaceholder {
///         undefined += 1;
///     }
/// })
/// .unwrap();
///
/// assert_eq!(text, "@@missing@@");
/// assert_eq!(undefined, 1);
/// ```
pub fn expand_with<S, H>(
    template: &str,
    placeholders: &S,
    handler: H,
) -> Result<String, ExpandError>
where
    S: PlaceholderStore + ?Sized,
    H: NotificationHandler,
{
    Expander::new().with_handler(handler).expand(template, placeholders)
}

/// Expand inputs that may be absent.
///
/// Fails with [`ExpandError::InvalidTemplate`] or
/// [`ExpandError::InvalidPlaceholders`] when one is `None`.
pub fn try_expand<S>(
    template: Option<&str>,
    placeholders: Option<&S>,
) -> Result<String, ExpandError>
where
    S: PlaceholderStore + ?Sized,
{
    Expander::new().try_expand(template, placeholders)
}
