//! Error types for template expansion

use thiserror::Error;

use crate::stack::StackError;

/// Why an expansion did not produce a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// No template was given
    #[error("no template to expand")]
    InvalidTemplate,

    /// No placeholder store was given
    #[error("no placeholder store to expand against")]
    InvalidPlaceholders,

    /// Memory could not be obtained. When the output buffer failed to grow,
    /// `partial` holds everything expanded up to that point.
    #[error("allocation failed during expansion")]
    AllocationFailed { partial: Option<String> },

    /// Placeholders nested deeper than the compiled-in limit
    #[error("template nesting exceeds {limit} levels at offset {offset}")]
    NestingLimitExceeded { limit: usize, offset: usize },

    /// Context stack failure with no engine-level meaning
    #[error("context stack error: {0}")]
    Stack(StackError),
}

impl ExpandError {
    /// Map a context stack failure to the engine outcome it stands for
    pub(crate) fn from_stack(err: StackError, offset: usize) -> Self {
        match err {
            StackError::AllocationFailed => ExpandError::AllocationFailed { partial: None },
            StackError::Overflow { entries } => ExpandError::NestingLimitExceeded {
                limit: entries,
                offset,
            },
            other => ExpandError::Stack(other),
        }
    }

    /// Output produced before the output buffer failed to grow
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ExpandError::AllocationFailed { partial } => partial.as_deref(),
            _ => None,
        }
    }

    pub fn into_partial_output(self) -> Option<String> {
        match self {
            ExpandError::AllocationFailed { partial } => partial,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_errors_map_to_engine_outcomes() {
        assert_eq!(
            ExpandError::from_stack(StackError::AllocationFailed, 4),
            ExpandError::AllocationFailed { partial: None }
        );
        assert_eq!(
            ExpandError::from_stack(StackError::Overflow { entries: 100 }, 4),
            ExpandError::NestingLimitExceeded {
                limit: 100,
                offset: 4
            }
        );
        assert_eq!(
            ExpandError::from_stack(StackError::Empty, 0),
            ExpandError::Stack(StackError::Empty)
        );
    }

    #[test]
    fn test_partial_output_only_for_allocation_failures() {
        let err = ExpandError::AllocationFailed {
            partial: Some("abc".to_string()),
        };
        assert_eq!(err.partial_output(), Some("abc"));
        assert_eq!(err.into_partial_output(), Some("abc".to_string()));

        let err = ExpandError::NestingLimitExceeded {
            limit: 1,
            offset: 0,
        };
        assert_eq!(err.partial_output(), None);
    }

    #[test]
    fn test_display() {
        let err = ExpandError::NestingLimitExceeded {
            limit: 100,
            offset: 7,
        };
        assert_eq!(
            err.to_string(),
            "template nesting exceeds 100 levels at offset 7"
        );
    }
}
