//! Context stack for suspended template scans
//!
//! When the engine descends into a placeholder value it saves where the
//! enclosing template left off. The stack knows nothing about templates: a
//! frame is any source handle paired with an offset.
//!
//! Frames live in two segments. The fixed segment is reserved up front and
//! never reallocates. Once it is full, a stack created with
//! [`StackGrowth::Overflow`] keeps going with individually boxed frames that
//! are released as soon as they are popped; a [`StackGrowth::Fixed`] stack
//! rejects the push instead.

use thiserror::Error;

use crate::config::{DEFAULT_STACK_SIZE, MAXIMUM_STACK_SIZE};

/// Errors reported by [`ContextStack`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Requested capacity exceeds [`MAXIMUM_STACK_SIZE`]
    #[error("stack size {requested} exceeds the maximum of {maximum}")]
    InvalidSize { requested: usize, maximum: usize },

    /// No room left for another frame
    #[error("stack overflow at {entries} entries")]
    Overflow { entries: usize },

    /// Pop on a stack without frames
    #[error("stack is empty")]
    Empty,

    /// Memory for the stack could not be obtained
    #[error("stack allocation failed")]
    AllocationFailed,
}

/// How a stack behaves once its fixed segment is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackGrowth {
    /// Reject pushes beyond the initial capacity
    Fixed,
    /// Spill into boxed frames until [`MAXIMUM_STACK_SIZE`] is reached
    #[default]
    Overflow,
}

/// A suspended scan position: which source, and where to resume in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<S> {
    pub source: S,
    pub offset: usize,
}

impl<S> Frame<S> {
    pub fn new(source: S, offset: usize) -> Self {
        Self { source, offset }
    }
}

/// LIFO store of [`Frame`]s
#[derive(Debug)]
pub struct ContextStack<S> {
    fixed: Vec<Frame<S>>,
    size: usize,
    overflow: Vec<Box<Frame<S>>>,
    growth: StackGrowth,
}

impl<S> ContextStack<S> {
    /// Create a growable stack with `initial_size` pre-allocated slots.
    ///
    /// Zero selects [`DEFAULT_STACK_SIZE`].
    pub fn new(initial_size: usize) -> Result<Self, StackError> {
        Self::with_growth(initial_size, StackGrowth::Overflow)
    }

    /// Create a stack that holds at most `capacity` frames.
    ///
    /// Zero selects [`DEFAULT_STACK_SIZE`].
    pub fn fixed(capacity: usize) -> Result<Self, StackError> {
        Self::with_growth(capacity, StackGrowth::Fixed)
    }

    pub fn with_growth(initial_size: usize, growth: StackGrowth) -> Result<Self, StackError> {
        let size = if initial_size == 0 {
            DEFAULT_STACK_SIZE
        } else {
            initial_size
        };

        if growth == StackGrowth::Overflow && size > MAXIMUM_STACK_SIZE {
            return Err(StackError::InvalidSize {
                requested: size,
                maximum: MAXIMUM_STACK_SIZE,
            });
        }

        let mut fixed = Vec::new();
        fixed
            .try_reserve_exact(size)
            .map_err(|_| StackError::AllocationFailed)?;

        Ok(Self {
            fixed,
            size,
            overflow: Vec::new(),
            growth,
        })
    }

    /// Save a frame on top of the stack
    pub fn push(&mut self, frame: Frame<S>) -> Result<(), StackError> {
        if self.fixed.len() < self.size {
            self.fixed.push(frame);
            return Ok(());
        }

        let entries = self.entry_count();
        match self.growth {
            StackGrowth::Fixed => Err(StackError::Overflow { entries }),
            StackGrowth::Overflow if entries >= MAXIMUM_STACK_SIZE => {
                Err(StackError::Overflow { entries })
            }
            StackGrowth::Overflow => {
                self.overflow
                    .try_reserve(1)
                    .map_err(|_| StackError::AllocationFailed)?;
                self.overflow.push(Box::new(frame));
                Ok(())
            }
        }
    }

    /// Remove and return the top frame
    pub fn pop(&mut self) -> Result<Frame<S>, StackError> {
        if let Some(frame) = self.overflow.pop() {
            return Ok(*frame);
        }
        self.fixed.pop().ok_or(StackError::Empty)
    }

    /// Number of pre-allocated frame slots
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of frames currently saved, across both segments
    pub fn entry_count(&self) -> usize {
        self.fixed.len() + self.overflow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Drop every saved frame, releasing the overflow segment
    pub fn clear(&mut self) {
        self.overflow = Vec::new();
        self.fixed.clear();
    }
}
