//! Growable output buffer for expanded text

use thiserror::Error;

use crate::config::{OUTPUT_SIZE_INCREMENT, OUTPUT_SIZE_INITIAL};

/// The buffer could not make room for more output
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("output buffer could not grow past {len} bytes")]
pub struct GrowthError {
    pub len: usize,
}

/// Append-only text buffer.
///
/// A failed write leaves the buffer exactly as it was after the last
/// successful one.
#[derive(Debug)]
pub struct OutputBuffer {
    text: String,
    ceiling: usize,
}

impl OutputBuffer {
    #[cfg(test)]
    pub(crate) fn new() -> Result<Self, GrowthError> {
        Self::with_ceiling(usize::MAX)
    }

    /// Buffer that refuses to hold more than `ceiling` bytes
    pub(crate) fn with_ceiling(ceiling: usize) -> Result<Self, GrowthError> {
        let mut text = String::new();
        text.try_reserve_exact(OUTPUT_SIZE_INITIAL)
            .map_err(|_| GrowthError { len: 0 })?;
        Ok(Self { text, ceiling })
    }

    pub fn push_str(&mut self, s: &str) -> Result<(), GrowthError> {
        let len = self.text.len();
        let required = len.checked_add(s.len()).ok_or(GrowthError { len })?;
        if required > self.ceiling {
            return Err(GrowthError { len });
        }

        if required > self.text.capacity() {
            let additional = s.len().max(OUTPUT_SIZE_INCREMENT);
            self.text
                .try_reserve(additional)
                .map_err(|_| GrowthError { len })?;
        }

        self.text.push_str(s);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Allocated size in bytes
    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Move the contents out, leaving the buffer empty
    pub(crate) fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
