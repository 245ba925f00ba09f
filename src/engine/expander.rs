//! The expansion state machine
//!
//! Nested placeholders are expanded without recursion. Entering a
//! placeholder pushes the resume point of the enclosing source onto a
//! [`ContextStack`] and switches the scan to the placeholder's value; the end
//! of a nested value pops it again. Depth is therefore bounded by
//! [`MAX_NESTING_LEVEL`] instead of by the call stack.

use memchr::memchr;

use crate::config::{DELIMITER, MAX_NESTING_LEVEL, MAX_PLACEHOLDER_LENGTH};
use crate::error::ExpandError;
use crate::scanner::{token_at, Span, Token};
use crate::stack::{ContextStack, Frame, StackError};
use crate::store::{KeyHasher, PlaceholderKey, PlaceholderStore};

use super::arena::{SourceArena, SourceId};
use super::notify::{Notification, NotificationHandler, NotificationKind, TracingHandler};
use super::output::OutputBuffer;

/// Expands templates, reporting events to a [`NotificationHandler`]
#[derive(Debug, Clone)]
pub struct Expander<H = TracingHandler> {
    handler: H,
    output_ceiling: usize,
}

impl Default for Expander<TracingHandler> {
    fn default() -> Self {
        Self {
            handler: TracingHandler,
            output_ceiling: usize::MAX,
        }
    }
}

impl Expander<TracingHandler> {
    /// Create an expander that reports through `tracing`
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: NotificationHandler> Expander<H> {
    /// Replace the notification handler
    pub fn with_handler<N: NotificationHandler>(self, handler: N) -> Expander<N> {
        Expander {
            handler,
            output_ceiling: self.output_ceiling,
        }
    }

    /// Cap the output size, turning larger results into allocation failures
    #[cfg(test)]
    pub(crate) fn with_output_ceiling(mut self, ceiling: usize) -> Self {
        self.output_ceiling = ceiling;
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Recursively expand every placeholder in `template`.
    ///
    /// On [`ExpandError::AllocationFailed`] caused by the output buffer, the
    /// output produced so far is carried in the error.
    pub fn expand<S>(&mut self, template: &str, placeholders: &S) -> Result<String, ExpandError>
    where
        S: PlaceholderStore + ?Sized,
    {
        let output = match OutputBuffer::with_ceiling(self.output_ceiling) {
            Ok(output) => output,
            Err(_) => {
                self.emit(NotificationKind::TargetAllocationFailed, template, 0);
                return Err(ExpandError::AllocationFailed { partial: None });
            }
        };

        let stack = match ContextStack::fixed(MAX_NESTING_LEVEL) {
            Ok(stack) => stack,
            Err(_) => {
                self.emit(NotificationKind::StackAllocationFailed, template, 0);
                return Err(ExpandError::AllocationFailed { partial: None });
            }
        };

        let scan = Scan {
            store: placeholders,
            handler: &mut self.handler,
            arena: SourceArena::new(template),
            stack,
            output,
            source: SourceArena::ROOT,
            offset: 0,
            depth: 0,
        };
        scan.run()
    }

    /// Like [`expand`](Self::expand), for callers whose inputs may be absent
    pub fn try_expand<S>(
        &mut self,
        template: Option<&str>,
        placeholders: Option<&S>,
    ) -> Result<String, ExpandError>
    where
        S: PlaceholderStore + ?Sized,
    {
        let template = template.ok_or(ExpandError::InvalidTemplate)?;
        let placeholders = placeholders.ok_or(ExpandError::InvalidPlaceholders)?;
        self.expand(template, placeholders)
    }

    fn emit(&mut self, kind: NotificationKind, source: &str, index: usize) {
        self.handler.notify(&Notification::new(kind, source, index));
    }
}

/// State of one expansion in progress
struct Scan<'a, 'h, S: ?Sized, H> {
    store: &'a S,
    handler: &'h mut H,
    arena: SourceArena<'a>,
    stack: ContextStack<SourceId>,
    output: OutputBuffer,
    source: SourceId,
    offset: usize,
    depth: usize,
}

impl<'a, 'h, S, H> Scan<'a, 'h, S, H>
where
    S: PlaceholderStore + ?Sized,
    H: NotificationHandler,
{
    fn run(mut self) -> Result<String, ExpandError> {
        loop {
            let text = self.arena.get(self.source);
            match token_at(text, self.offset) {
                Some((token, span)) => self.step(text, token, span)?,
                None if self.depth == 0 => break,
                None => self.leave()?,
            }
        }

        let size = self.output.capacity();
        let result = self.output.into_string();
        self.handler.notify(&Notification::new(
            NotificationKind::TargetSizeInfo,
            &result,
            size,
        ));
        Ok(result)
    }

    fn step(
        &mut self,
        text: &'a str,
        token: Token,
        span: Span,
    ) -> Result<(), ExpandError> {
        match token {
            Token::Text | Token::Backslash | Token::Percent | Token::At => {
                self.write(text, &text[span.clone()])?;
                self.offset = span.end;
            }
            Token::EscapedBackslash => {
                self.write(text, "\\")?;
                self.offset = span.end;
            }
            Token::EscapedDelimiter => {
                self.write(text, "@")?;
                self.offset = span.end;
            }
            Token::EscapedPrefix => {
                if self.at_line_start(text, span.start) {
                    self.write(text, "%")?;
                } else {
                    self.write(text, "\\%")?;
                }
                self.offset = span.end;
            }
            Token::IgnorePrefix => {
                if self.at_line_start(text, span.start) {
                    // Drop the rest of the line, terminator included
                    self.offset = match memchr(b'\n', &text.as_bytes()[span.end..]) {
                        Some(pos) => span.end + pos + 1,
                        None => text.len(),
                    };
                } else {
                    self.write(text, "%")?;
                    self.offset = span.start + 1;
                }
            }
            Token::Delimiter => {
                // The second `@` may open a placeholder
                self.write(text, "@")?;
                self.offset = span.start + 1;
            }
            Token::Placeholder => {
                let identifier = token.identifier(&text[span.clone()]).unwrap_or_default();
                let closed = text[span.end..].starts_with(DELIMITER);

                match self.resolve(identifier, closed) {
                    Some((key, value)) => {
                        self.enter(text, span.start, span.end + DELIMITER.len(), key, value)?
                    }
                    None => {
                        self.handler.notify(&Notification::new(
                            NotificationKind::UndefinedPlaceholder,
                            text,
                            span.start,
                        ));
                        self.write(text, DELIMITER)?;
                        self.offset = span.start + DELIMITER.len();
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a placeholder; `None` means it is to be copied literally
    fn resolve(&self, identifier: &str, closed: bool) -> Option<(PlaceholderKey, &'a str)> {
        let mut hasher = KeyHasher::new();
        for (len, byte) in identifier.bytes().enumerate() {
            if len == MAX_PLACEHOLDER_LENGTH {
                return None;
            }
            hasher.push(byte);
        }
        let key = hasher.finish();

        let store: &'a S = self.store;
        if !closed || !store.exists(key) {
            return None;
        }
        store.value_for(key).map(|value| (key, value))
    }

    /// Switch to the value of the placeholder at `start`, resuming the
    /// current source at `resume` once the value is exhausted
    fn enter(
        &mut self,
        text: &'a str,
        start: usize,
        resume: usize,
        key: PlaceholderKey,
        value: &'a str,
    ) -> Result<(), ExpandError> {
        if self.depth >= MAX_NESTING_LEVEL {
            self.handler.notify(&Notification::new(
                NotificationKind::NestingLimitExceeded,
                text,
                start,
            ));
            return Err(ExpandError::NestingLimitExceeded {
                limit: MAX_NESTING_LEVEL,
                offset: start,
            });
        }

        if let Err(err) = self.stack.push(Frame::new(self.source, resume)) {
            if err == StackError::AllocationFailed {
                self.handler.notify(&Notification::new(
                    NotificationKind::StackEnlargementFailed,
                    text,
                    start,
                ));
            }
            return Err(ExpandError::from_stack(err, start));
        }

        self.source = self.arena.intern(key, value);
        self.offset = 0;
        self.depth += 1;
        tracing::trace!(depth = self.depth, offset = start, "entering placeholder");
        Ok(())
    }

    fn leave(&mut self) -> Result<(), ExpandError> {
        let frame = self
            .stack
            .pop()
            .map_err(|err| ExpandError::from_stack(err, self.offset))?;
        self.source = frame.source;
        self.offset = frame.offset;
        self.depth -= 1;
        tracing::trace!(depth = self.depth, offset = frame.offset, "leaving placeholder");
        Ok(())
    }

    fn write(&mut self, text: &str, s: &str) -> Result<(), ExpandError> {
        if self.output.push_str(s).is_ok() {
            return Ok(());
        }

        self.handler.notify(&Notification::new(
            NotificationKind::TargetEnlargementFailed,
            text,
            self.offset,
        ));
        let partial = self.output.take();
        Err(ExpandError::AllocationFailed {
            partial: Some(partial),
        })
    }

    /// Column 1: just after a newline, or the very start of the top-level
    /// template
    fn at_line_start(&self, text: &str, offset: usize) -> bool {
        if offset == 0 {
            self.depth == 0
        } else {
            text.as_bytes()[offset - 1] == b'\n'
        }
    }
}
