//! Notifications raised while expanding a template
//!
//! A handler is passed to each [`Expander`](super::Expander) rather than
//! installed globally. The default handler forwards everything to `tracing`.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Expansion finished; `index` carries the allocated output size
    TargetSizeInfo,
    TargetAllocationFailed,
    TargetEnlargementFailed,
    StackAllocationFailed,
    StackEnlargementFailed,
    /// `@@name@@` with no value in the store
    UndefinedPlaceholder,
    NestingLimitExceeded,
}

impl NotificationKind {
    /// Whether the event aborts the expansion
    pub fn is_failure(self) -> bool {
        !matches!(
            self,
            NotificationKind::TargetSizeInfo | NotificationKind::UndefinedPlaceholder
        )
    }

    /// Whether `index` points into the source text
    pub fn is_located(self) -> bool {
        self != NotificationKind::TargetSizeInfo
    }

    pub fn describe(self) -> &'static str {
        match self {
            NotificationKind::TargetSizeInfo => "output size",
            NotificationKind::TargetAllocationFailed => "output buffer allocation failed",
            NotificationKind::TargetEnlargementFailed => "output buffer could not grow",
            NotificationKind::StackAllocationFailed => "context stack allocation failed",
            NotificationKind::StackEnlargementFailed => "context stack could not grow",
            NotificationKind::UndefinedPlaceholder => "undefined placeholder",
            NotificationKind::NestingLimitExceeded => "nesting limit exceeded",
        }
    }
}

/// One event, with the source being scanned when it happened
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    pub kind: NotificationKind,
    /// Template or placeholder value being scanned; the output for
    /// [`NotificationKind::TargetSizeInfo`]
    pub source: &'a str,
    /// Byte offset into `source`, or a size for
    /// [`NotificationKind::TargetSizeInfo`]
    pub index: usize,
}

impl<'a> Notification<'a> {
    pub fn new(kind: NotificationKind, source: &'a str, index: usize) -> Self {
        Self {
            kind,
            source,
            index,
        }
    }

    /// Render the notification with source context using ariadne.
    ///
    /// Size notifications have no location and render as a plain line.
    pub fn report(&self, filename: &str) -> String {
        if !self.kind.is_located() {
            return format!("{}: {} bytes", self.kind.describe(), self.index);
        }

        let kind = if self.kind.is_failure() {
            ReportKind::Error
        } else {
            ReportKind::Warning
        };
        let color = if self.kind.is_failure() {
            Color::Red
        } else {
            Color::Yellow
        };
        let start = self.index.min(self.source.len());
        let end = (start + self.label_width()).min(self.source.len());

        let mut buf = Vec::new();
        let written = Report::build(kind, filename, start)
            .with_config(Config::default().with_color(false))
            .with_message(self.kind.describe())
            .with_label(
                Label::new((filename, start..end))
                    .with_message(self.kind.describe())
                    .with_color(color),
            )
            .finish()
            .write((filename, Source::from(self.source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {} at {}", filename, self.kind.describe(), start),
        }
    }

    fn label_width(&self) -> usize {
        match self.kind {
            NotificationKind::UndefinedPlaceholder | NotificationKind::NestingLimitExceeded => {
                crate::config::DELIMITER.len()
            }
            _ => 1,
        }
    }
}

/// Receives notifications during expansion
pub trait NotificationHandler {
    fn notify(&mut self, notification: &Notification<'_>);
}

impl<F> NotificationHandler for F
where
    F: FnMut(&Notification<'_>),
{
    fn notify(&mut self, notification: &Notification<'_>) {
        self(notification)
    }
}

/// Forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl NotificationHandler for TracingHandler {
    fn notify(&mut self, n: &Notification<'_>) {
        match n.kind {
            NotificationKind::TargetSizeInfo => {
                tracing::debug!(size = n.index, "template expanded");
            }
            NotificationKind::UndefinedPlaceholder => {
                tracing::warn!(index = n.index, "{}", n.kind.describe());
            }
            kind => {
                tracing::error!(?kind, index = n.index, "{}", kind.describe());
            }
        }
    }
}

/// Discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentHandler;

impl NotificationHandler for SilentHandler {
    fn notify(&mut self, _notification: &Notification<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classification() {
        assert!(!NotificationKind::TargetSizeInfo.is_failure());
        assert!(!NotificationKind::UndefinedPlaceholder.is_failure());
        assert!(NotificationKind::NestingLimitExceeded.is_failure());
        assert!(NotificationKind::TargetEnlargementFailed.is_failure());
    }

    #[test]
    fn test_closure_is_a_handler() {
        let mut seen = Vec::new();
        {
            let mut handler = |n: &Notification<'_>| seen.push((n.kind, n.index));
            handler.notify(&Notification::new(
                NotificationKind::UndefinedPlaceholder,
                "@@x@@",
                0,
            ));
        }
        assert_eq!(seen, vec![(NotificationKind::UndefinedPlaceholder, 0)]);
    }

    #[test]
    fn test_report_points_at_placeholder() {
        let n = Notification::new(NotificationKind::UndefinedPlaceholder, "hi @@who@@", 3);
        let report = n.report("greeting.tpl");
        assert!(report.contains("undefined placeholder"));
        assert!(report.contains("greeting.tpl"));
        assert!(report.contains("hi @@who@@"));
    }

    #[test]
    fn test_size_report_is_plain() {
        let n = Notification::new(NotificationKind::TargetSizeInfo, "out", 4096);
        assert_eq!(n.report("x"), "output size: 4096 bytes");
    }
}
